use crate::{CoreResult, RecorderError, recorder::DeviceMonitor};

use std::{
    panic::Location,
    sync::{Arc, Mutex, mpsc},
    thread::JoinHandle,
};

use error_location::ErrorLocation;
use tracing::{debug, info};

/// At most two polling monitors (screen and gamepad) are ever active in
/// one session, so the pool never needs more workers than that.
pub(crate) const POOL_CAPACITY: usize = 2;

/// Fixed-size executor for [`DeviceMonitor`] tasks.
///
/// `submit` never blocks the caller past enqueueing and is safe to call
/// from concurrent threads. Monitors return no values; they communicate
/// solely through their paired writer's side effects.
pub struct WorkerPool {
    sender: Option<mpsc::Sender<Arc<dyn DeviceMonitor>>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn the pool's worker threads.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::PoolSpawn`] if a worker thread cannot
    /// be created.
    #[track_caller]
    pub fn new() -> CoreResult<Self> {
        let (sender, receiver) = mpsc::channel::<Arc<dyn DeviceMonitor>>();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(POOL_CAPACITY);
        for index in 0..POOL_CAPACITY {
            let receiver = Arc::clone(&receiver);
            let handle = std::thread::Builder::new()
                .name(format!("monitor-worker-{index}"))
                .spawn(move || {
                    loop {
                        // The lock is held only while waiting for a task,
                        // never while running one, so both workers can
                        // execute monitors in parallel.
                        let task = {
                            let guard = receiver.lock().unwrap_or_else(|e| e.into_inner());
                            guard.recv()
                        };

                        match task {
                            Ok(monitor) => {
                                debug!(worker = index, "Monitor task starting");
                                monitor.run();
                                debug!(worker = index, "Monitor task finished");
                            }
                            // Sender dropped: pool shut down.
                            Err(_) => break,
                        }
                    }
                })
                .map_err(|e| RecorderError::PoolSpawn {
                    source: e,
                    location: ErrorLocation::from(Location::caller()),
                })?;
            workers.push(handle);
        }

        debug!(capacity = POOL_CAPACITY, "Worker pool started");

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Enqueue a monitor for execution.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::PoolClosed`] after [`shutdown`](Self::shutdown).
    #[track_caller]
    pub fn submit(&self, monitor: Arc<dyn DeviceMonitor>) -> CoreResult<()> {
        let sender = self.sender.as_ref().ok_or_else(|| RecorderError::PoolClosed {
            location: ErrorLocation::from(Location::caller()),
        })?;

        sender.send(monitor).map_err(|_| RecorderError::PoolClosed {
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Stop accepting tasks and wait for the workers to drain.
    ///
    /// Running monitors are not interrupted; shutdown relies on each
    /// monitor's own cooperative stop check. A monitor that never
    /// observes its stop flag will stall this call indefinitely.
    pub fn shutdown(&mut self) {
        if self.sender.take().is_none() {
            return;
        }

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }

        info!("Worker pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
