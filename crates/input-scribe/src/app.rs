use crate::{AppCommand, AppResult, config::Config, devices::InputHooks};

use input_scribe_core::{
    DeviceSelection, OverwritePrompt, Readiness, RecordingSession, SessionRequest,
};
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

/// Headless stand-in for the overwrite confirmation dialog.
///
/// The decision comes from configuration instead of a modal prompt;
/// declining yields the same silent cancellation the dialog would.
struct OverwritePolicy {
    allow: bool,
}

impl OverwritePrompt for OverwritePolicy {
    fn confirm_overwrite(&mut self, archive_path: &std::path::Path) -> bool {
        if self.allow {
            warn!(path = %archive_path.display(), "Overwriting existing archive");
        } else {
            info!(
                path = %archive_path.display(),
                "Archive exists and overwrite_existing is off"
            );
        }
        self.allow
    }
}

/// Main application state.
///
/// Owns the recording session for the lifetime of the process and
/// drives it from console commands; on shutdown it forces a stop so a
/// session interrupted mid-recording is still archived.
pub struct App {
    pub(crate) session: RecordingSession,
    pub(crate) hooks: InputHooks,
    pub(crate) config: Config,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Input-Scribe started, commands: start | stop | quit");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(AppCommand::StartRecording) => self.handle_start(),
                        Some(AppCommand::StopRecording) => self.handle_stop(),
                        Some(AppCommand::Shutdown) | None => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, shutting down");
                    break;
                }
            }
        }

        // Teardown mirrors the window-close path of the recording UI:
        // stop and archive anything still running, then persist the
        // session form fields.
        self.session.force_stop_if_recording();
        self.hooks.disable();

        if let Err(e) = self.config.save() {
            error!(error = ?e, "Failed to save configuration");
        }

        info!("Input-Scribe shut down");

        Ok(())
    }

    #[instrument(skip(self))]
    fn handle_start(&mut self) {
        if self.session.is_recording() {
            warn!("Already recording");
            return;
        }

        let request = SessionRequest {
            save_directory: self.config.session.save_directory.clone(),
            user_name: self.config.session.user_name.clone(),
            record_name: self.config.session.record_name.clone(),
            selection: DeviceSelection {
                keyboard: self.config.capture.keyboard,
                mouse: self.config.capture.mouse,
                gamepad: self.config.capture.gamepad,
            },
        };

        let mut prompt = OverwritePolicy {
            allow: self.config.session.overwrite_existing,
        };

        match self.session.check_readiness(&request, &mut prompt) {
            Readiness::Ready { session_id } => {
                // Hooks go live before the writers so the first events
                // land right after each log opens.
                self.hooks.enable();
                self.session
                    .start(session_id, &request.save_directory, &request.selection);

                if self.session.is_recording() {
                    info!(devices = ?self.session.active_devices(), "Recording");
                } else {
                    self.hooks.disable();
                }
            }
            Readiness::Rejected { errors } => {
                // The whole batch is surfaced together, never just the
                // first violation.
                error!(reasons = %errors.join("; "), "Cannot start recording");
            }
            Readiness::Cancelled => {
                info!("Recording not started");
            }
        }
    }

    #[instrument(skip(self))]
    fn handle_stop(&mut self) {
        if !self.session.is_recording() {
            warn!("Not recording");
            return;
        }

        self.session.stop();
        self.hooks.disable();
    }
}
