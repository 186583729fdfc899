//! Input-Scribe: record keyboard, mouse, screen, and gamepad activity
//! into one archive per session.

mod app;
mod app_command;
mod config;
mod devices;
mod error;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
};

use crate::{config::Config, devices::SystemBackend};

use std::time::Duration;

use input_scribe_core::RecordingSession;
use tokio::{io::AsyncBufReadExt, sync::mpsc};
use tracing::{error, warn};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("input_scribe=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let backend = SystemBackend::new(Duration::from_millis(config.capture.poll_interval_ms));
    let hooks = devices::InputHooks::spawn(backend.registry());

    let session = match RecordingSession::new(Box::new(backend), config.capture.timestamp_format.clone())
        .map_err(AppError::from)
    {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create recording session: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let (command_tx, command_rx) = mpsc::channel(32);

        // Console command reader: the headless counterpart of the
        // start/stop buttons.
        tokio::spawn(async move {
            let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let cmd = match line.trim() {
                    "" => continue,
                    "start" => AppCommand::StartRecording,
                    "stop" => AppCommand::StopRecording,
                    "quit" | "exit" => AppCommand::Shutdown,
                    other => {
                        warn!(input = other, "Unknown command");
                        continue;
                    }
                };

                if command_tx.send(cmd).await.is_err() {
                    break;
                }
            }
        });

        let app = App {
            session,
            hooks,
            config,
            command_rx,
        };

        if let Err(e) = app.run().await {
            error!(error = ?e, "App error");
        }
    });
}
