/// Commands sent from the console reader to the main application.
#[derive(Debug, Clone, Copy)]
pub enum AppCommand {
    /// Start a new recording session.
    StartRecording,
    /// Stop the current recording session and archive it.
    StopRecording,
    /// Request application shutdown.
    Shutdown,
}
