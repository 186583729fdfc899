use serde::{Deserialize, Serialize};

/// Persisted session form fields.
///
/// Mirrors what the user last typed into the start form; an absent
/// preference leaves the field blank, and blank fields are rejected by
/// the readiness gate rather than here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory the session archive is written to.
    #[serde(default)]
    pub save_directory: String,
    /// User name embedded in the session identifier.
    #[serde(default)]
    pub user_name: String,
    /// Record name embedded in the session identifier.
    #[serde(default)]
    pub record_name: String,
    /// Whether an existing archive under the same identifier may be
    /// overwritten without asking. Headless stand-in for the
    /// confirmation dialog; `false` declines silently.
    #[serde(default)]
    pub overwrite_existing: bool,
}
