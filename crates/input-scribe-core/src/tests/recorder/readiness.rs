use crate::{
    recorder::{DeviceSelection, Readiness, RecordingSession, SessionRequest},
    tests::recorder::{FakeBackend, FakePrompt},
};

fn session_over(backend: FakeBackend) -> RecordingSession {
    // A literal timestamp format: chrono passes non-% characters
    // through, keeping the session identifier deterministic.
    #[allow(clippy::unwrap_used)]
    let session = RecordingSession::new(Box::new(backend), "rec").unwrap();
    session
}

fn valid_request(save_directory: &str) -> SessionRequest {
    SessionRequest {
        save_directory: save_directory.to_string(),
        user_name: "alice".to_string(),
        record_name: "demo".to_string(),
        selection: DeviceSelection {
            keyboard: true,
            ..DeviceSelection::default()
        },
    }
}

/// WHAT: Every violation is reported in one readiness call
/// WHY: The user must see the complete error batch, not just the first
#[test]
fn given_blank_form_when_checking_readiness_then_all_errors_reported() {
    // Given: Empty directory, names, and selection
    let session = session_over(FakeBackend::new());
    let request = SessionRequest::default();
    let mut prompt = FakePrompt::answering(true);

    // When: Checking readiness
    let readiness = session.check_readiness(&request, &mut prompt);

    // Then: All four violations, in check order
    let Readiness::Rejected { errors } = readiness else {
        unreachable!("expected rejection");
    };
    assert_eq!(
        errors,
        vec![
            "no save directory",
            "no user name",
            "no record name",
            "no device selected",
        ]
    );
}

/// WHAT: Nonexistent save directory is distinct from a blank one
/// WHY: The two violations are mutually exclusive checks on one field
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_directory_when_checking_readiness_then_invalid_not_blank() {
    // Given: A valid request pointing at a directory that does not exist
    let session = session_over(FakeBackend::new());
    let request = valid_request("/definitely/not/a/real/directory");
    let mut prompt = FakePrompt::answering(true);

    // When: Checking readiness
    let readiness = session.check_readiness(&request, &mut prompt);

    // Then: Exactly "invalid save directory", never "no save directory"
    let Readiness::Rejected { errors } = readiness else {
        unreachable!("expected rejection");
    };
    assert_eq!(errors, vec!["invalid save directory"]);
}

/// WHAT: Gamepad selection requires a detected gamepad
/// WHY: Recording a disconnected gamepad would produce an empty log
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_gamepad_when_selected_then_readiness_rejected() {
    // Given: A backend with no gamepad and a gamepad-only selection
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FakeBackend::new();
    backend.gamepad_present = false;
    let session = session_over(backend);

    let mut request = valid_request(&dir.path().to_string_lossy());
    request.selection = DeviceSelection {
        gamepad: true,
        ..DeviceSelection::default()
    };
    let mut prompt = FakePrompt::answering(true);

    // When: Checking readiness
    let readiness = session.check_readiness(&request, &mut prompt);

    // Then: The gamepad violation is reported
    let Readiness::Rejected { errors } = readiness else {
        unreachable!("expected rejection");
    };
    assert_eq!(errors, vec!["no gamepad found"]);
}

/// WHAT: A valid request yields a ready session with a composed identifier
/// WHY: The identifier drives the archive path and entry names
#[test]
#[allow(clippy::unwrap_used)]
fn given_valid_request_when_checking_readiness_then_ready_with_id() {
    // Given: A valid request over an existing directory
    let dir = tempfile::tempdir().unwrap();
    let session = session_over(FakeBackend::new());
    let request = valid_request(&dir.path().to_string_lossy());
    let mut prompt = FakePrompt::answering(true);

    // When: Checking readiness
    let readiness = session.check_readiness(&request, &mut prompt);

    // Then: Ready, with id = <timestamp>.<user>.<record>
    let Readiness::Ready { session_id } = readiness else {
        unreachable!("expected ready");
    };
    assert_eq!(session_id.as_str(), "rec.alice.demo");
    assert_eq!(session_id.archive_file_name(), "rec.alice.demo.zip");
    // No existing archive, so the prompt is never consulted
    assert!(prompt.asked.is_empty());
}

/// WHAT: Declining to overwrite an existing archive cancels silently
/// WHY: Cancellation is observably distinct from a validation failure
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_archive_when_overwrite_declined_then_cancelled() {
    // Given: An archive already at the computed session path
    let dir = tempfile::tempdir().unwrap();
    let existing = dir.path().join("rec.alice.demo.zip");
    std::fs::write(&existing, b"old archive").unwrap();

    let session = session_over(FakeBackend::new());
    let request = valid_request(&dir.path().to_string_lossy());
    let mut prompt = FakePrompt::answering(false);

    // When: Checking readiness and declining the overwrite
    let readiness = session.check_readiness(&request, &mut prompt);

    // Then: Silent cancellation, prompt asked about the right path
    assert!(matches!(readiness, Readiness::Cancelled));
    assert_eq!(prompt.asked, vec![existing.clone()]);
    // And: The existing archive is untouched
    assert_eq!(std::fs::read(&existing).unwrap(), b"old archive");
}

/// WHAT: Confirming an overwrite lets the session proceed
/// WHY: The user may intentionally re-record under the same name
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_archive_when_overwrite_confirmed_then_ready() {
    // Given: An archive already at the computed session path
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("rec.alice.demo.zip"), b"old").unwrap();

    let session = session_over(FakeBackend::new());
    let request = valid_request(&dir.path().to_string_lossy());
    let mut prompt = FakePrompt::answering(true);

    // When: Checking readiness and confirming
    let readiness = session.check_readiness(&request, &mut prompt);

    // Then: The session is ready
    assert!(matches!(readiness, Readiness::Ready { .. }));
}
