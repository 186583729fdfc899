use crate::{
    recorder::{DeviceKind, DeviceSelection, Readiness, RecordingSession, SessionRequest},
    tests::recorder::{BackendState, FakeBackend, FakePrompt},
};

use std::{
    path::Path,
    sync::{Arc, atomic::Ordering},
};

fn archive_entry_names(path: &Path) -> Vec<String> {
    #[allow(clippy::unwrap_used)]
    let names = {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    };
    names
}

/// Session wired to a fake backend with staging redirected into the
/// given scratch directory.
fn harness(backend: FakeBackend, staging: &Path) -> (RecordingSession, Arc<BackendState>) {
    let state = Arc::clone(&backend.state);
    #[allow(clippy::unwrap_used)]
    let mut session = RecordingSession::new(Box::new(backend), "rec").unwrap();
    session.set_staging_dir(staging.to_path_buf());
    (session, state)
}

fn ready_id(session: &RecordingSession, save_dir: &Path) -> crate::SessionId {
    let request = SessionRequest {
        save_directory: save_dir.to_string_lossy().into_owned(),
        user_name: "alice".to_string(),
        record_name: "demo".to_string(),
        selection: DeviceSelection {
            keyboard: true,
            ..DeviceSelection::default()
        },
    };
    let mut prompt = FakePrompt::answering(true);
    match session.check_readiness(&request, &mut prompt) {
        Readiness::Ready { session_id } => session_id,
        other => unreachable!("expected ready, got {other:?}"),
    }
}

/// WHAT: Keyboard+mouse selection activates keyboard, mouse, and screen
/// WHY: Screen capture is implied by mouse capture
#[test]
#[allow(clippy::unwrap_used)]
fn given_keyboard_and_mouse_when_starting_then_screen_included() {
    // Given: A ready session and a keyboard+mouse selection
    let staging = tempfile::tempdir().unwrap();
    let save = tempfile::tempdir().unwrap();
    let (mut session, state) = harness(FakeBackend::new(), staging.path());
    let id = ready_id(&session, save.path());

    // When: Starting
    session.start(
        id,
        save.path(),
        &DeviceSelection {
            keyboard: true,
            mouse: true,
            gamepad: false,
        },
    );

    // Then: Recording with exactly keyboard, mouse, and screen active
    assert!(session.is_recording());
    assert_eq!(
        session.active_devices(),
        vec![DeviceKind::Keyboard, DeviceKind::Mouse, DeviceKind::Screen]
    );
    assert_eq!(
        state.started_kinds(),
        vec![DeviceKind::Keyboard, DeviceKind::Mouse, DeviceKind::Screen]
    );

    session.force_stop_if_recording();
}

/// WHAT: A writer that fails to start is excluded, the rest record
/// WHY: Losing one device must not abort the whole session
#[test]
#[allow(clippy::unwrap_used)]
fn given_keyboard_start_failure_when_starting_then_others_still_record() {
    // Given: A backend whose keyboard writer fails to start
    let staging = tempfile::tempdir().unwrap();
    let save = tempfile::tempdir().unwrap();
    let mut backend = FakeBackend::new();
    backend.fail_start = vec![DeviceKind::Keyboard];
    let (mut session, _state) = harness(backend, staging.path());
    let id = ready_id(&session, save.path());

    // When: Starting keyboard+mouse
    session.start(
        id,
        save.path(),
        &DeviceSelection {
            keyboard: true,
            mouse: true,
            gamepad: false,
        },
    );

    // Then: Recording continues with mouse and screen only
    assert!(session.is_recording());
    assert_eq!(
        session.active_devices(),
        vec![DeviceKind::Mouse, DeviceKind::Screen]
    );

    session.force_stop_if_recording();
}

/// WHAT: Stop produces one archive entry per active device, in order
/// WHY: The archive is the session's single output artifact
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_stopping_then_archive_holds_every_log() {
    // Given: A recording session over keyboard, mouse, and screen
    let staging = tempfile::tempdir().unwrap();
    let save = tempfile::tempdir().unwrap();
    let (mut session, state) = harness(FakeBackend::new(), staging.path());
    let id = ready_id(&session, save.path());
    session.start(
        id,
        save.path(),
        &DeviceSelection {
            keyboard: true,
            mouse: true,
            gamepad: false,
        },
    );

    // When: Stopping
    session.stop();

    // Then: Idle, writers cleared, archive holds the three named entries
    assert!(!session.is_recording());
    assert!(session.active_devices().is_empty());
    assert_eq!(
        state.stopped_kinds(),
        vec![DeviceKind::Keyboard, DeviceKind::Mouse, DeviceKind::Screen]
    );

    let archive = save.path().join("rec.alice.demo.zip");
    assert_eq!(
        archive_entry_names(&archive),
        vec![
            "rec.alice.demo.keyboard.csv",
            "rec.alice.demo.mouse.csv",
            "rec.alice.demo.screen.csv",
        ]
    );
}

/// WHAT: Stopping stops the paired monitors as well
/// WHY: A stopped session must leave no polling loop running
#[test]
#[allow(clippy::unwrap_used)]
fn given_polling_monitors_when_stopping_then_monitors_signalled() {
    // Given: A session recording the mouse (screen monitor active)
    let staging = tempfile::tempdir().unwrap();
    let save = tempfile::tempdir().unwrap();
    let (mut session, state) = harness(FakeBackend::new(), staging.path());
    let id = ready_id(&session, save.path());
    session.start(
        id,
        save.path(),
        &DeviceSelection {
            mouse: true,
            ..DeviceSelection::default()
        },
    );
    let monitor = state.monitor(DeviceKind::Screen).unwrap();

    // When: Stopping
    session.stop();

    // Then: The screen monitor observed its stop flag
    assert!(monitor.stopped.load(Ordering::Acquire));
}

/// WHAT: A second stop is a no-op and does not re-create the archive
/// WHY: Stop must be idempotent for the forced-stop teardown path
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopped_session_when_stopping_again_then_noop() {
    // Given: A session stopped once, with its archive then removed
    let staging = tempfile::tempdir().unwrap();
    let save = tempfile::tempdir().unwrap();
    let (mut session, _state) = harness(FakeBackend::new(), staging.path());
    let id = ready_id(&session, save.path());
    session.start(
        id,
        save.path(),
        &DeviceSelection {
            keyboard: true,
            ..DeviceSelection::default()
        },
    );
    session.stop();

    let archive = save.path().join("rec.alice.demo.zip");
    std::fs::remove_file(&archive).unwrap();

    // When: Stopping again
    session.stop();

    // Then: No archive re-created, still idle
    assert!(!archive.exists());
    assert!(!session.is_recording());
}

/// WHAT: An archive failure on stop still returns the session to idle
/// WHY: A failed bundling step must not strand the session mid-recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_unwritable_save_directory_when_stopping_then_session_idle() {
    // Given: A recording session whose save directory disappears
    let staging = tempfile::tempdir().unwrap();
    let save = tempfile::tempdir().unwrap();
    let (mut session, state) = harness(FakeBackend::new(), staging.path());
    let id = ready_id(&session, save.path());
    session.start(
        id,
        save.path(),
        &DeviceSelection {
            keyboard: true,
            ..DeviceSelection::default()
        },
    );
    std::fs::remove_dir_all(save.path()).unwrap();

    // When: Stopping
    session.stop();

    // Then: Idle with writers stopped and cleared despite the failure
    assert!(!session.is_recording());
    assert!(session.active_devices().is_empty());
    assert_eq!(state.stopped_kinds(), vec![DeviceKind::Keyboard]);
}

/// WHAT: Forced stop archives like an explicit stop and closes the pool
/// WHY: Closing the application mid-recording must not lose outputs
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_force_stopped_then_archived_and_pool_closed() {
    // Given: A session recording the mouse
    let staging = tempfile::tempdir().unwrap();
    let save = tempfile::tempdir().unwrap();
    let (mut session, _state) = harness(FakeBackend::new(), staging.path());
    let id = ready_id(&session, save.path());
    session.start(
        id,
        save.path(),
        &DeviceSelection {
            mouse: true,
            ..DeviceSelection::default()
        },
    );

    // When: Forcing a stop (application teardown path)
    session.force_stop_if_recording();

    // Then: Same archive outcome as an explicit stop
    assert!(!session.is_recording());
    let archive = save.path().join("rec.alice.demo.zip");
    assert_eq!(
        archive_entry_names(&archive),
        vec!["rec.alice.demo.mouse.csv", "rec.alice.demo.screen.csv"]
    );

    // And: The pool accepts no further monitor submissions, so a new
    // polling device is silently excluded while its writer is stopped
    let id = ready_id(&session, save.path());
    session.start(
        id,
        save.path(),
        &DeviceSelection {
            mouse: true,
            ..DeviceSelection::default()
        },
    );
    assert_eq!(session.active_devices(), vec![DeviceKind::Mouse]);
}

/// WHAT: A cancelled readiness check constructs no writers
/// WHY: Declining an overwrite must leave the session fully idle
#[test]
#[allow(clippy::unwrap_used)]
fn given_overwrite_declined_when_not_starting_then_no_writers_built() {
    // Given: An existing archive and a declining prompt
    let staging = tempfile::tempdir().unwrap();
    let save = tempfile::tempdir().unwrap();
    std::fs::write(save.path().join("rec.alice.demo.zip"), b"old").unwrap();
    let (session, state) = harness(FakeBackend::new(), staging.path());

    let request = SessionRequest {
        save_directory: save.path().to_string_lossy().into_owned(),
        user_name: "alice".to_string(),
        record_name: "demo".to_string(),
        selection: DeviceSelection {
            keyboard: true,
            ..DeviceSelection::default()
        },
    };
    let mut prompt = FakePrompt::answering(false);

    // When: Readiness is cancelled (caller aborts, never calls start)
    let readiness = session.check_readiness(&request, &mut prompt);

    // Then: Idle with zero writer constructions
    assert!(matches!(readiness, Readiness::Cancelled));
    assert!(!session.is_recording());
    assert_eq!(state.constructed.load(Ordering::SeqCst), 0);
}
