//! Scanner screen tests: camera and manual entry paths

use bookshelf_scanner::simulated::{
    parse_frame_script, RecordingObserver, ScriptStep, SimulatedCamera, SimulatedEngine,
    SimulatedSurface,
};
use bookshelf_scanner::{
    AccessError, CameraDevice, DecodeOutcome, FrameVerdict, ManualEntryError, ScanError, ScanFlow,
    ScanResult, ScanState, ScannerConfig, ScannerMode,
};

type TestFlow = ScanFlow<SimulatedCamera, SimulatedEngine, RecordingObserver>;

fn flow_with(camera: SimulatedCamera) -> TestFlow {
    let mut flow = ScanFlow::new(
        ScannerConfig::default(),
        camera,
        SimulatedEngine::new(),
        RecordingObserver::default(),
    );
    flow.session_mut()
        .set_video_sink(Some(SimulatedSurface::default()));
    flow
}

fn flow() -> TestFlow {
    flow_with(SimulatedCamera::new(vec![
        CameraDevice::new("front", "Front Camera"),
        CameraDevice::new("back", "Back Camera"),
    ]))
}

#[test]
fn test_scan_closes_screen() {
    let mut flow = flow();
    flow.open().unwrap();

    let verdict = flow.handle_frame(DecodeOutcome::Decoded("0123456789".into()));
    assert!(matches!(verdict, FrameVerdict::Accepted(_)));
    assert!(!flow.is_open());
    assert_eq!(flow.session().state(), ScanState::Idle);
    assert_eq!(flow.session().engine().active_device(), None);
    assert_eq!(
        flow.session().observer().successes,
        vec![ScanResult::success("0123456789")]
    );
}

#[test]
fn test_manual_submit_notifies_and_closes() {
    let mut flow = flow();
    flow.open().unwrap();
    flow.switch_mode(ScannerMode::Manual).unwrap();
    flow.set_manual_input("978-0-123-45678-6");

    let result = flow.submit_manual().unwrap();
    assert_eq!(result.isbn, "9780123456786");
    assert!(result.success);
    assert!(!flow.is_open());
    assert_eq!(flow.mode(), ScannerMode::Scan);
    assert_eq!(flow.session().observer().successes, vec![result]);
}

#[test]
fn test_manual_rejection_stays_inline() {
    let mut flow = flow();
    flow.open().unwrap();
    flow.switch_mode(ScannerMode::Manual).unwrap();
    flow.set_manual_input("12345");

    assert_eq!(flow.submit_manual(), Err(ManualEntryError::Malformed));
    assert!(flow.is_open());
    assert_eq!(flow.mode(), ScannerMode::Manual);
    assert_eq!(flow.manual().error(), Some(&ManualEntryError::Malformed));
    assert!(flow.session().observer().successes.is_empty());
    assert!(flow.session().observer().errors.is_empty());
}

#[test]
fn test_manual_empty_input() {
    let mut flow = flow();
    flow.switch_mode(ScannerMode::Manual).unwrap();
    assert!(!flow.manual().can_submit());
    assert_eq!(flow.submit_manual(), Err(ManualEntryError::Empty));
}

#[test]
fn test_back_to_scan_discards_manual_input() {
    let mut flow = flow();
    flow.open().unwrap();
    flow.switch_mode(ScannerMode::Manual).unwrap();
    flow.set_manual_input("978");

    flow.switch_mode(ScannerMode::Scan).unwrap();
    assert_eq!(flow.manual().input(), "");
    assert!(flow.session().is_scanning());
    assert_eq!(flow.session().engine().overlapping_starts(), 0);
}

#[test]
fn test_denied_permission_offers_retry_and_manual() {
    let mut flow = flow_with(SimulatedCamera::denying(AccessError::NotAllowed));

    assert_eq!(flow.open(), Err(ScanError::PermissionDenied));
    assert!(flow.is_open());
    assert!(flow.needs_permission_retry());

    flow.switch_mode(ScannerMode::Manual).unwrap();
    flow.set_manual_input("0-8044-2957-X");
    assert_eq!(flow.submit_manual().unwrap().isbn, "080442957X");
    assert!(!flow.is_open());
}

#[test]
fn test_close_while_permission_pending() {
    let mut flow = flow();
    let request = flow.session_mut().begin_permission_request();
    assert_eq!(flow.session().state(), ScanState::PermissionPending);

    flow.close();
    assert_eq!(
        flow.session_mut().complete_permission_request(request, Ok(())),
        Err(ScanError::SessionClosed)
    );
    assert_eq!(flow.session().state(), ScanState::Idle);
}

#[test]
fn test_reopen_after_close() {
    let mut flow = flow();
    flow.open().unwrap();
    flow.close();
    flow.open().unwrap();

    assert!(flow.session().is_scanning());
    assert_eq!(flow.session().platform().access_requests().len(), 2);
    assert_eq!(flow.session().engine().overlapping_starts(), 0);
}

#[test]
fn test_replayed_script() {
    let script = "\
# rear camera, then switch to the front one
-
https://example.com
!lens dirty
@switch
-
978-0-123-45678-6
0123456789
";
    let mut flow = flow();
    flow.open().unwrap();

    let mut verdicts = Vec::new();
    for step in parse_frame_script(script) {
        match step {
            ScriptStep::Frame(outcome) => verdicts.push(flow.handle_frame(outcome)),
            ScriptStep::SwitchCamera => flow.switch_camera().unwrap(),
        }
    }

    assert_eq!(
        verdicts,
        vec![
            FrameVerdict::Ignored,
            FrameVerdict::Ignored,
            FrameVerdict::Fault,
            FrameVerdict::Ignored,
            FrameVerdict::Accepted(ScanResult::success("9780123456786")),
            FrameVerdict::Inactive,
        ]
    );
    assert_eq!(flow.session().engine().starts(), ["back", "front"]);
    assert_eq!(flow.session().observer().errors, vec!["Scanning error occurred"]);
}
