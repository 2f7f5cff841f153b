//! In-memory camera platform, decode engine and observer
//!
//! These stand in for real hardware when replaying recorded frames from the
//! CLI and in tests. The engine counts starts and releases so callers can
//! check that two loops never overlap.

use crate::error::{AccessError, EngineError};
use crate::platform::{
    CameraConstraints, CameraDevice, CameraPlatform, DecodeEngine, DecodeOutcome, ScanObserver,
};
use crate::result::ScanResult;

/// Camera platform with a fixed device list and a scripted permission answer
#[derive(Debug, Clone, Default)]
pub struct SimulatedCamera {
    devices: Vec<CameraDevice>,
    access_error: Option<AccessError>,
    enumeration_error: Option<AccessError>,
    access_requests: Vec<CameraConstraints>,
}

impl SimulatedCamera {
    /// A platform that grants access and reports `devices`
    pub fn new(devices: Vec<CameraDevice>) -> Self {
        Self {
            devices,
            ..Default::default()
        }
    }

    /// A platform that refuses access with `error`
    pub fn denying(error: AccessError) -> Self {
        Self {
            access_error: Some(error),
            ..Default::default()
        }
    }

    /// Make device enumeration fail after access is granted
    pub fn with_enumeration_error(mut self, error: AccessError) -> Self {
        self.enumeration_error = Some(error);
        self
    }

    /// Change the answer to future access requests (`None` grants)
    pub fn set_access_error(&mut self, error: Option<AccessError>) {
        self.access_error = error;
    }

    pub fn set_devices(&mut self, devices: Vec<CameraDevice>) {
        self.devices = devices;
    }

    /// Constraints of every access request made so far
    pub fn access_requests(&self) -> &[CameraConstraints] {
        &self.access_requests
    }
}

impl CameraPlatform for SimulatedCamera {
    fn request_access(
        &mut self,
        constraints: &CameraConstraints,
    ) -> std::result::Result<(), AccessError> {
        self.access_requests.push(constraints.clone());
        match &self.access_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn enumerate_devices(&mut self) -> std::result::Result<Vec<CameraDevice>, AccessError> {
        match &self.enumeration_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.devices.clone()),
        }
    }
}

/// Preview target accepted by [`SimulatedEngine`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedSurface {
    pub name: String,
}

/// Decode engine that records its lifecycle instead of opening a camera
#[derive(Debug, Default)]
pub struct SimulatedEngine {
    active_device: Option<String>,
    start_failure: Option<EngineError>,
    starts: Vec<String>,
    releases: usize,
    resets: usize,
    overlapping_starts: usize,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `start` fail with `error`
    pub fn fail_next_start(&mut self, error: EngineError) {
        self.start_failure = Some(error);
    }

    /// Device the engine currently holds open
    pub fn active_device(&self) -> Option<&str> {
        self.active_device.as_deref()
    }

    /// Device ids of every successful start, in order
    pub fn starts(&self) -> &[String] {
        &self.starts
    }

    /// Resets that released a running loop
    pub fn releases(&self) -> usize {
        self.releases
    }

    /// All resets, including ones with nothing to release
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Starts made while another loop still held the camera
    pub fn overlapping_starts(&self) -> usize {
        self.overlapping_starts
    }
}

impl DecodeEngine for SimulatedEngine {
    type Sink = SimulatedSurface;

    fn start(
        &mut self,
        device_id: &str,
        _sink: &SimulatedSurface,
    ) -> std::result::Result<(), EngineError> {
        if let Some(err) = self.start_failure.take() {
            return Err(err);
        }
        if self.active_device.is_some() {
            self.overlapping_starts += 1;
        }
        self.active_device = Some(device_id.to_string());
        self.starts.push(device_id.to_string());
        Ok(())
    }

    fn reset(&mut self) {
        self.resets += 1;
        if self.active_device.take().is_some() {
            self.releases += 1;
        }
    }
}

/// Observer that keeps everything it is told
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub successes: Vec<ScanResult>,
    pub errors: Vec<String>,
}

impl ScanObserver for RecordingObserver {
    fn on_scan_success(&mut self, result: ScanResult) {
        self.successes.push(result);
    }

    fn on_scan_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// One step of a recorded scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Frame(DecodeOutcome),
    SwitchCamera,
}

/// Parse a frame script, one step per line
///
/// - blank line or `-`: a frame with no barcode
/// - `!message`: an engine fault
/// - `@switch`: switch to the next camera
/// - `# ...`: comment, skipped
/// - anything else: a decoded barcode payload
pub fn parse_frame_script(script: &str) -> Vec<ScriptStep> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .map(|line| match line {
            "" | "-" => ScriptStep::Frame(DecodeOutcome::NotFound),
            "@switch" => ScriptStep::SwitchCamera,
            _ => match line.strip_prefix('!') {
                Some(message) => {
                    ScriptStep::Frame(DecodeOutcome::Failed(EngineError::new(message.trim())))
                }
                None => ScriptStep::Frame(DecodeOutcome::Decoded(line.to_string())),
            },
        })
        .collect()
}
