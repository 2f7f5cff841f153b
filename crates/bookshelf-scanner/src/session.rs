//! Scan session controller
//!
//! A [`ScanSession`] coordinates camera permission, device discovery, one
//! live decode loop and ISBN acceptance for a single open/close cycle of
//! the scanning screen. Platform work is injected through
//! [`CameraPlatform`] and [`DecodeEngine`]; results and errors go out
//! through a [`ScanObserver`].
//!
//! All transitions are synchronous. Asynchronous hosts split the permission
//! prompt with [`ScanSession::begin_permission_request`] /
//! [`ScanSession::complete_permission_request`] and push each decoded frame
//! into [`ScanSession::handle_frame`].
//!
//! Guarantees:
//! - at most one decode loop is running; every start is preceded by a
//!   completed stop of the previous loop
//! - a running loop delivers at most one [`ScanResult`], then stops
//! - no operation panics or leaves the session unusable on error

use bookshelf_isbn::{normalize_isbn, validate_isbn};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ScannerConfig;
use crate::error::{AccessError, Result, ScanError};
use crate::platform::{
    CameraConstraints, CameraDevice, CameraPlatform, DecodeEngine, DecodeOutcome, ScanObserver,
};
use crate::result::ScanResult;
use crate::state::ScanState;

/// Ticket for an outstanding camera permission prompt
///
/// Returned by [`ScanSession::begin_permission_request`]. Completing a
/// ticket that was superseded by a newer request, or by `close()`, has no
/// effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest {
    generation: u64,
    constraints: CameraConstraints,
}

impl PermissionRequest {
    /// Constraints to pass to the platform prompt
    pub fn constraints(&self) -> &CameraConstraints {
        &self.constraints
    }
}

/// What [`ScanSession::handle_frame`] did with a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameVerdict {
    /// A valid ISBN was read, reported, and the loop stopped
    Accepted(ScanResult),
    /// Nothing usable in the frame (no barcode, or not an ISBN)
    Ignored,
    /// The engine failed on this frame; the loop keeps running
    Fault,
    /// Too many consecutive engine failures; the loop was torn down
    Aborted,
    /// No loop is running, so the frame was dropped
    Inactive,
}

/// Serializable view of a session's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ScanSnapshot {
    pub state: ScanState,
    pub is_scanning: bool,
    pub has_permission: bool,
    pub error: Option<String>,
    pub devices: Vec<CameraDevice>,
    pub selected_device_id: Option<String>,
}

/// Camera-backed ISBN scan session
pub struct ScanSession<P, E, O>
where
    P: CameraPlatform,
    E: DecodeEngine,
    O: ScanObserver,
{
    config: ScannerConfig,
    platform: P,
    engine: E,
    observer: O,
    sink: Option<E::Sink>,

    has_permission: bool,
    /// Generation of the outstanding permission prompt, if any
    pending_request: Option<u64>,
    /// Bumped by every permission request and by `close()`
    generation: u64,

    devices: Vec<CameraDevice>,
    selected_device_id: Option<String>,
    /// Device the decode loop is bound to; `Some` exactly while it runs
    active_device_id: Option<String>,

    error: Option<ScanError>,
    consecutive_engine_errors: u32,
}

impl<P, E, O> ScanSession<P, E, O>
where
    P: CameraPlatform,
    E: DecodeEngine,
    O: ScanObserver,
{
    /// Create a session with the default configuration
    pub fn new(platform: P, engine: E, observer: O) -> Self {
        Self::with_config(ScannerConfig::default(), platform, engine, observer)
    }

    /// Create a session with an explicit configuration
    pub fn with_config(config: ScannerConfig, platform: P, engine: E, observer: O) -> Self {
        Self {
            config,
            platform,
            engine,
            observer,
            sink: None,
            has_permission: false,
            pending_request: None,
            generation: 0,
            devices: Vec::new(),
            selected_device_id: None,
            active_device_id: None,
            error: None,
            consecutive_engine_errors: 0,
        }
    }

    // === Accessors ===

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Current state, derived from the session's fields
    pub fn state(&self) -> ScanState {
        if self.error.is_some() {
            ScanState::Error
        } else if self.active_device_id.is_some() {
            ScanState::Scanning
        } else if self.pending_request.is_some() {
            ScanState::PermissionPending
        } else if self.has_permission {
            ScanState::Permitted
        } else {
            ScanState::Idle
        }
    }

    /// Whether a decode loop is running (also true in `Error` after a
    /// non-fatal engine fault)
    pub fn is_scanning(&self) -> bool {
        self.active_device_id.is_some()
    }

    pub fn has_permission(&self) -> bool {
        self.has_permission
    }

    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    pub fn devices(&self) -> &[CameraDevice] {
        &self.devices
    }

    pub fn selected_device_id(&self) -> Option<&str> {
        self.selected_device_id.as_deref()
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot {
            state: self.state(),
            is_scanning: self.is_scanning(),
            has_permission: self.has_permission,
            error: self.error.as_ref().map(|e| e.to_string()),
            devices: self.devices.clone(),
            selected_device_id: self.selected_device_id.clone(),
        }
    }

    /// Attach or detach the live preview target
    ///
    /// Detaching stops a running loop, since it has nowhere to render.
    pub fn set_video_sink(&mut self, sink: Option<E::Sink>) {
        if sink.is_none() && self.is_scanning() {
            self.stop_scanning();
        }
        self.sink = sink;
    }

    // === Permission ===

    /// Ask the platform for camera access and discover devices
    ///
    /// On success the session is `Permitted` with a default device
    /// selected. On failure it is in `Error`, the observer has been told,
    /// and the caller may retry.
    pub fn request_permission(&mut self) -> Result<()> {
        let request = self.begin_permission_request();
        let outcome = self.platform.request_access(&request.constraints);
        self.complete_permission_request(request, outcome)
    }

    /// First half of a permission request for hosts whose prompt is
    /// asynchronous
    pub fn begin_permission_request(&mut self) -> PermissionRequest {
        self.generation += 1;
        self.pending_request = Some(self.generation);
        // Engine faults of a running loop stay visible until a clean frame
        if !self.is_scanning() {
            self.error = None;
        }
        debug!("Camera permission requested (generation {})", self.generation);

        PermissionRequest {
            generation: self.generation,
            constraints: CameraConstraints {
                facing_mode: self.config.facing_mode,
            },
        }
    }

    /// Second half of a permission request: apply the platform's answer
    ///
    /// Returns [`ScanError::SessionClosed`] without touching the session if
    /// the ticket is stale.
    pub fn complete_permission_request(
        &mut self,
        request: PermissionRequest,
        outcome: std::result::Result<(), AccessError>,
    ) -> Result<()> {
        if self.pending_request != Some(request.generation) {
            debug!(
                "Ignoring stale permission answer (generation {}, current {:?})",
                request.generation, self.pending_request
            );
            return Err(ScanError::SessionClosed);
        }
        self.pending_request = None;

        match outcome {
            Ok(()) => {
                info!("Camera permission granted");
                self.has_permission = true;
                self.refresh_devices()
            }
            Err(err) => {
                self.has_permission = false;
                // A running loop may not keep the camera without permission
                if self.is_scanning() {
                    self.teardown_loop();
                    debug!("Decode loop stopped after permission loss");
                }
                self.fail(err.into())
            }
        }
    }

    /// Re-enumerate video inputs and pick a default device
    ///
    /// An existing selection is kept if the device is still present.
    /// Otherwise the first device whose label matches a rear-camera keyword
    /// is chosen, falling back to the first device.
    pub fn refresh_devices(&mut self) -> Result<()> {
        match self.platform.enumerate_devices() {
            Ok(devices) => {
                self.devices = devices;
                self.select_default_device();
                debug!(
                    "Found {} camera(s), selected {:?}",
                    self.devices.len(),
                    self.selected_device_id
                );
                Ok(())
            }
            Err(err) => {
                self.devices.clear();
                self.fail(ScanError::DeviceEnumeration(err.to_string()))
            }
        }
    }

    fn select_default_device(&mut self) {
        let still_present = self
            .selected_device_id
            .as_ref()
            .is_some_and(|id| self.devices.iter().any(|d| &d.device_id == id));
        if still_present {
            return;
        }

        let keywords = &self.config.rear_camera_keywords;
        self.selected_device_id = self
            .devices
            .iter()
            .find(|d| d.label_matches(keywords))
            .or_else(|| self.devices.first())
            .map(|d| d.device_id.clone());
    }

    // === Decode loop ===

    /// Start the decode loop on the selected device
    ///
    /// Requests permission first if it has not been granted. A loop that is
    /// already running is stopped before the new one starts.
    pub fn start_scanning(&mut self) -> Result<()> {
        if !self.has_permission {
            self.request_permission()?;
        }

        if self.sink.is_none() {
            return self.fail(ScanError::NotInitialized);
        }

        let device_id = match self
            .selected_device_id
            .clone()
            .or_else(|| self.devices.first().map(|d| d.device_id.clone()))
        {
            Some(id) => id,
            None => return self.fail(ScanError::NoDevice),
        };

        if self.is_scanning() {
            self.teardown_loop();
        }
        self.error = None;
        self.consecutive_engine_errors = 0;

        let started = match self.sink.as_ref() {
            Some(sink) => self.engine.start(&device_id, sink),
            None => return self.fail(ScanError::NotInitialized),
        };

        match started {
            Ok(()) => {
                info!("Decode loop started on camera {}", device_id);
                self.selected_device_id = Some(device_id.clone());
                self.active_device_id = Some(device_id);
                Ok(())
            }
            Err(err) => self.fail(ScanError::EngineStart(err.0)),
        }
    }

    /// Process one frame from the running decode loop
    ///
    /// A payload that validates as an ISBN is normalized, reported to the
    /// observer, and ends the loop. Payloads that are not ISBNs and empty
    /// frames are ignored. Engine faults are reported and, after
    /// `max_consecutive_engine_errors` in a row, end the loop.
    pub fn handle_frame(&mut self, outcome: DecodeOutcome) -> FrameVerdict {
        if !self.is_scanning() {
            return FrameVerdict::Inactive;
        }

        match outcome {
            DecodeOutcome::Decoded(text) => {
                self.clear_engine_fault();
                if !validate_isbn(&text).is_valid {
                    debug!("Ignoring non-ISBN barcode {:?}", text);
                    return FrameVerdict::Ignored;
                }

                let result = ScanResult::success(normalize_isbn(&text));
                info!("Scanned ISBN {}", result.isbn);
                self.observer.on_scan_success(result.clone());
                self.stop_scanning();
                FrameVerdict::Accepted(result)
            }
            DecodeOutcome::NotFound => {
                self.clear_engine_fault();
                FrameVerdict::Ignored
            }
            DecodeOutcome::Failed(err) => {
                self.consecutive_engine_errors += 1;
                let limit = self.config.max_consecutive_engine_errors;

                if limit > 0 && self.consecutive_engine_errors >= limit {
                    let count = self.consecutive_engine_errors;
                    warn!("Decode engine failed {} times in a row, stopping", count);
                    self.teardown_loop();
                    self.consecutive_engine_errors = 0;
                    self.record_error(ScanError::EngineAborted { count });
                    return FrameVerdict::Aborted;
                }

                self.record_error(ScanError::Decode(err.0));
                FrameVerdict::Fault
            }
        }
    }

    /// Stop the decode loop and release the camera
    ///
    /// Safe to call in any state and any number of times. Clears the
    /// current error, returning the session to `Permitted` or `Idle`.
    pub fn stop_scanning(&mut self) {
        if self.teardown_loop() {
            debug!("Decode loop stopped");
        }
        self.error = None;
        self.consecutive_engine_errors = 0;
    }

    /// Select the next camera, round-robin
    ///
    /// No-op with fewer than two known devices. If a loop is running it is
    /// stopped and then restarted on the new device.
    pub fn switch_camera(&mut self) -> Result<()> {
        let count = self.devices.len();
        if count < 2 {
            debug!("Camera switch ignored, {} device(s) known", count);
            return Ok(());
        }

        let current = self
            .selected_device_id
            .as_ref()
            .and_then(|id| self.devices.iter().position(|d| &d.device_id == id));
        let next = current.map_or(0, |i| (i + 1) % count);
        let next_id = self.devices[next].device_id.clone();

        info!(
            "Switching camera from {:?} to {}",
            self.selected_device_id, next_id
        );
        self.selected_device_id = Some(next_id);

        if self.is_scanning() {
            self.stop_scanning();
            return self.start_scanning();
        }
        Ok(())
    }

    /// End the session: stop scanning and reset to `Idle`
    ///
    /// Any outstanding permission prompt is invalidated, so its answer is
    /// ignored when it arrives. The video sink stays attached.
    pub fn close(&mut self) {
        self.stop_scanning();
        self.generation += 1;
        self.pending_request = None;
        self.has_permission = false;
        self.devices.clear();
        self.selected_device_id = None;
        debug!("Scan session closed");
    }

    // === Internals ===

    /// Reset the engine unconditionally; returns whether a loop was running
    fn teardown_loop(&mut self) -> bool {
        let was_running = self.active_device_id.take().is_some();
        self.engine.reset();
        was_running
    }

    fn clear_engine_fault(&mut self) {
        self.consecutive_engine_errors = 0;
        if matches!(self.error, Some(ScanError::Decode(_))) {
            self.error = None;
        }
    }

    fn record_error(&mut self, err: ScanError) {
        match err.detail() {
            Some(detail) => warn!("Scan error: {} ({})", err, detail),
            None => warn!("Scan error: {}", err),
        }
        self.observer.on_scan_error(&err.to_string());
        self.error = Some(err);
    }

    fn fail<T>(&mut self, err: ScanError) -> Result<T> {
        self.record_error(err.clone());
        Err(err)
    }
}

impl<P, E, O> Drop for ScanSession<P, E, O>
where
    P: CameraPlatform,
    E: DecodeEngine,
    O: ScanObserver,
{
    fn drop(&mut self) {
        if self.active_device_id.is_some() {
            self.teardown_loop();
        }
    }
}
