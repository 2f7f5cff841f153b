//! Platform capabilities the scan session is built on
//!
//! The session never touches a camera or a barcode decoder directly. Hosts
//! implement these traits over their media stack (a browser's
//! `getUserMedia` plus a barcode reader, a native camera API, ...) and the
//! [`simulated`](crate::simulated) module implements them for tests and the
//! CLI.

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, EngineError};
use crate::result::ScanResult;

/// Which way a camera faces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera, towards the user
    User,
    /// Rear camera, away from the user
    #[default]
    Environment,
}

/// Constraints passed along with a camera access request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConstraints {
    pub facing_mode: FacingMode,
}

/// A video input as reported by device enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct CameraDevice {
    /// Opaque platform identifier
    pub device_id: String,
    /// Human-readable label (may be empty before permission is granted)
    pub label: String,
}

impl CameraDevice {
    pub fn new(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
        }
    }

    /// Whether the label contains any of the given keywords, ignoring case
    pub fn label_matches(&self, keywords: &[String]) -> bool {
        let label = self.label.to_lowercase();
        keywords
            .iter()
            .any(|keyword| label.contains(&keyword.to_lowercase()))
    }
}

/// Camera permission and device discovery
pub trait CameraPlatform {
    /// Ask for camera access.
    ///
    /// Any probe stream opened to trigger the prompt must be closed before
    /// returning; the decode engine opens its own.
    fn request_access(
        &mut self,
        constraints: &CameraConstraints,
    ) -> std::result::Result<(), AccessError>;

    /// List video inputs. Only called after access was granted.
    fn enumerate_devices(&mut self) -> std::result::Result<Vec<CameraDevice>, AccessError>;
}

/// A continuous barcode decode loop bound to one camera
///
/// After a successful `start`, the host delivers one [`DecodeOutcome`] per
/// processed frame to [`ScanSession::handle_frame`](crate::ScanSession::handle_frame)
/// until `reset` is called.
pub trait DecodeEngine {
    /// Where the engine renders the live preview (a `<video>` element, a
    /// surface handle, ...)
    type Sink;

    /// Open `device_id`, render into `sink` and begin decoding frames.
    fn start(&mut self, device_id: &str, sink: &Self::Sink)
        -> std::result::Result<(), EngineError>;

    /// Stop decoding and release the camera. Must be safe to call when no
    /// loop is running. The camera is released by the time this returns.
    fn reset(&mut self);
}

/// What the decode engine saw in one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A barcode was read; the payload is not necessarily an ISBN
    Decoded(String),
    /// No barcode in this frame, the normal steady state
    NotFound,
    /// The engine itself failed while processing the frame
    Failed(EngineError),
}

/// Receives the results of a scan session
pub trait ScanObserver {
    /// A valid ISBN was scanned or entered. Called at most once per decode
    /// loop.
    fn on_scan_success(&mut self, result: ScanResult);

    /// A permission, start or engine error, as a user-facing message.
    fn on_scan_error(&mut self, message: &str);
}

impl<T: ScanObserver + ?Sized> ScanObserver for Box<T> {
    fn on_scan_success(&mut self, result: ScanResult) {
        (**self).on_scan_success(result)
    }

    fn on_scan_error(&mut self, message: &str) {
        (**self).on_scan_error(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        vec!["back".into(), "rear".into(), "environment".into()]
    }

    #[test]
    fn test_label_matches_is_case_insensitive() {
        let device = CameraDevice::new("cam-1", "Back Camera");
        assert!(device.label_matches(&keywords()));

        let device = CameraDevice::new("cam-2", "camera2 1, facing ENVIRONMENT");
        assert!(device.label_matches(&keywords()));
    }

    #[test]
    fn test_label_does_not_match() {
        let device = CameraDevice::new("cam-1", "FaceTime HD Camera");
        assert!(!device.label_matches(&keywords()));
        assert!(!CameraDevice::new("cam-2", "").label_matches(&keywords()));
    }

    #[test]
    fn test_facing_mode_serializes_like_media_constraints() {
        let json = serde_json::to_string(&FacingMode::Environment).unwrap();
        assert_eq!(json, "\"environment\"");
    }

    #[test]
    fn test_default_facing_mode_is_rear() {
        assert_eq!(FacingMode::default(), FacingMode::Environment);
    }
}
