//! Scan session state machine
//!
//! State transitions:
//! ```text
//! Idle → PermissionPending → Permitted ⇄ Scanning ↺ (switch camera)
//!              ↓                               ↓
//!            Error ←───────────────────────────┘
//! ```
//!
//! The state is derived from the session's fields, not stored.
//!
//! `close()` returns a session to `Idle` from any state.

use serde::{Deserialize, Serialize};

/// Observable state of a scan session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum ScanState {
    /// No permission requested yet, or the session was closed
    #[default]
    Idle,
    /// Waiting for the platform to answer a camera permission prompt
    PermissionPending,
    /// Camera access granted and devices known, no decode loop running
    Permitted,
    /// A decode loop is running against the selected device
    Scanning,
    /// The last permission request, start attempt or decode frame failed
    Error,
}

impl ScanState {
    /// Get a human-readable description of the state
    pub fn description(&self) -> &'static str {
        match self {
            ScanState::Idle => "Scanner closed",
            ScanState::PermissionPending => "Waiting for camera permission",
            ScanState::Permitted => "Camera ready",
            ScanState::Scanning => "Point the camera at the barcode",
            ScanState::Error => "Scanner error",
        }
    }
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanState::Idle => write!(f, "IDLE"),
            ScanState::PermissionPending => write!(f, "PERMISSION_PENDING"),
            ScanState::Permitted => write!(f, "PERMITTED"),
            ScanState::Scanning => write!(f, "SCANNING"),
            ScanState::Error => write!(f, "ERROR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(ScanState::default(), ScanState::Idle);
    }

    #[test]
    fn test_display() {
        assert_eq!(ScanState::PermissionPending.to_string(), "PERMISSION_PENDING");
        assert_eq!(ScanState::Scanning.to_string(), "SCANNING");
    }
}
