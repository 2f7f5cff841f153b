//! Error types for bookshelf-scanner
//!
//! Nothing here is fatal. Every variant is reported to the caller as data
//! (a `Result` and, for session errors, the observer's error callback) and
//! the session stays usable afterwards.

use thiserror::Error;

/// Result type alias for scan session operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors surfaced by a scan session
///
/// The `Display` text is the user-facing message handed to
/// `ScanObserver::on_scan_error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The user or platform refused camera access
    #[error("Camera access denied. Please enable camera permissions in your settings.")]
    PermissionDenied,

    /// The device has no camera at all
    #[error("No camera found on this device.")]
    NoCamera,

    /// Camera access failed for another reason
    #[error("Failed to access camera. Please check your camera permissions.")]
    AccessFailed(String),

    /// Permission was granted but listing video inputs failed
    #[error("Failed to access camera devices")]
    DeviceEnumeration(String),

    /// No video sink was attached before starting
    #[error("Scanner not properly initialized")]
    NotInitialized,

    /// Permission granted but no video input is known
    #[error("No camera device available")]
    NoDevice,

    /// The decode engine refused to start on the selected device
    #[error("Failed to start camera")]
    EngineStart(String),

    /// The decode engine reported a fault for a frame
    #[error("Scanning error occurred")]
    Decode(String),

    /// Too many consecutive engine faults; the loop was torn down
    #[error("Scanning stopped after {count} consecutive errors")]
    EngineAborted { count: u32 },

    /// A permission answer arrived for a session that was closed or
    /// re-requested in the meantime
    #[error("Scan session was closed")]
    SessionClosed,
}

impl ScanError {
    /// Whether the user can fix this by retrying the permission prompt
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            ScanError::PermissionDenied | ScanError::NoCamera | ScanError::AccessFailed(_)
        )
    }

    /// Underlying platform or engine detail, for logs
    pub fn detail(&self) -> Option<&str> {
        match self {
            ScanError::AccessFailed(detail)
            | ScanError::DeviceEnumeration(detail)
            | ScanError::EngineStart(detail)
            | ScanError::Decode(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Camera access failure reported by a [`CameraPlatform`](crate::CameraPlatform)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Permission prompt refused (`NotAllowedError` on the web)
    #[error("camera permission not allowed")]
    NotAllowed,

    /// No matching video input (`NotFoundError` on the web)
    #[error("no camera found")]
    NotFound,

    /// Anything else the platform reports
    #[error("camera access failed: {0}")]
    Other(String),
}

impl From<AccessError> for ScanError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotAllowed => ScanError::PermissionDenied,
            AccessError::NotFound => ScanError::NoCamera,
            AccessError::Other(detail) => ScanError::AccessFailed(detail),
        }
    }
}

/// Hard fault reported by a [`DecodeEngine`](crate::DecodeEngine)
///
/// "No barcode in this frame" is not an engine error; engines report it as
/// [`DecodeOutcome::NotFound`](crate::DecodeOutcome::NotFound).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Rejection from the manual ISBN entry path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManualEntryError {
    /// Nothing ISBN-like was entered
    #[error("Please enter an ISBN")]
    Empty,

    /// Input does not normalize to a checksum-valid ISBN-10 or ISBN-13
    #[error("Invalid ISBN format. Please enter a valid 10 or 13 digit ISBN.")]
    Malformed,
}

/// Configuration validation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Required field is missing or empty
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Config text could not be parsed
    #[error("Invalid config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_classification() {
        assert_eq!(ScanError::from(AccessError::NotAllowed), ScanError::PermissionDenied);
        assert_eq!(ScanError::from(AccessError::NotFound), ScanError::NoCamera);
        assert_eq!(
            ScanError::from(AccessError::Other("busy".into())),
            ScanError::AccessFailed("busy".into())
        );
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(ScanError::NoCamera.to_string(), "No camera found on this device.");
        assert_eq!(
            ScanError::Decode("checksum".into()).to_string(),
            "Scanning error occurred"
        );
        assert!(ScanError::EngineAborted { count: 3 }.to_string().contains('3'));
        assert_eq!(ManualEntryError::Empty.to_string(), "Please enter an ISBN");
    }

    #[test]
    fn test_permission_errors() {
        assert!(ScanError::PermissionDenied.is_permission_error());
        assert!(ScanError::AccessFailed("x".into()).is_permission_error());
        assert!(!ScanError::NoDevice.is_permission_error());
        assert!(!ScanError::Decode("x".into()).is_permission_error());
    }

    #[test]
    fn test_detail() {
        assert_eq!(ScanError::EngineStart("busy".into()).detail(), Some("busy"));
        assert_eq!(ScanError::PermissionDenied.detail(), None);
    }
}
