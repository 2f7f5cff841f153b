//! bookshelf-scanner - ISBN barcode scanning for the bookshelf app
//!
//! This crate turns a camera and a barcode decoder into a stream of
//! validated ISBNs. It owns no hardware: hosts provide a [`CameraPlatform`]
//! and a [`DecodeEngine`] and receive results through a [`ScanObserver`].
//!
//! # Key Components
//!
//! - **ScanSession**: permission, device discovery, the decode loop and
//!   camera switching as an explicit state machine
//! - **ManualIsbnEntry**: typed-in ISBNs producing the same [`ScanResult`]
//! - **ScanFlow**: the scanner screen, switching between camera and manual
//!   entry
//! - **simulated**: in-memory platform and engine for replay and tests
//!
//! ISBN rules themselves live in `bookshelf-isbn`.

pub mod config;
pub mod error;
pub mod flow;
pub mod manual;
pub mod platform;
pub mod result;
pub mod session;
pub mod simulated;
pub mod state;

pub use config::*;
pub use error::{AccessError, ConfigError, EngineError, ManualEntryError, ScanError};
pub use flow::*;
pub use manual::*;
pub use platform::*;
pub use result::*;
pub use session::*;
pub use state::*;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
