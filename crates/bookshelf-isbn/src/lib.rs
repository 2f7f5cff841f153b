// Allow manual modulo checks since .is_multiple_of() is nightly-only
#![allow(clippy::manual_is_multiple_of)]

//! ISBN handling for the bookshelf scanner
//!
//! This crate is the single source of truth for "is this ISBN valid" and
//! "what is its canonical form":
//! - Normalization (strip punctuation and whitespace, uppercase the `X`)
//! - ISBN-10 and ISBN-13 check-digit validation
//! - Hyphenated display formatting
//! - ISBN-10 to ISBN-13 conversion
//! - ISBN extraction from free text
//!
//! Every function is pure. Malformed input is an expected case and is
//! reported as a value (`false`, `None`, or the input echoed back), never as
//! an error or a panic.

pub mod conversions;
pub mod extractors;
pub mod formatters;
pub mod validators;

pub use conversions::*;
pub use extractors::*;
pub use formatters::*;
pub use validators::*;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
