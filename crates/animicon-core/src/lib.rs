//! Domain layer for Animicon.
//!
//! Holds the icon-creation session state machine and the interfaces it
//! consumes. Nothing in here performs I/O; the generation backend, clipboard
//! and file saver are injected as trait objects.

pub mod config;
pub mod effects;
pub mod error;
pub mod generation;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::AnimiconError;
