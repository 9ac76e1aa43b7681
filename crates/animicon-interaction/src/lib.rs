//! Generation backend for Animicon.
//!
//! Implements [`animicon_core::generation::AnimationProposer`] and
//! [`animicon_core::generation::IconGenerator`] on top of the Gemini REST API.

pub mod gemini_backend;
pub mod parsing;
pub mod prompts;

pub use gemini_backend::GeminiBackend;
