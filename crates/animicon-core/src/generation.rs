//! Capability interfaces for the external generation backend.
//!
//! The session controller only knows these two traits. The Gemini-backed
//! implementation lives in `animicon-interaction`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a generation capability.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationError {
    /// The request never produced an HTTP response (connect, timeout, ...).
    #[error("Generation request failed: {message}")]
    Transport { message: String, retryable: bool },

    /// The backend answered with a non-success status.
    #[error("Generation backend returned {status}: {message}")]
    Http {
        status: u16,
        message: String,
        retryable: bool,
    },

    /// The backend answered but produced no text at all.
    #[error("Generation backend returned an empty response")]
    EmptyResponse,

    /// The backend produced text that could not be interpreted.
    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),

    /// The backend could not be set up (missing key, bad template, ...).
    #[error("Generation backend misconfigured: {0}")]
    Configuration(String),
}

impl GenerationError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } | Self::Http { retryable, .. } => *retryable,
            Self::EmptyResponse => true,
            Self::MalformedResponse(_) | Self::Configuration(_) => false,
        }
    }
}

/// Proposes candidate animations for an icon description.
#[async_trait::async_trait]
pub trait AnimationProposer: Send + Sync {
    /// Returns animation ideas in presentation order.
    ///
    /// An empty vector means the backend had nothing to suggest; it is not an
    /// error.
    async fn propose_animations(&self, description: &str) -> Result<Vec<String>, GenerationError>;
}

/// Renders an animated icon from a description and a chosen animation.
#[async_trait::async_trait]
pub trait IconGenerator: Send + Sync {
    /// Returns the rendered vector markup.
    async fn generate_animated_icon(
        &self,
        description: &str,
        animation: &str,
    ) -> Result<String, GenerationError>;
}
