//! Side-effect primitives consumed by the session controller.

use thiserror::Error;

/// File name used when the artifact is exported.
pub const EXPORT_FILENAME: &str = "animated_icon.svg";

/// MIME type used when the artifact is exported.
pub const EXPORT_MIME_TYPE: &str = "image/svg+xml";

/// The clipboard refused the write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard mechanism is available on this system.
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard mechanism ran but rejected the content.
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}

/// Writes text to the system clipboard.
#[async_trait::async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn copy_to_clipboard(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Triggers a save of `content` as a named file.
///
/// Fire-and-forget: implementations report problems through logging only.
pub trait FileSaver: Send + Sync {
    fn save_file(&self, content: &str, filename: &str, mime_type: &str);
}
