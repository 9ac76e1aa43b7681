//! Saves exported artifacts to disk.

use std::path::{Path, PathBuf};

use animicon_core::effects::FileSaver;
use animicon_core::error::Result;
use tokio::runtime::Handle;

/// [`FileSaver`] that writes into one export directory.
#[derive(Debug, Clone)]
pub struct DownloadDirSaver {
    directory: PathBuf,
}

impl DownloadDirSaver {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Uses `configured` when set, else the user's download directory, else
    /// the current directory.
    pub fn resolve(configured: Option<&Path>) -> Self {
        let directory = configured
            .map(Path::to_path_buf)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(directory)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes `content` as `filename` and returns the final path.
    pub async fn write(&self, content: &str, filename: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory).await?;
        // Only the final component is honoured.
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| animicon_core::AnimiconError::io(format!("invalid file name: {filename}")))?;
        let path = self.directory.join(name);
        tokio::fs::write(&path, content).await?;
        Ok(path)
    }
}

impl FileSaver for DownloadDirSaver {
    fn save_file(&self, content: &str, filename: &str, mime_type: &str) {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!("[export] No async runtime; dropping save of {}", filename);
            return;
        };

        let saver = self.clone();
        let content = content.to_string();
        let filename = filename.to_string();
        let mime_type = mime_type.to_string();
        handle.spawn(async move {
            match saver.write(&content, &filename).await {
                Ok(path) => {
                    tracing::info!("[export] Saved {} ({}) to {}", filename, mime_type, path.display())
                }
                Err(e) => tracing::warn!("[export] Failed to save {}: {}", filename, e),
            }
        });
    }
}
