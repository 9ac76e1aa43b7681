//! Unified path management for animicon configuration files.
//!
//! ```text
//! ~/.config/animicon/          # Config directory (or --config-dir)
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! └── logs/                    # Application logs
//!     └── animicon.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use animicon_core::config::SecretConfig;
use animicon_core::{AnimiconError, error::Result};

const APP_DIR: &str = "animicon";
const CONFIG_FILE: &str = "config.toml";
const SECRET_FILE: &str = "secret.json";
const LOGS_DIR: &str = "logs";

/// Errors that can occur during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Platform config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

impl From<PathError> for AnimiconError {
    fn from(err: PathError) -> Self {
        AnimiconError::config(err.to_string())
    }
}

/// Resolves every file animicon reads or writes.
///
/// `base` overrides the platform config directory; tests point it at a
/// temporary directory.
#[derive(Debug, Clone)]
pub struct AnimiconPaths {
    base: PathBuf,
}

impl AnimiconPaths {
    pub fn new(base: Option<&Path>) -> std::result::Result<Self, PathError> {
        let base = match base {
            Some(path) => path.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::ConfigDirNotFound)?
                .join(APP_DIR),
        };
        Ok(Self { base })
    }

    pub fn config_dir(&self) -> &Path {
        &self.base
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join(CONFIG_FILE)
    }

    /// Path to `secret.json`. Keep it at mode 600.
    pub fn secret_file(&self) -> PathBuf {
        self.base.join(SECRET_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base.join(LOGS_DIR)
    }

    /// Creates `secret.json` with an empty template if it does not exist yet.
    pub fn ensure_secret_file(&self) -> Result<PathBuf> {
        let secret_path = self.secret_file();
        if secret_path.exists() {
            return Ok(secret_path);
        }

        std::fs::create_dir_all(&self.base)?;

        let template = SecretConfig {
            gemini: Some(animicon_core::config::GeminiSecret {
                api_key: String::new(),
            }),
        };
        std::fs::write(&secret_path, serde_json::to_string_pretty(&template)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&secret_path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!("[paths] Created secret template at {}", secret_path.display());
        Ok(secret_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_base() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AnimiconPaths::new(Some(dir.path())).unwrap();

        assert_eq!(paths.config_dir(), dir.path());
        assert!(paths.config_file().ends_with("config.toml"));
        assert!(paths.secret_file().starts_with(dir.path()));
        assert!(paths.logs_dir().ends_with("logs"));
    }

    #[test]
    fn test_default_base_ends_with_app_dir() {
        if let Ok(paths) = AnimiconPaths::new(None) {
            assert!(paths.config_dir().ends_with("animicon"));
        }
    }

    #[test]
    fn test_ensure_secret_file_writes_template_once() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AnimiconPaths::new(Some(dir.path().join("nested").as_path())).unwrap();

        let path = paths.ensure_secret_file().unwrap();
        let written: SecretConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.gemini.unwrap().api_key, "");

        std::fs::write(&path, r#"{"gemini":{"api_key":"kept"}}"#).unwrap();
        paths.ensure_secret_file().unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("kept"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
