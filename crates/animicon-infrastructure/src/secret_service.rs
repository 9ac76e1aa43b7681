//! Secret service implementation.
//!
//! Reads the Gemini API key from `secret.json`, with `GEMINI_API_KEY` taking
//! precedence when set.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use animicon_core::config::{GeminiSecret, SecretConfig};
use animicon_core::secret::SecretService;

use crate::paths::AnimiconPaths;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Service for loading secret configuration.
///
/// The loaded config is cached after the first successful read.
///
/// # Example
///
/// ```ignore
/// use animicon_infrastructure::{AnimiconPaths, SecretServiceImpl};
/// use animicon_core::secret::SecretService;
///
/// let service = SecretServiceImpl::new(&AnimiconPaths::new(None)?);
/// let secrets = service.load_secrets().await?;
/// ```
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    env_key: Option<String>,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    pub fn new(paths: &AnimiconPaths) -> Self {
        Self::with_env_key(paths, std::env::var(API_KEY_ENV).ok())
    }

    /// Uses `env_key` in place of the process environment.
    pub fn with_env_key(paths: &AnimiconPaths, env_key: Option<String>) -> Self {
        Self {
            path: paths.secret_file(),
            env_key: env_key.filter(|key| !key.trim().is_empty()),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig, String> {
        {
            let read_lock = self.secrets.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)
                .map_err(|e| format!("Failed to read {}: {}", self.path.display(), e))?;
            serde_json::from_str::<SecretConfig>(&content)
                .map_err(|e| format!("Failed to parse {}: {}", self.path.display(), e))?
        } else {
            SecretConfig::default()
        };

        // Placeholder templates carry an empty key.
        if loaded
            .gemini
            .as_ref()
            .is_some_and(|gemini| gemini.api_key.trim().is_empty())
        {
            loaded.gemini = None;
        }

        if let Some(api_key) = &self.env_key {
            tracing::debug!("[secret] Using {} from environment", API_KEY_ENV);
            loaded.gemini = Some(GeminiSecret {
                api_key: api_key.clone(),
            });
        }

        {
            let mut write_lock = self.secrets.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.load_secrets_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_in(dir: &tempfile::TempDir) -> AnimiconPaths {
        AnimiconPaths::new(Some(dir.path())).unwrap()
    }

    #[tokio::test]
    async fn test_reads_key_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("secret.json"),
            r#"{"gemini":{"api_key":"from-file"}}"#,
        )
        .unwrap();
        let service = SecretServiceImpl::with_env_key(&paths_in(&dir), None);

        let secrets = service.load_secrets().await.unwrap();

        assert!(service.secret_file_exists().await);
        assert_eq!(secrets.gemini.unwrap().api_key, "from-file");
    }

    #[tokio::test]
    async fn test_env_key_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("secret.json"),
            r#"{"gemini":{"api_key":"from-file"}}"#,
        )
        .unwrap();
        let service =
            SecretServiceImpl::with_env_key(&paths_in(&dir), Some("from-env".to_string()));

        let secrets = service.load_secrets().await.unwrap();

        assert_eq!(secrets.gemini.unwrap().api_key, "from-env");
    }

    #[tokio::test]
    async fn test_missing_file_and_template_yield_no_key() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(&dir);
        let service = SecretServiceImpl::with_env_key(&paths, Some("  ".to_string()));
        assert!(!service.secret_file_exists().await);
        assert!(service.load_secrets().await.unwrap().gemini.is_none());

        paths.ensure_secret_file().unwrap();
        let service = SecretServiceImpl::with_env_key(&paths, None);
        assert!(service.load_secrets().await.unwrap().gemini.is_none());
    }

    #[tokio::test]
    async fn test_broken_file_reports_path_not_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secret.json"), "{ sk-live-oops").unwrap();
        let service = SecretServiceImpl::with_env_key(&paths_in(&dir), None);

        let err = service.load_secrets().await.unwrap_err();

        assert!(err.contains("secret.json"));
        assert!(!err.contains("sk-live-oops"));
    }
}
