//! Configuration service implementation.
//!
//! Loads [`AppConfig`] from `config.toml`, writing the defaults on first run.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use animicon_core::config::AppConfig;
use animicon_core::error::Result;

use crate::paths::AnimiconPaths;

/// Configuration service that loads and caches the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &AnimiconPaths) -> Self {
        Self {
            path: paths.config_file(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file is created with defaults. A file that cannot be parsed
    /// is reported as an error and left untouched.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Writes `config` to disk and refreshes the cache.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(config)?)?;

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(config.clone());
        Ok(())
    }

    fn load_config(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            let default_config = AppConfig::default();
            self.save_config(&default_config)?;
            tracing::info!("[config] Wrote default config to {}", self.path.display());
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: AppConfig = toml::from_str(&content)?;
        tracing::debug!("[config] Loaded {}", self.path.display());
        Ok(config)
    }
}
