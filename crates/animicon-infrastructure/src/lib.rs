//! Infrastructure adapters for Animicon: file paths, configuration and
//! secrets, the system clipboard, artifact export and logging.

pub mod clipboard;
pub mod config_service;
pub mod file_saver;
pub mod logging;
pub mod paths;
pub mod secret_service;

pub use clipboard::SystemClipboard;
pub use config_service::ConfigService;
pub use file_saver::DownloadDirSaver;
pub use paths::AnimiconPaths;
pub use secret_service::SecretServiceImpl;
