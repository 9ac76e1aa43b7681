#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use animicon_core::effects::{ClipboardError, ClipboardWriter, FileSaver};
use animicon_core::generation::{AnimationProposer, GenerationError, IconGenerator};
use animicon_core::session::SessionController;
use tokio::sync::Notify;

/// Backend that answers from queued responses and records every call.
///
/// With `held()`, every call parks until `release()` is called once per call.
#[derive(Default)]
pub struct ScriptedBackend {
    proposals: Mutex<VecDeque<Result<Vec<String>, GenerationError>>>,
    icons: Mutex<VecDeque<Result<String, GenerationError>>>,
    pub proposal_calls: Mutex<Vec<String>>,
    pub icon_calls: Mutex<Vec<(String, String)>>,
    hold: Option<Arc<Notify>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held() -> Self {
        Self {
            hold: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub fn release(&self) {
        if let Some(hold) = &self.hold {
            hold.notify_one();
        }
    }

    pub fn with_proposal(self, result: Result<Vec<&str>, GenerationError>) -> Self {
        self.proposals
            .lock()
            .unwrap()
            .push_back(result.map(|items| items.into_iter().map(String::from).collect()));
        self
    }

    pub fn with_icon(self, result: Result<&str, GenerationError>) -> Self {
        self.icons
            .lock()
            .unwrap()
            .push_back(result.map(String::from));
        self
    }

    pub fn proposal_call_count(&self) -> usize {
        self.proposal_calls.lock().unwrap().len()
    }

    pub fn icon_call_count(&self) -> usize {
        self.icon_calls.lock().unwrap().len()
    }

    async fn wait_if_held(&self) {
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
    }
}

#[async_trait::async_trait]
impl AnimationProposer for ScriptedBackend {
    async fn propose_animations(&self, description: &str) -> Result<Vec<String>, GenerationError> {
        self.proposal_calls
            .lock()
            .unwrap()
            .push(description.to_string());
        self.wait_if_held().await;
        self.proposals
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::EmptyResponse))
    }
}

#[async_trait::async_trait]
impl IconGenerator for ScriptedBackend {
    async fn generate_animated_icon(
        &self,
        description: &str,
        animation: &str,
    ) -> Result<String, GenerationError> {
        self.icon_calls
            .lock()
            .unwrap()
            .push((description.to_string(), animation.to_string()));
        self.wait_if_held().await;
        self.icons
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::EmptyResponse))
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub copies: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingClipboard {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl ClipboardWriter for RecordingClipboard {
    async fn copy_to_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        self.copies.lock().unwrap().push(text.to_string());
        if self.fail {
            Err(ClipboardError::Rejected("permission denied".into()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct RecordingSaver {
    pub saves: Mutex<Vec<(String, String, String)>>,
}

impl FileSaver for RecordingSaver {
    fn save_file(&self, content: &str, filename: &str, mime_type: &str) {
        self.saves.lock().unwrap().push((
            content.to_string(),
            filename.to_string(),
            mime_type.to_string(),
        ));
    }
}

pub struct Harness {
    pub controller: Arc<SessionController>,
    pub backend: Arc<ScriptedBackend>,
    pub clipboard: Arc<RecordingClipboard>,
    pub saver: Arc<RecordingSaver>,
}

impl Harness {
    pub fn new(backend: ScriptedBackend) -> Self {
        Self::with_clipboard(backend, RecordingClipboard::default())
    }

    pub fn with_clipboard(backend: ScriptedBackend, clipboard: RecordingClipboard) -> Self {
        let backend = Arc::new(backend);
        let clipboard = Arc::new(clipboard);
        let saver = Arc::new(RecordingSaver::default());
        let controller = Arc::new(SessionController::with_backend(
            backend.clone(),
            clipboard.clone(),
            saver.clone(),
        ));
        Self {
            controller,
            backend,
            clipboard,
            saver,
        }
    }
}

pub fn backend_down() -> GenerationError {
    GenerationError::Http {
        status: 503,
        message: "UNAVAILABLE".into(),
        retryable: true,
    }
}
