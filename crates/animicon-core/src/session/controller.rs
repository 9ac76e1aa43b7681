use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::flash::ClipboardFlash;
use super::outcome::{IntentOutcome, Rejection};
use super::phase::Phase;
use super::state::{ErrorMessage, SessionState};
use crate::effects::{ClipboardWriter, EXPORT_FILENAME, EXPORT_MIME_TYPE, FileSaver};
use crate::generation::{AnimationProposer, IconGenerator};

/// Receiver that yields every published session snapshot.
pub type SessionWatcher = watch::Receiver<SessionState>;

/// The single authoritative session record plus its change feed.
///
/// The mutex is never held across an await point.
struct SessionCell {
    state: Mutex<SessionState>,
    updates: watch::Sender<SessionState>,
}

impl SessionCell {
    fn new(initial: SessionState) -> Self {
        let (updates, _) = watch::channel(initial.clone());
        Self {
            state: Mutex::new(initial),
            updates,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    /// Applies `f` under the lock and publishes the result if anything changed.
    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = guard.clone();
        let result = f(&mut guard);
        if *guard != before {
            self.updates.send_replace(guard.clone());
        }
        result
    }
}

/// Drives one icon-creation session.
///
/// `SessionController` is responsible for:
/// - Validating every intent against the current phase
/// - Keeping at most one generation request outstanding
/// - Folding backend results and failures into the session state
/// - Running the copy/export side effects
///
/// It is `Send + Sync`; share it behind an `Arc` to issue intents from
/// several tasks. Overlapping generation intents are rejected, not queued.
pub struct SessionController {
    cell: Arc<SessionCell>,
    flash: ClipboardFlash,
    proposer: Arc<dyn AnimationProposer>,
    generator: Arc<dyn IconGenerator>,
    clipboard: Arc<dyn ClipboardWriter>,
    saver: Arc<dyn FileSaver>,
}

impl SessionController {
    /// Creates a controller for a fresh session in [`Phase::Idle`].
    pub fn new(
        proposer: Arc<dyn AnimationProposer>,
        generator: Arc<dyn IconGenerator>,
        clipboard: Arc<dyn ClipboardWriter>,
        saver: Arc<dyn FileSaver>,
    ) -> Self {
        Self {
            cell: Arc::new(SessionCell::new(SessionState::new())),
            flash: ClipboardFlash::default(),
            proposer,
            generator,
            clipboard,
            saver,
        }
    }

    /// Creates a controller whose backend provides both capabilities.
    pub fn with_backend<B>(
        backend: Arc<B>,
        clipboard: Arc<dyn ClipboardWriter>,
        saver: Arc<dyn FileSaver>,
    ) -> Self
    where
        B: AnimationProposer + IconGenerator + 'static,
    {
        let proposer: Arc<dyn AnimationProposer> = backend.clone();
        let generator: Arc<dyn IconGenerator> = backend;
        Self::new(proposer, generator, clipboard, saver)
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.cell.read(SessionState::clone)
    }

    pub fn phase(&self) -> Phase {
        self.cell.read(|state| state.phase)
    }

    /// Subscribes to state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> SessionWatcher {
        self.cell.updates.subscribe()
    }

    /// Replaces the icon description outside of a request.
    pub fn set_description(&self, description: &str) -> IntentOutcome {
        self.cell.update(|state| {
            if !state.phase.accepts_description() {
                return IntentOutcome::Rejected(Rejection::NotAllowed(state.phase));
            }
            state.icon_description = description.to_string();
            IntentOutcome::Applied(state.phase)
        })
    }

    /// Asks the backend for animation ideas for `description`.
    ///
    /// Legal from `Idle` and `ArtifactReady`. A blank description only sets
    /// the validation error. Backend failures end in `Idle` with an error;
    /// they are never returned to the caller.
    pub async fn request_suggestions(&self, description: &str) -> IntentOutcome {
        let begin = self.cell.update(|state| {
            if state.is_busy() {
                return Err(Rejection::Busy(state.phase));
            }
            if !state.phase.accepts_description() {
                return Err(Rejection::NotAllowed(state.phase));
            }
            if description.trim().is_empty() {
                state.icon_description = description.to_string();
                state.error = Some(ErrorMessage::DescriptionRequired);
                return Ok(None);
            }
            Ok(Some(state.begin_proposal(description)))
        });

        let round = match begin {
            Ok(Some(round)) => round,
            Ok(None) => {
                tracing::debug!("[session] Blank description, not contacting backend");
                return IntentOutcome::Applied(self.phase());
            }
            Err(rejection) => {
                tracing::debug!("[session] request_suggestions rejected: {}", rejection);
                return IntentOutcome::Rejected(rejection);
            }
        };

        tracing::info!("[session] Requesting animation suggestions (round {})", round);
        let result = self.proposer.propose_animations(description).await;

        self.cell.update(|state| {
            if state.round != round {
                tracing::info!(
                    "[session] Dropping suggestions for round {} (current round {})",
                    round,
                    state.round
                );
                return IntentOutcome::Superseded;
            }
            match result {
                Ok(suggestions) => {
                    tracing::info!(
                        "[session] Received {} suggestions (round {})",
                        suggestions.len(),
                        round
                    );
                    state.finish_proposal(suggestions);
                }
                Err(err) => {
                    tracing::warn!("[session] Suggestion generation failed: {}", err);
                    state.fail_proposal();
                }
            }
            IntentOutcome::Applied(state.phase)
        })
    }

    /// Asks the backend to render `chosen` for `description`.
    ///
    /// Fails closed unless the session is in `SuggestionsReady`, `chosen` is
    /// one of the current suggestions, and `description` is the description
    /// those suggestions were made for.
    pub async fn request_artifact(&self, description: &str, chosen: &str) -> IntentOutcome {
        let begin = self.cell.update(|state| {
            if state.is_busy() {
                return Err(Rejection::Busy(state.phase));
            }
            if state.phase != Phase::SuggestionsReady {
                return Err(Rejection::NotAllowed(state.phase));
            }
            if state.icon_description != description {
                return Err(Rejection::StaleDescription);
            }
            if !state.suggestions.iter().any(|s| s == chosen) {
                return Err(Rejection::UnknownSuggestion);
            }
            Ok(state.begin_generation())
        });

        let round = match begin {
            Ok(round) => round,
            Err(rejection) => {
                tracing::debug!("[session] request_artifact rejected: {}", rejection);
                return IntentOutcome::Rejected(rejection);
            }
        };

        tracing::info!(
            "[session] Generating animated icon for '{}' (round {})",
            chosen,
            round
        );
        let result = self
            .generator
            .generate_animated_icon(description, chosen)
            .await;

        self.cell.update(|state| {
            if state.round != round {
                tracing::info!(
                    "[session] Dropping icon for round {} (current round {})",
                    round,
                    state.round
                );
                return IntentOutcome::Superseded;
            }
            match result {
                Ok(markup) => {
                    tracing::info!(
                        "[session] Icon ready, {} bytes (round {})",
                        markup.len(),
                        round
                    );
                    state.finish_generation(markup);
                }
                Err(err) => {
                    tracing::warn!("[session] Icon generation failed: {}", err);
                    state.fail_generation();
                }
            }
            IntentOutcome::Applied(state.phase)
        })
    }

    /// Copies the artifact to the clipboard and flashes the acknowledgment.
    ///
    /// Clipboard failures are silent: the flag simply stays off.
    pub async fn acknowledge_copy(&self) -> IntentOutcome {
        let Some(artifact) = self.cell.read(|state| state.artifact.clone()) else {
            return IntentOutcome::Rejected(Rejection::NoArtifact);
        };

        if let Err(err) = self.clipboard.copy_to_clipboard(&artifact).await {
            tracing::debug!("[session] Clipboard write failed: {}", err);
            return IntentOutcome::Applied(self.phase());
        }

        self.cell.update(|state| {
            if state.artifact.as_deref() != Some(artifact.as_str()) {
                return IntentOutcome::Superseded;
            }
            state.clipboard_flash_active = true;
            let cell = Arc::clone(&self.cell);
            self.flash.arm(move |ticket| {
                cell.update(|state| {
                    if ticket.is_current() {
                        state.clipboard_flash_active = false;
                    }
                });
            });
            IntentOutcome::Applied(state.phase)
        })
    }

    /// Hands the artifact to the file saver as `animated_icon.svg`.
    pub fn export_artifact(&self) -> IntentOutcome {
        let Some((artifact, phase)) = self
            .cell
            .read(|state| state.artifact.clone().map(|a| (a, state.phase)))
        else {
            return IntentOutcome::Rejected(Rejection::NoArtifact);
        };

        tracing::info!(
            "[session] Exporting icon as {} ({} bytes)",
            EXPORT_FILENAME,
            artifact.len()
        );
        self.saver
            .save_file(&artifact, EXPORT_FILENAME, EXPORT_MIME_TYPE);
        IntentOutcome::Applied(phase)
    }

    /// Returns to `Idle`, keeping the description.
    ///
    /// A request still in flight completes as [`IntentOutcome::Superseded`].
    pub fn reset(&self) -> IntentOutcome {
        self.cell.update(|state| {
            if state.is_busy() {
                tracing::info!(
                    "[session] Reset while {}; round {} will be dropped",
                    state.phase,
                    state.round
                );
            }
            state.reset();
            self.flash.cancel();
            IntentOutcome::Applied(state.phase)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::ClipboardError;
    use crate::generation::GenerationError;

    struct StaticBackend;

    #[async_trait::async_trait]
    impl AnimationProposer for StaticBackend {
        async fn propose_animations(&self, _: &str) -> Result<Vec<String>, GenerationError> {
            Ok(vec!["spin".into(), "pulse".into()])
        }
    }

    #[async_trait::async_trait]
    impl IconGenerator for StaticBackend {
        async fn generate_animated_icon(
            &self,
            _: &str,
            animation: &str,
        ) -> Result<String, GenerationError> {
            Ok(format!("<svg data-animation=\"{animation}\"/>"))
        }
    }

    struct NoClipboard;

    #[async_trait::async_trait]
    impl ClipboardWriter for NoClipboard {
        async fn copy_to_clipboard(&self, _: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("test".into()))
        }
    }

    struct NullSaver;

    impl FileSaver for NullSaver {
        fn save_file(&self, _: &str, _: &str, _: &str) {}
    }

    fn controller() -> SessionController {
        SessionController::with_backend(
            Arc::new(StaticBackend),
            Arc::new(NoClipboard),
            Arc::new(NullSaver),
        )
    }

    #[tokio::test]
    async fn test_full_round() {
        let controller = controller();
        let outcome = controller.request_suggestions("a bell").await;
        assert_eq!(outcome, IntentOutcome::Applied(Phase::SuggestionsReady));

        let outcome = controller.request_artifact("a bell", "pulse").await;
        assert_eq!(outcome, IntentOutcome::Applied(Phase::ArtifactReady));
        assert_eq!(
            controller.snapshot().artifact.as_deref(),
            Some("<svg data-animation=\"pulse\"/>")
        );
    }

    #[tokio::test]
    async fn test_blank_description_from_artifact_ready_keeps_artifact() {
        let controller = controller();
        controller.request_suggestions("a bell").await;
        controller.request_artifact("a bell", "spin").await;

        let outcome = controller.request_suggestions("  ").await;

        assert_eq!(outcome, IntentOutcome::Applied(Phase::ArtifactReady));
        let state = controller.snapshot();
        assert_eq!(state.error, Some(ErrorMessage::DescriptionRequired));
        assert!(state.artifact.is_some());
    }

    #[tokio::test]
    async fn test_set_description_locked_while_choosing() {
        let controller = controller();
        assert!(controller.set_description("a bell").is_applied());
        controller.request_suggestions("a bell").await;

        assert_eq!(
            controller.set_description("a whistle"),
            IntentOutcome::Rejected(Rejection::NotAllowed(Phase::SuggestionsReady))
        );
        assert_eq!(controller.snapshot().icon_description, "a bell");
    }

    #[tokio::test]
    async fn test_failed_copy_is_silent() {
        let controller = controller();
        controller.request_suggestions("a bell").await;
        controller.request_artifact("a bell", "spin").await;

        let outcome = controller.acknowledge_copy().await;

        assert_eq!(outcome, IntentOutcome::Applied(Phase::ArtifactReady));
        let state = controller.snapshot();
        assert!(!state.clipboard_flash_active);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_subscriber_sees_latest_state() {
        let controller = controller();
        let mut watcher = controller.subscribe();
        assert_eq!(watcher.borrow_and_update().phase, Phase::Idle);

        controller.request_suggestions("a bell").await;

        assert!(watcher.has_changed().unwrap());
        assert_eq!(watcher.borrow_and_update().phase, Phase::SuggestionsReady);
    }
}
