//! The authoritative data model for one icon-creation session.
//!
//! Every transition is a method on [`SessionState`] so that the invariants
//! below hold no matter who drives the state:
//!
//! - `suggestions` is non-empty only in [`Phase::SuggestionsReady`]
//! - `artifact` is set only in [`Phase::ArtifactReady`]
//! - `error` is cleared whenever a new attempt begins

use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// User-visible failure shown next to the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMessage {
    /// Suggestions were requested with a blank description.
    DescriptionRequired,
    /// The backend succeeded but had no suggestions.
    NoSuggestions,
    /// The backend failed while proposing suggestions.
    SuggestionGenerationFailed,
    /// The backend failed while generating the icon.
    ArtifactGenerationFailed,
}

impl ErrorMessage {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorMessage::DescriptionRequired => "Please describe the icon first.",
            ErrorMessage::NoSuggestions => {
                "We couldn't find any suggestions. Try describing the icon differently."
            }
            ErrorMessage::SuggestionGenerationFailed => {
                "Something went wrong while suggesting animations. Please try again."
            }
            ErrorMessage::ArtifactGenerationFailed => {
                "Something went wrong while creating the animated icon. Please try again."
            }
        }
    }
}

impl std::fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a session. Cheap to clone, safe to hand to renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub icon_description: String,
    pub phase: Phase,
    pub suggestions: Vec<String>,
    pub artifact: Option<String>,
    pub error: Option<ErrorMessage>,
    pub clipboard_flash_active: bool,
    /// Sequence number of the most recently issued request.
    pub round: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Enters `ProposingSuggestions` and returns the round of the new request.
    pub(crate) fn begin_proposal(&mut self, description: &str) -> u64 {
        self.icon_description = description.to_string();
        self.phase = Phase::ProposingSuggestions;
        self.error = None;
        self.artifact = None;
        self.clipboard_flash_active = false;
        self.suggestions.clear();
        self.next_round()
    }

    pub(crate) fn finish_proposal(&mut self, suggestions: Vec<String>) {
        if suggestions.is_empty() {
            self.phase = Phase::Idle;
            self.error = Some(ErrorMessage::NoSuggestions);
        } else {
            self.phase = Phase::SuggestionsReady;
            self.suggestions = suggestions;
        }
    }

    pub(crate) fn fail_proposal(&mut self) {
        self.phase = Phase::Idle;
        self.suggestions.clear();
        self.error = Some(ErrorMessage::SuggestionGenerationFailed);
    }

    /// Enters `GeneratingArtifact` and returns the round of the new request.
    pub(crate) fn begin_generation(&mut self) -> u64 {
        self.phase = Phase::GeneratingArtifact;
        self.error = None;
        self.suggestions.clear();
        self.artifact = None;
        self.next_round()
    }

    pub(crate) fn finish_generation(&mut self, artifact: String) {
        self.phase = Phase::ArtifactReady;
        self.artifact = Some(artifact);
    }

    pub(crate) fn fail_generation(&mut self) {
        self.phase = Phase::Idle;
        self.artifact = None;
        self.error = Some(ErrorMessage::ArtifactGenerationFailed);
    }

    /// Back to `Idle`, keeping the description. Outstanding requests become
    /// stale because the round moves on.
    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.suggestions.clear();
        self.artifact = None;
        self.error = None;
        self.clipboard_flash_active = false;
        self.next_round();
    }

    fn next_round(&mut self) -> u64 {
        self.round += 1;
        self.round
    }
}
