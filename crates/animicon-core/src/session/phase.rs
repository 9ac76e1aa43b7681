//! Session phase types.

use serde::{Deserialize, Serialize};

/// The discrete stage of an icon-creation session.
///
/// `ProposingSuggestions` and `GeneratingArtifact` are the only phases with a
/// request outstanding against the generation backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Waiting for a description. Also the landing phase after any failure.
    #[default]
    Idle,
    /// Animation ideas have been requested.
    ProposingSuggestions,
    /// Animation ideas are on screen, waiting for a pick.
    SuggestionsReady,
    /// The icon for the picked animation has been requested.
    GeneratingArtifact,
    /// The rendered icon is available for copy/export.
    ArtifactReady,
}

impl Phase {
    /// Whether a backend request is outstanding.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::ProposingSuggestions | Phase::GeneratingArtifact)
    }

    /// Whether a new suggestion round may start from this phase.
    pub fn accepts_description(self) -> bool {
        matches!(self, Phase::Idle | Phase::ArtifactReady)
    }

    /// Progress text shown while a request is outstanding.
    pub fn loading_message(self) -> Option<&'static str> {
        match self {
            Phase::ProposingSuggestions => Some("Looking for inspiring animations..."),
            Phase::GeneratingArtifact => Some("Designing and animating your icon..."),
            _ => None,
        }
    }
}
