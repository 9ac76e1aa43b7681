use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// Why the controller refused an intent. Refusals never touch the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", content = "phase", rename_all = "snake_case")]
pub enum Rejection {
    /// A request is already outstanding.
    #[error("a request is already in progress ({0})")]
    Busy(Phase),
    /// The intent is not legal in the current phase.
    #[error("not allowed while {0}")]
    NotAllowed(Phase),
    /// The chosen animation is not in the current suggestion list.
    #[error("unknown suggestion")]
    UnknownSuggestion,
    /// The description does not belong to the current suggestion round.
    #[error("description does not match the current round")]
    StaleDescription,
    /// There is no artifact to copy or export.
    #[error("no icon available yet")]
    NoArtifact,
}

/// Result of handing an intent to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum IntentOutcome {
    /// The intent was accepted; carries the phase the session ended in.
    Applied(Phase),
    /// The intent was refused.
    Rejected(Rejection),
    /// The request completed after the session moved to a newer round and
    /// its result was dropped.
    Superseded,
}

impl IntentOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, IntentOutcome::Applied(_))
    }
}
