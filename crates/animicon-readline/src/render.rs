//! Turns session state changes into terminal output.

use animicon_core::session::{Phase, SessionState, SessionWatcher};
use colored::Colorize;

/// One piece of output derived from a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Loading(&'static str),
    SuggestionsHeader(String),
    Suggestion(usize, String),
    Artifact(String),
    Error(String),
    Copied,
    Reset,
}

impl Line {
    fn print(&self) {
        match self {
            Line::Loading(message) => println!("{}", message.yellow()),
            Line::SuggestionsHeader(description) => println!(
                "{}",
                format!("Animation ideas for \"{description}\" (use /pick <n>):").bright_magenta()
            ),
            Line::Suggestion(index, text) => println!("  {}", format!("{index}. {text}").bright_blue()),
            Line::Artifact(svg) => {
                println!("{}", "Your animated icon:".bright_magenta());
                for line in svg.lines() {
                    println!("{}", line.bright_blue());
                }
                println!("{}", "Use /copy or /export to keep it.".bright_black());
            }
            Line::Error(message) => println!("{}", message.red()),
            Line::Copied => println!("{}", "Copied!".bright_green()),
            Line::Reset => println!("{}", "Ready for a new icon.".bright_black()),
        }
    }
}

/// Lines to print when the state moves from `prev` to `next`.
pub fn diff(prev: &SessionState, next: &SessionState) -> Vec<Line> {
    let mut lines = Vec::new();

    if prev.phase != next.phase {
        match next.phase {
            Phase::ProposingSuggestions | Phase::GeneratingArtifact => {
                if let Some(message) = next.phase.loading_message() {
                    lines.push(Line::Loading(message));
                }
            }
            Phase::SuggestionsReady => {
                lines.push(Line::SuggestionsHeader(next.icon_description.clone()));
                lines.extend(
                    next.suggestions
                        .iter()
                        .enumerate()
                        .map(|(i, s)| Line::Suggestion(i + 1, s.clone())),
                );
            }
            Phase::ArtifactReady => {
                if let Some(svg) = &next.artifact {
                    lines.push(Line::Artifact(svg.clone()));
                }
            }
            Phase::Idle => {
                if next.error.is_none() {
                    lines.push(Line::Reset);
                }
            }
        }
    }

    if let Some(error) = next.error {
        if prev.error != Some(error) || prev.round != next.round {
            lines.push(Line::Error(error.to_string()));
        }
    }

    if next.clipboard_flash_active && !prev.clipboard_flash_active {
        lines.push(Line::Copied);
    }

    lines
}

/// Prints every change published on `watcher` until the controller is gone.
pub async fn run(mut watcher: SessionWatcher) {
    let mut prev = watcher.borrow_and_update().clone();
    while watcher.changed().await.is_ok() {
        let next = watcher.borrow_and_update().clone();
        for line in diff(&prev, &next) {
            line.print();
        }
        prev = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animicon_core::session::ErrorMessage;

    fn state(phase: Phase) -> SessionState {
        SessionState {
            phase,
            ..SessionState::default()
        }
    }

    #[test]
    fn test_suggestions_are_numbered_from_one() {
        let next = SessionState {
            icon_description: "a rocket".into(),
            phase: Phase::SuggestionsReady,
            suggestions: vec!["liftoff".into(), "trail of smoke".into()],
            round: 1,
            ..SessionState::default()
        };

        let lines = diff(&state(Phase::ProposingSuggestions), &next);

        assert_eq!(
            lines,
            vec![
                Line::SuggestionsHeader("a rocket".into()),
                Line::Suggestion(1, "liftoff".into()),
                Line::Suggestion(2, "trail of smoke".into()),
            ]
        );
    }

    #[test]
    fn test_busy_phases_show_loading_message() {
        let lines = diff(&state(Phase::SuggestionsReady), &state(Phase::GeneratingArtifact));
        assert_eq!(lines, vec![Line::Loading("Designing and animating your icon...")]);
    }

    #[test]
    fn test_failure_shows_error_not_reset() {
        let next = SessionState {
            error: Some(ErrorMessage::ArtifactGenerationFailed),
            round: 2,
            ..SessionState::default()
        };
        let prev = SessionState {
            phase: Phase::GeneratingArtifact,
            round: 2,
            ..SessionState::default()
        };

        assert_eq!(
            diff(&prev, &next),
            vec![Line::Error(ErrorMessage::ArtifactGenerationFailed.to_string())]
        );
    }

    #[test]
    fn test_unchanged_error_is_not_repeated() {
        let prev = SessionState {
            error: Some(ErrorMessage::DescriptionRequired),
            round: 0,
            ..SessionState::default()
        };
        let mut next = prev.clone();
        next.icon_description = " ".into();

        assert!(diff(&prev, &next).is_empty());
    }

    #[test]
    fn test_flash_rising_edge_prints_copied_once() {
        let prev = SessionState {
            phase: Phase::ArtifactReady,
            artifact: Some("<svg/>".into()),
            ..SessionState::default()
        };
        let mut next = prev.clone();
        next.clipboard_flash_active = true;

        assert_eq!(diff(&prev, &next), vec![Line::Copied]);
        assert!(diff(&next, &next).is_empty());
    }

    #[test]
    fn test_return_to_idle_without_error_is_reset() {
        assert_eq!(diff(&state(Phase::ArtifactReady), &state(Phase::Idle)), vec![Line::Reset]);
    }
}
