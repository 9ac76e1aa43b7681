//! Prompt templates for the two generation calls.

use animicon_core::generation::GenerationError;
use minijinja::{Environment, context};
use serde::Serialize;

const SUGGESTIONS_TEMPLATE: &str = r#"You are a motion designer specialised in small UI icons.

Icon description: "{{ description }}"

Propose between {{ min_ideas }} and {{ max_ideas }} distinct animation ideas that would make this icon feel alive.
Requirements:
{% for req in requirements -%}
- {{ req }}
{% endfor %}
Output ONLY a JSON array of strings, no markdown formatting or code blocks."#;

const ICON_TEMPLATE: &str = r#"You are an expert SVG illustrator and animator.

Create one animated icon.
Icon description: "{{ description }}"
Animation: "{{ animation }}"

Requirements:
{% for req in requirements -%}
- {{ req }}
{% endfor %}
Output ONLY the SVG markup, starting with <svg and ending with </svg>."#;

/// Renders the suggestion request for `description`.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionPrompt<'a> {
    pub description: &'a str,
}

/// Renders the icon request for `description` animated as `animation`.
#[derive(Debug, Clone, Serialize)]
pub struct IconPrompt<'a> {
    pub description: &'a str,
    pub animation: &'a str,
}

/// Holds the compiled templates.
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    pub fn new() -> Result<Self, GenerationError> {
        let mut env = Environment::new();
        env.add_template("suggestions", SUGGESTIONS_TEMPLATE)
            .map_err(template_error)?;
        env.add_template("icon", ICON_TEMPLATE)
            .map_err(template_error)?;
        Ok(Self { env })
    }

    pub fn suggestions(&self, prompt: &SuggestionPrompt<'_>) -> Result<String, GenerationError> {
        let template = self.env.get_template("suggestions").map_err(template_error)?;
        template
            .render(context! {
                description => prompt.description.trim(),
                min_ideas => 3,
                max_ideas => 5,
                requirements => [
                    "Each idea is a short phrase of at most eight words",
                    "Ideas must be achievable with CSS or SMIL animation on a single SVG",
                    "Use the same language as the icon description",
                ],
            })
            .map_err(template_error)
    }

    pub fn icon(&self, prompt: &IconPrompt<'_>) -> Result<String, GenerationError> {
        let template = self.env.get_template("icon").map_err(template_error)?;
        template
            .render(context! {
                description => prompt.description.trim(),
                animation => prompt.animation.trim(),
                requirements => [
                    "A single self-contained <svg> element with xmlns and viewBox=\"0 0 24 24\"",
                    "Animate with an embedded <style> block using @keyframes, or with SMIL",
                    "The animation loops seamlessly",
                    "Use currentColor for strokes and fills so the icon follows the text color",
                    "No scripts, no external images, fonts or stylesheets",
                ],
            })
            .map_err(template_error)
    }
}

fn template_error(err: minijinja::Error) -> GenerationError {
    GenerationError::configuration(format!("Prompt template error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_prompt_mentions_description() {
        let library = PromptLibrary::new().unwrap();
        let prompt = library
            .suggestions(&SuggestionPrompt {
                description: "  a rocket launching ",
            })
            .unwrap();

        assert!(prompt.contains("\"a rocket launching\""));
        assert!(prompt.contains("between 3 and 5"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_icon_prompt_mentions_both_inputs() {
        let library = PromptLibrary::new().unwrap();
        let prompt = library
            .icon(&IconPrompt {
                description: "a rocket launching",
                animation: "liftoff",
            })
            .unwrap();

        assert!(prompt.contains("\"a rocket launching\""));
        assert!(prompt.contains("\"liftoff\""));
        assert!(prompt.contains("- No scripts"));
    }
}
