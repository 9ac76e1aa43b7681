//! GeminiBackend - Direct REST API implementation of the generation capabilities.
//!
//! Calls the Gemini `generateContent` endpoint without any SDK. The API key is
//! resolved through a [`SecretService`].

use std::time::Duration;

use animicon_core::config::GeminiSettings;
use animicon_core::generation::{AnimationProposer, GenerationError, IconGenerator};
use animicon_core::secret::SecretService;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::parsing::{extract_svg, parse_suggestions};
use crate::prompts::{IconPrompt, PromptLibrary, SuggestionPrompt};

const JSON_MIME_TYPE: &str = "application/json";

/// Generation backend that talks to the Gemini HTTP API.
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    prompts: PromptLibrary,
}

impl GeminiBackend {
    /// Creates a backend with the provided API key and settings.
    pub fn new(api_key: impl Into<String>, settings: &GeminiSettings) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| {
                GenerationError::configuration(format!("Failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            prompts: PromptLibrary::new()?,
        })
    }

    /// Resolves the API key from `secrets` and builds the backend.
    pub async fn from_secret_service(
        secrets: &dyn SecretService,
        settings: &GeminiSettings,
    ) -> Result<Self, GenerationError> {
        let secret_config = secrets.load_secrets().await.map_err(|e| {
            GenerationError::configuration(format!("Failed to load secrets: {}", e))
        })?;

        let gemini = secret_config.gemini.ok_or_else(|| {
            GenerationError::configuration(
                "Gemini API key not found (set GEMINI_API_KEY or secret.json)",
            )
        })?;

        Self::new(gemini.api_key, settings)
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        )
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await
            .map_err(|err| {
                let retryable = err.is_connect() || err.is_timeout();
                GenerationError::Transport {
                    // Never echo the URL; it carries the key.
                    message: err.without_url().to_string(),
                    retryable,
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            GenerationError::malformed(format!("Failed to parse Gemini response: {}", err.without_url()))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl AnimationProposer for GeminiBackend {
    async fn propose_animations(&self, description: &str) -> Result<Vec<String>, GenerationError> {
        let prompt = self.prompts.suggestions(&SuggestionPrompt { description })?;
        let request = GenerateContentRequest::user_text(prompt).with_config(GenerationConfig {
            response_mime_type: Some(JSON_MIME_TYPE.to_string()),
            response_schema: Some(serde_json::json!({
                "type": "ARRAY",
                "items": { "type": "STRING" }
            })),
        });

        tracing::debug!("[gemini] propose_animations via {}", self.model);
        let text = self.send_request(&request).await?;
        parse_suggestions(&text)
    }
}

#[async_trait]
impl IconGenerator for GeminiBackend {
    async fn generate_animated_icon(
        &self,
        description: &str,
        animation: &str,
    ) -> Result<String, GenerationError> {
        let prompt = self.prompts.icon(&IconPrompt {
            description,
            animation,
        })?;
        let request = GenerateContentRequest::user_text(prompt);

        tracing::debug!("[gemini] generate_animated_icon via {}", self.model);
        let text = self.send_request(&request).await?;
        extract_svg(&text)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn user_text(text: String) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text }],
            }],
            generation_config: None,
        }
    }

    fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

fn map_http_error(status: StatusCode, body: String) -> GenerationError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    GenerationError::Http {
        status: status.as_u16(),
        message,
        retryable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animicon_core::config::{GeminiSecret, SecretConfig};

    struct FixedSecrets(SecretConfig);

    #[async_trait]
    impl SecretService for FixedSecrets {
        async fn load_secrets(&self) -> Result<SecretConfig, String> {
            Ok(self.0.clone())
        }

        async fn secret_file_exists(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_map_http_error_reads_google_error_body() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string());

        assert_eq!(
            err,
            GenerationError::Http {
                status: 429,
                message: "RESOURCE_EXHAUSTED: Quota exceeded".into(),
                retryable: true,
            }
        );
    }

    #[test]
    fn test_map_http_error_plain_body_not_retryable() {
        let err = map_http_error(StatusCode::BAD_REQUEST, "bad".to_string());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"[\"spin\","},{"text":"\"pulse\"]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            extract_text_response(response).unwrap(),
            "[\"spin\",\"pulse\"]"
        );
    }

    #[test]
    fn test_extract_text_without_candidates_is_empty_response() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(
            extract_text_response(response).unwrap_err(),
            GenerationError::EmptyResponse
        );
    }

    #[test]
    fn test_request_serializes_generation_config() {
        let request = GenerateContentRequest::user_text("hi".into()).with_config(GenerationConfig {
            response_mime_type: Some(JSON_MIME_TYPE.into()),
            response_schema: None,
        });
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(value["generationConfig"].get("responseSchema").is_none());
    }

    #[tokio::test]
    async fn test_from_secret_service_requires_key() {
        let settings = GeminiSettings::default();
        let missing = GeminiBackend::from_secret_service(&FixedSecrets(SecretConfig::default()), &settings)
            .await;
        assert!(matches!(missing, Err(GenerationError::Configuration(_))));

        let present = GeminiBackend::from_secret_service(
            &FixedSecrets(SecretConfig {
                gemini: Some(GeminiSecret {
                    api_key: "k".into(),
                }),
            }),
            &settings,
        )
        .await
        .unwrap()
        .with_model("gemini-test");
        assert_eq!(present.model(), "gemini-test");
        assert!(present.endpoint().ends_with("/gemini-test:generateContent?key=k"));
    }
}
