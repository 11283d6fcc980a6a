//! OpenAI Docstring Generator
//!
//! Generator implementation backed by OpenAI's Chat Completions API with
//! JSON response format. The system prompt asks for a one-sentence,
//! verb-initial description plus the structured sections of the schema.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{DocstringGenerator, GenerateRequest};
use crate::constants::generator::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::schema::{ClassDocstring, DocstringData, FunctionDocstring};
use crate::types::{DefinitionKind, DocsmithError, GenerateError, Result};

/// Connection settings for the OpenAI generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
    pub max_tokens: usize,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: 1024,
        }
    }
}

/// OpenAI generator with secure API key handling
pub struct OpenAiGenerator {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.config.model)
            .field("api_base", &self.config.api_base)
            .finish()
    }
}

impl OpenAiGenerator {
    pub fn new(api_key: Option<String>, config: OpenAiConfig) -> Result<Self> {
        let api_key = api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                DocsmithError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocsmithError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            config,
            client,
        })
    }

    fn system_prompt(&self, request: &GenerateRequest) -> String {
        let language = request.language.stylized_name();
        let kind = request.kind.as_str();

        let shape = match request.kind {
            DefinitionKind::Function => {
                "Respond ONLY with JSON of the shape \
                 {\"description\": str, \
                 \"parameters\": [{\"name\": str, \"description\": str, \"assumed_type\": str}], \
                 \"returns\": [{\"name\": str, \"description\": str, \"assumed_type\": str}], \
                 \"raises\": [{\"name\": str, \"description\": str}]}. \
                 Omit sections that do not apply by leaving the array empty."
            }
            DefinitionKind::Class => {
                "Respond ONLY with JSON of the shape {\"description\": str}."
            }
        };

        format!(
            "You are a robot who is an expert at writing docstrings for {language} classes and \
             functions, mainly because you are extremely good at being concise.\n\
             Describe the following {kind} in 1 sentence beginning with a verb; do not include \
             the {kind} name itself in the description.\n{shape}"
        )
    }

    fn build_request(&self, request: &GenerateRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt(request),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.definition.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: Some(self.config.max_tokens),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }

    fn parse_content(
        kind: DefinitionKind,
        content: &str,
    ) -> std::result::Result<DocstringData, GenerateError> {
        let data = match kind {
            DefinitionKind::Function => {
                let parsed: FunctionDocstring = serde_json::from_str(content).map_err(|e| {
                    GenerateError::malformed(format!("Response is not a function docstring: {}", e))
                })?;
                DocstringData::Function(parsed)
            }
            DefinitionKind::Class => {
                let parsed: ClassDocstring = serde_json::from_str(content).map_err(|e| {
                    GenerateError::malformed(format!("Response is not a class docstring: {}", e))
                })?;
                DocstringData::Class(parsed)
            }
        };
        Ok(data)
    }

    fn classify_api_error(status: u16, body: &str) -> GenerateError {
        // OpenAI reports an overlong prompt as a 400 with this error code
        if body.contains("context_length_exceeded")
            || body.contains("maximum context length")
        {
            return GenerateError::content_too_large(format!("OpenAI API error ({})", status));
        }
        GenerateError::transport(format!("OpenAI API error ({}): {}", status, body))
    }
}

#[async_trait]
impl DocstringGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<DocstringData, GenerateError> {
        info!(
            model = %self.config.model,
            kind = %request.kind,
            language = %request.language,
            temperature = request.temperature,
            "Generating docstring with OpenAI"
        );

        let url = format!("{}/chat/completions", self.config.api_base);
        let body = self.build_request(request);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                GenerateError::transport(format!("OpenAI request failed: {}", e)).provider("openai")
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_api_error(status, &body).provider("openai"));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            GenerateError::malformed(format!("Failed to parse OpenAI response: {}", e))
                .provider("openai")
        })?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| {
                GenerateError::malformed("No content in OpenAI response").provider("openai")
            })?;

        debug!("Received OpenAI response, parsing docstring data");
        Self::parse_content(request.kind, content).map_err(|e| e.provider("openai"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenerateErrorKind;

    #[test]
    fn test_classify_context_length_as_capacity() {
        let err = OpenAiGenerator::classify_api_error(
            400,
            r#"{"error": {"code": "context_length_exceeded"}}"#,
        );
        assert_eq!(err.kind, GenerateErrorKind::ContentTooLarge);
    }

    #[test]
    fn test_classify_server_error_as_transport() {
        let err = OpenAiGenerator::classify_api_error(503, "service unavailable");
        assert_eq!(err.kind, GenerateErrorKind::Transport);
    }

    #[test]
    fn test_parse_function_content() {
        let content = r#"{
            "description": "Computes a sum.",
            "parameters": [{"name": "a", "description": "Left operand.", "assumed_type": "int"}],
            "returns": [],
            "raises": []
        }"#;

        let data = OpenAiGenerator::parse_content(DefinitionKind::Function, content).unwrap();
        match data {
            DocstringData::Function(func) => {
                assert_eq!(func.description, "Computes a sum.");
                assert_eq!(func.parameters.len(), 1);
            }
            DocstringData::Class(_) => panic!("expected function docstring"),
        }
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = OpenAiGenerator::parse_content(DefinitionKind::Class, "not json").unwrap_err();
        assert_eq!(err.kind, GenerateErrorKind::MalformedResponse);
    }
}
