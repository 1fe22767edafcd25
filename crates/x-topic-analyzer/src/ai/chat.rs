//! OpenAI-compatible chat-completions provider (DeepSeek by default).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AnalyzerError, Result};

use super::provider::{AIMessage, AIProvider, AIResponse, GenerateOptions, TokenUsage};

/// DeepSeek API base URL.
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Environment variable holding the API key.
pub const API_KEY_ENV_VAR: &str = "DEEPSEEK_API_KEY";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [AIMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    // Some compatible servers send `"usage": null`.
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Chat-completions client for DeepSeek or any OpenAI-compatible endpoint.
pub struct ChatCompletionsProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ChatCompletionsProvider {
    /// Create a provider against the DeepSeek API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEEPSEEK_BASE_URL.to_string(),
        })
    }

    /// Point the provider at another OpenAI-compatible base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl AIProvider for ChatCompletionsProvider {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    async fn generate_text(
        &self,
        model: &str,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> Result<AIResponse> {
        let request = ChatRequest {
            model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzerError::Summary(format!("chat request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Summary(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            return Err(AnalyzerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AnalyzerError::Summary("response contained no choices".to_string()))?;

        let usage = parsed.usage.unwrap_or_default();
        tracing::debug!(
            model = %parsed.model,
            total_tokens = usage.total_tokens,
            "Chat completion received"
        );

        Ok(AIResponse {
            text,
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
            model: parsed.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> ChatCompletionsProvider {
        ChatCompletionsProvider::new("test-key")
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_text_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "deepseek-chat",
                "max_tokens": 150,
                "temperature": 0.3,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "deepseek-chat",
                "choices": [
                    {"message": {"role": "assistant", "content": " A short summary. "}},
                    {"message": {"role": "assistant", "content": "ignored"}}
                ],
                "usage": {"prompt_tokens": 40, "completion_tokens": 10, "total_tokens": 50}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = GenerateOptions {
            temperature: Some(0.3),
            max_tokens: Some(150),
        };
        let response = provider(&server)
            .generate_text("deepseek-chat", &[AIMessage::user("hi")], &options)
            .await
            .unwrap();

        assert_eq!(response.text, " A short summary. ");
        assert_eq!(response.usage.total_tokens, 50);
    }

    #[tokio::test]
    async fn test_error_status_surfaces_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Authentication Fails", "type": "authentication_error"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate_text("deepseek-chat", &[AIMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();

        match err {
            AnalyzerError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Authentication Fails");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let result = provider(&server)
            .generate_text("deepseek-chat", &[AIMessage::user("hi")], &GenerateOptions::default())
            .await;
        assert!(matches!(result, Err(AnalyzerError::Summary(_))));
    }

    #[tokio::test]
    async fn test_null_or_partial_usage_keeps_the_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "m",
                "choices": [{"message": {"content": "ok"}}],
                "usage": null
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "m",
                "choices": [{"message": {"content": "partial"}}],
                "usage": {"total_tokens": 7}
            })))
            .mount(&server)
            .await;

        let provider = provider(&server);
        let options = GenerateOptions::default();

        let first = provider
            .generate_text("m", &[AIMessage::user("hi")], &options)
            .await
            .unwrap();
        assert_eq!(first.text, "ok");
        assert_eq!(first.usage.total_tokens, 0);

        let second = provider
            .generate_text("m", &[AIMessage::user("hi")], &options)
            .await
            .unwrap();
        assert_eq!(second.text, "partial");
        assert_eq!(second.usage.total_tokens, 7);
        assert_eq!(second.usage.input_tokens, 0);
    }
}
