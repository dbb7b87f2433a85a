//! Completion client for the Anthropic Messages API

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::CompletionClient;
use crate::error::CompletionError;

const API_VERSION: &str = "2023-06-01";

/// Connection settings for [`AnthropicClient`]
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    /// `None` waits for as long as the service takes
    pub timeout_secs: Option<u64>,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            timeout_secs: None,
        }
    }
}

pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout_secs: Option<u64>,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self, CompletionError> {
        if config.api_key.trim().is_empty() {
            return Err(CompletionError::Config("API key is empty".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CompletionError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }
}

/// Request body for POST /v1/messages
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from POST /v1/messages
#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Concatenate the text blocks of a response
fn collect_text(response: MessagesResponse) -> Result<String, CompletionError> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.trim().is_empty() {
        return Err(CompletionError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = self.messages_url();
        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    CompletionError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    CompletionError::Timeout(self.timeout_secs.unwrap_or_default())
                } else {
                    CompletionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::ResponseParsing(e.to_string()))?;

        collect_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    fn config() -> AnthropicConfig {
        AnthropicConfig {
            api_key: "test-key".to_string(),
            ..AnthropicConfig::default()
        }
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let result = AnthropicClient::new(AnthropicConfig::default());
        assert!(matches!(result, Err(CompletionError::Config(_))));
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client = AnthropicClient::new(AnthropicConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..config()
        })
        .unwrap();
        assert_eq!(client.messages_url(), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_request_body_shape() {
        let client = AnthropicClient::new(config()).unwrap();
        let body = serde_json::to_value(client.request_body("hello")).unwrap();
        assert_eq!(body["model"], client.model());
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_collects_text_blocks_only() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"{\"a\":"},{"type":"tool_use","id":"x"},{"type":"text","text":"1}"}]}"#,
        )
        .unwrap();
        assert_eq!(collect_text(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_blank_response_is_an_error() {
        let response: MessagesResponse =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"  "}]}"#).unwrap();
        assert!(matches!(
            collect_text(response),
            Err(CompletionError::EmptyResponse)
        ));
    }

    /// Serve `app` on an ephemeral local port and return its base URL
    async fn spawn_service(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> AnthropicClient {
        AnthropicClient::new(AnthropicConfig {
            base_url,
            timeout_secs: Some(5),
            ..config()
        })
        .unwrap()
    }

    async fn echo_messages(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
        if header("x-api-key").as_deref() != Some("test-key")
            || header("anthropic-version").as_deref() != Some(API_VERSION)
        {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "missing headers"})));
        }
        let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
        (
            StatusCode::OK,
            Json(json!({"content": [{"type": "text", "text": format!("echo: {}", prompt)}]})),
        )
    }

    #[tokio::test]
    async fn test_complete_sends_headers_and_returns_text() {
        let base_url = spawn_service(Router::new().route("/v1/messages", post(echo_messages))).await;
        let client = client_for(base_url);

        let text = client.complete("review this policy").await.unwrap();
        assert_eq!(text, "echo: review this policy");
    }

    #[tokio::test]
    async fn test_non_success_status_is_service_error() {
        let app = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::from_u16(529).unwrap(), "overloaded") }),
        );
        let client = client_for(spawn_service(app).await);

        match client.complete("hello").await {
            Err(CompletionError::Service { status, body }) => {
                assert_eq!(status, 529);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parsing_error() {
        let app = Router::new().route("/v1/messages", post(|| async { "not json at all" }));
        let client = client_for(spawn_service(app).await);

        let result = client.complete("hello").await;
        assert!(matches!(result, Err(CompletionError::ResponseParsing(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        // Bind then drop to get a port nothing is listening on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(format!("http://{}", addr));

        let result = client.complete("hello").await;
        assert!(matches!(result, Err(CompletionError::Connection(_))));
    }
}
