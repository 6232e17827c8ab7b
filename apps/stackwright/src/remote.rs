//! # Remote Validation Adapter
//!
//! Sends a stack to an OpenAI-compatible chat completion endpoint and turns
//! the answer into a [`StackAnalysis`].
//!
//! `analyze` never fails. An empty stack short-circuits without any network
//! call; transport, status and parse failures are logged and replaced by
//! [`StackAnalysis::fallback`]. There are no retries.

use crate::config::RemoteConfig;
use serde::{Deserialize, Serialize};
use stackwright_core::analysis::{EMPTY_STACK_MESSAGE, RUBRIC, UNAVAILABLE_MESSAGE};
use stackwright_core::{StackAnalysis, TechEdge, TechNode, describe_stack, parse_analysis};
use std::time::Duration;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from outbound HTTP calls.
#[derive(Debug)]
pub enum RemoteError {
    /// Could not build the HTTP client.
    Client(String),
    /// Cannot reach the remote service.
    ConnectionFailed(String),
    /// 401/403 - invalid or missing credentials.
    Unauthorized,
    /// 429 Too Many Requests.
    RateLimited,
    /// Any other non-success status.
    Status(u16, String),
    /// Response body could not be understood.
    ParseError(String),
    /// The request was rejected before sending.
    InvalidInput(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client(msg) => write!(f, "HTTP client error: {msg}"),
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to {url}"),
            Self::Unauthorized => write!(f, "Unauthorized: invalid or missing credentials"),
            Self::RateLimited => write!(f, "Rate limited: too many requests"),
            Self::Status(status, msg) => write!(f, "Remote error ({status}): {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Build a client with the given timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, RemoteError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("stackwright/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RemoteError::Client(e.to_string()))
}

/// Map a non-success status to an error, passing successful responses on.
pub async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(RemoteError::Unauthorized);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(RemoteError::RateLimited);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(RemoteError::Status(status.as_u16(), body))
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// Client for the remote analysis path.
#[derive(Debug, Clone)]
pub struct RemoteValidator {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteValidator {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let http = http_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Analyze a stack. Always returns a well-formed report.
    pub async fn analyze(&self, nodes: &[TechNode], edges: &[TechEdge]) -> StackAnalysis {
        if nodes.is_empty() {
            return StackAnalysis::fallback(EMPTY_STACK_MESSAGE);
        }

        match self.request_analysis(nodes, edges).await {
            Ok(analysis) => {
                tracing::info!(
                    nodes = nodes.len(),
                    edges = edges.len(),
                    overall = analysis.scores.overall,
                    "Remote analysis completed"
                );
                analysis
            }
            Err(e) => {
                tracing::warn!(error = %e, "Remote analysis failed, returning fallback report");
                StackAnalysis::fallback(UNAVAILABLE_MESSAGE)
            }
        }
    }

    async fn request_analysis(
        &self,
        nodes: &[TechNode],
        edges: &[TechEdge],
    ) -> Result<StackAnalysis, RemoteError> {
        let request = ChatCompletionsRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: RUBRIC.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Analyze this technology stack:\n{}",
                        describe_stack(nodes, edges)
                    ),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let mut req = self.http.post(&url).json(&request);
        if let Some(ref key) = self.config.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| RemoteError::ConnectionFailed(format!("{url}: {e}")))?;
        let resp = check_status(resp).await?;

        let completion: ChatCompletionsResponse = resp
            .json()
            .await
            .map_err(|e| RemoteError::ParseError(e.to_string()))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RemoteError::ParseError("No choices in response".to_string()))?;

        parse_analysis(&content)
            .ok_or_else(|| RemoteError::ParseError("Model output is not an analysis".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape_matches_chat_completions() {
        let request = ChatCompletionsRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn error_display() {
        assert_eq!(
            RemoteError::Status(500, "boom".to_string()).to_string(),
            "Remote error (500): boom"
        );
        assert!(RemoteError::RateLimited.to_string().contains("Rate limited"));
    }
}
