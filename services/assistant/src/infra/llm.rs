#![allow(async_fn_in_trait)]

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::repository::GenerationService;
use crate::domain::types::{ChatRole, ChatTurn};
use crate::error::AssistantError;
use crate::infra::retry::RetryPolicy;

// ── Wire types (generateContent shape) ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// First candidate's first part, trimmed. `None` when the response
    /// carries no usable text.
    pub fn first_text(&self) -> Option<&str> {
        let text = self.candidates.first()?.content.parts.first()?.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

fn to_content(turn: &ChatTurn) -> Content {
    let role = match turn.role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    };
    Content {
        role: role.to_owned(),
        parts: vec![ContentPart {
            text: turn.text.clone(),
        }],
    }
}

// ── Transport ────────────────────────────────────────────────────────────────

/// One attempt's failure, classified for the retry loop.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP 429. Carries the parsed `Retry-After` header when present.
    #[error("rate limited by generation endpoint")]
    RateLimited { retry_after: Option<Duration> },
    /// HTTP 5xx.
    #[error("generation endpoint error: {status}")]
    Upstream { status: u16 },
    /// Anything else: other 4xx, connect or decode failures. Never retried.
    #[error("generation request failed: {0}")]
    Fatal(anyhow::Error),
}

impl TransportError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Upstream { .. })
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// One attempt against the generation endpoint. Implemented by the real
/// HTTP transport and by scripted fakes in tests.
pub trait ChatTransport: Send + Sync {
    async fn send(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransportError>;
}

/// Real transport: POSTs to the configured generateContent endpoint with the
/// API key in the query string.
#[derive(Clone)]
pub struct HttpChatTransport {
    pub client: reqwest::Client,
    pub url: String,
    pub api_key: String,
}

impl ChatTransport for HttpChatTransport {
    async fn send(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Fatal(e.into()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(TransportError::RateLimited { retry_after });
        }
        if status.is_server_error() {
            return Err(TransportError::Upstream {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(TransportError::Fatal(anyhow::anyhow!(
                "unexpected status {status}"
            )));
        }
        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| TransportError::Fatal(e.into()))
    }
}

// ── Client with retry ────────────────────────────────────────────────────────

/// Client for the generation service. Every call goes through the retry
/// policy: 429 honors `Retry-After`, 5xx backs off on the doubling schedule,
/// anything else propagates immediately. Exhaustion propagates the last
/// observed error.
#[derive(Clone)]
pub struct LlmClient<T: ChatTransport> {
    pub transport: T,
    pub policy: RetryPolicy,
}

impl<T: ChatTransport> LlmClient<T> {
    pub async fn call(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransportError> {
        let mut attempt = 1;
        loop {
            match self.transport.send(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && self.policy.has_attempts_left(attempt) => {
                    let delay = self.policy.delay_after(attempt, e.retry_after());
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "generation attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn call_for_text(&self, request: &GenerateContentRequest) -> Result<String, AssistantError> {
        let response = self.call(request).await.map_err(|e| {
            tracing::warn!(error = %e, "generation call failed");
            AssistantError::GenerationUnavailable
        })?;
        let text = response
            .first_text()
            .ok_or(AssistantError::GenerationUnavailable)?;
        Ok(text.to_owned())
    }
}

impl<T: ChatTransport> GenerationService for LlmClient<T> {
    async fn generate_secret(&self, prompt: &str) -> Result<String, AssistantError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_owned(),
                parts: vec![ContentPart {
                    text: prompt.to_owned(),
                }],
            }],
        };
        self.call_for_text(&request).await
    }

    async fn chat(&self, turns: &[ChatTurn]) -> Result<String, AssistantError> {
        let request = GenerateContentRequest {
            contents: turns.iter().map(to_content).collect(),
        };
        self.call_for_text(&request).await
    }
}
