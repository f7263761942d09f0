// src/llm/client.rs
// =============================================================================
// OpenAI-compatible chat completions client.
//
// Works against api.openai.com or any server exposing the same
// `/chat/completions` endpoint (set OPENAI_BASE_URL).
//
// Error handling:
// - No API key            -> MissingApiKey
// - 401 / 403             -> Api("authentication failed ...")
// - 429 / 5xx / timeouts  -> retried (3 attempts, 4s -> 8s -> ... capped at 30s)
// - anything else         -> Api
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionClient, CompletionRequest};
use crate::config::Settings;
use crate::error::{EditorialError, Result};

const MAX_ATTEMPTS: u32 = 3;
// Extraction replies for long tutorials can take a while
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

// --- OpenAI-compatible serde structs ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_completion_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// A failed call, plus whether another attempt could succeed
struct CallFailure {
    error: EditorialError,
    transient: bool,
}

pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    backoff: fn(u32) -> Duration,
}

impl OpenAiClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EditorialError::Config(format!("Failed to create API client: {}", e)))?;

        debug!(model = %settings.openai_model, base_url = %settings.openai_base_url, "LLM client configured");

        Ok(Self {
            client,
            api_key: settings.openai_api_key.clone(),
            model: settings.openai_model.clone(),
            endpoint: format!("{}/chat/completions", settings.openai_base_url),
            backoff: backoff_delay,
        })
    }

    async fn send_once(&self, api_key: &str, request: &CompletionRequest) -> std::result::Result<String, CallFailure> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            max_completion_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CallFailure {
                transient: e.is_timeout() || e.is_connect(),
                error: EditorialError::Api(format!("Failed to call LLM API: {}", e)),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| CallFailure {
            transient: true,
            error: EditorialError::Api(format!("Failed to read LLM API response: {}", e)),
        })?;

        if !status.is_success() {
            return Err(status_failure(status, &text));
        }

        parse_chat_response(&text).map_err(|error| CallFailure {
            error,
            transient: false,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(EditorialError::MissingApiKey)?;

        debug!(model = %self.model, prompt_chars = request.prompt.len(), "sending completion request");

        let mut attempt = 1;
        loop {
            match self.send_once(api_key, &request).await {
                Ok(reply) => {
                    debug!(reply_chars = reply.len(), "received completion");
                    return Ok(reply);
                }
                Err(failure) if failure.transient && attempt < MAX_ATTEMPTS => {
                    let delay = (self.backoff)(attempt);
                    warn!(attempt, error = %failure.error, "LLM call failed, retrying in {:?}", delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}

// 4s, 8s, 16s, then capped at 30s
fn backoff_delay(attempt: u32) -> Duration {
    let secs = 4u64.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1).min(8))).min(30);
    Duration::from_secs(secs)
}

fn status_failure(status: StatusCode, body: &str) -> CallFailure {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CallFailure {
            error: EditorialError::Api(format!("authentication failed ({}): {}", status.as_u16(), detail)),
            transient: false,
        },
        StatusCode::TOO_MANY_REQUESTS => CallFailure {
            error: EditorialError::Api(format!("rate limited: {}", detail)),
            transient: true,
        },
        s if s.is_server_error() => CallFailure {
            error: EditorialError::Api(format!("server error {}: {}", s.as_u16(), detail)),
            transient: true,
        },
        s => CallFailure {
            error: EditorialError::Api(format!("HTTP {}: {}", s.as_u16(), detail)),
            transient: false,
        },
    }
}

// Pulls the first choice's text out of a successful response body
fn parse_chat_response(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| EditorialError::Api(format!("Unexpected LLM API response: {}", e)))?;

    if let Some(usage) = &response.usage {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "token usage"
        );
    }

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| EditorialError::Api("LLM API returned no choices".to_string()))?;

    match choice.message.content {
        Some(text) => Ok(text),
        None => {
            warn!("response content is empty; a reasoning model may need more max tokens");
            Ok(String::new())
        }
    }
}
