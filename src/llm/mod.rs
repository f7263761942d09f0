// src/llm/mod.rs
// =============================================================================
// Talking to the language model.
//
// Submodules:
// - client: OpenAI-compatible chat completions over reqwest
// - prompts: the prompt texts for locating, validating and extracting editorials
//
// Callers depend on the `CompletionClient` trait, not on OpenAiClient, so
// tests can script the model's answers.
// =============================================================================

mod client;
pub mod prompts;

use async_trait::async_trait;

use crate::error::Result;

pub use client::OpenAiClient;

/// One chat completion: optional system prompt plus a single user message
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: String, max_tokens: u32) -> Self {
        Self {
            system: None,
            prompt,
            max_tokens,
        }
    }

    pub fn with_system(mut self, system: &str) -> Self {
        self.system = Some(system.to_string());
        self
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model name, recorded in the editorial footer
    fn model(&self) -> &str;

    /// Returns the assistant's reply text (possibly empty)
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
