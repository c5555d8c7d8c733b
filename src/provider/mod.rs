//! Abstract completion seam consumed by the judge.
//!
//! The core only needs single-turn system+user completion with a text
//! response; everything else (auth, transport, retries) belongs to the
//! concrete provider.

pub mod openai_compat;

use async_trait::async_trait;

pub use openai_compat::OpenAiCompatProvider;

/// One single-turn completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String>;
}
