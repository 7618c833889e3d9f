//! The seam between the gateway and a text-generation service.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[cfg(feature = "openai")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backend returned no completion text")]
    EmptyCompletion,
    #[error("no backend credential configured")]
    MissingCredential,
}

/// A single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    /// Raw completion text, expected to be a JSON document.
    pub text: String,
    pub tokens_used: u32,
}

/// An opaque text-generation service.
///
/// One call is one round trip: implementations must not retry, cache, or
/// stream. Any timeout belongs to the transport the implementation wraps.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError>;
}
