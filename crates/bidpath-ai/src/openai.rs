//! OpenAI-compatible chat-completions backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::{BackendError, GenerateRequest, GenerateResponse, GenerationBackend};
use crate::config::GatewayConfig;

/// Chat-completions client for any OpenAI-compatible endpoint.
///
/// Requests JSON-object output mode. Makes exactly one HTTP request per
/// [`generate`](GenerationBackend::generate) call.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

impl OpenAiBackend {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn body<'a>(&'a self, request: &'a GenerateRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        });
        ChatRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

fn completion(body: &str) -> Result<GenerateResponse, BackendError> {
    let parsed: ChatResponse = serde_json::from_str(body)?;
    let tokens_used = parsed.usage.map(|u| u.total_tokens).unwrap_or(0);
    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.trim().is_empty())
        .ok_or(BackendError::EmptyCompletion)?;
    Ok(GenerateResponse { text, tokens_used })
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(BackendError::MissingCredential)?;
        let url = format!("{}/chat/completions", self.base_url);

        info!(url = %url, model = %self.model, "requesting completion");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.body(request))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(BackendError::Server {
                status: status.as_u16(),
                body,
            });
        }
        completion(&body)
    }
}
