//! One round trip to the generation backend with strict JSON parsing.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::backend::{GenerateRequest, GenerationBackend};
use crate::config::GatewayConfig;
use crate::error::GenerationFailure;
use crate::prompts::SYSTEM_RULESET;
use crate::stages::Stage;

/// Wraps a [`GenerationBackend`] with the fixed analyst ruleset.
///
/// Cheap to clone; every clone shares the backend and configuration.
#[derive(Clone)]
pub struct Gateway {
    backend: Arc<dyn GenerationBackend>,
    config: Arc<GatewayConfig>,
}

impl Gateway {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: Arc<GatewayConfig>) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send `stage_prompt` under the system ruleset and parse the reply as JSON.
    ///
    /// The reply must be a JSON document exactly as returned: no fence
    /// stripping or brace extraction. Anything else is
    /// [`GenerationFailure::Malformed`] carrying the raw text.
    pub async fn invoke(
        &self,
        stage_prompt: &str,
        temperature: f32,
    ) -> Result<Value, GenerationFailure> {
        let (_, value) = self.round_trip(stage_prompt, temperature).await?;
        Ok(value)
    }

    /// Like [`invoke`](Self::invoke), then deserialize into the stage contract.
    pub async fn invoke_as<T: DeserializeOwned>(
        &self,
        stage: Stage,
        stage_prompt: &str,
        temperature: f32,
    ) -> Result<T, GenerationFailure> {
        let (raw, value) = self.round_trip(stage_prompt, temperature).await?;
        serde_json::from_value(value)
            .map_err(|source| GenerationFailure::Shape { stage, raw, source })
    }

    async fn round_trip(
        &self,
        stage_prompt: &str,
        temperature: f32,
    ) -> Result<(String, Value), GenerationFailure> {
        let request = GenerateRequest {
            system_prompt: Some(SYSTEM_RULESET.to_string()),
            user_prompt: stage_prompt.to_string(),
            max_tokens: self.config.max_tokens,
            temperature,
        };
        debug!(
            model = %self.config.model,
            prompt_chars = stage_prompt.len(),
            temperature,
            "invoking generation backend"
        );

        let response = self.backend.generate(&request).await?;
        info!(
            model = %self.config.model,
            tokens_used = response.tokens_used,
            reply_chars = response.text.len(),
            "generation complete"
        );

        match serde_json::from_str::<Value>(&response.text) {
            Ok(value) => Ok((response.text, value)),
            Err(source) => Err(GenerationFailure::Malformed {
                raw: response.text,
                source,
            }),
        }
    }
}
