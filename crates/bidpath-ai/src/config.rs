use std::fmt;

/// Model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "model-default";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.25;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
/// Solicitation text beyond this many characters is dropped before prompting.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 18_000;

/// Process-wide gateway settings, built once at startup and shared read-only.
#[derive(Clone, PartialEq)]
pub struct GatewayConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_input_chars: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

impl GatewayConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.trim().is_empty()).then(|| key.trim().to_string());
        self
    }

    /// `base_url` should be like `https://api.openai.com/v1` (trailing slash is dropped).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_input_chars", &self.max_input_chars)
            .finish()
    }
}
