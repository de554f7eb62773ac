//! Fallback text generation over an OpenAI-compatible chat-completions API

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::{GenerationError, Generator};
use crate::config::{GenerationConfig, GenerationProvider};

/// Chat-completions client used for utterances no rule claims
pub struct LlmGenerator {
    config: GenerationConfig,
    client: Client,
}

impl LlmGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = super::http_client(config.timeout_secs)
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        match config.provider {
            GenerationProvider::Ollama => {
                info!("LlmGenerator initialized with Ollama (local, no API key required)");
            }
            GenerationProvider::OpenAI if config.api_key.is_some() => {
                info!("LlmGenerator initialized with OpenAI API key");
            }
            GenerationProvider::OpenAI => {
                warn!("LlmGenerator created without API key - OPENAI_API_KEY env var not found");
            }
        }

        Ok(Self { config, client })
    }

    pub fn is_configured(&self) -> bool {
        !self.requires_auth() || self.config.api_key.is_some() || self.config.endpoint.is_some()
    }

    fn requires_auth(&self) -> bool {
        matches!(self.config.provider, GenerationProvider::OpenAI)
    }

    /// Custom endpoint first, then the provider default
    pub fn endpoint(&self) -> String {
        if let Some(ref endpoint) = self.config.endpoint {
            return endpoint.clone();
        }

        match self.config.provider {
            GenerationProvider::Ollama => {
                std::env::var("OLLAMA_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string())
                    + "/v1/chat/completions"
            }
            GenerationProvider::OpenAI => "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }

    fn payload(&self, prompt: &str, max_length: u32) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": max_length,
            "messages": [{ "role": "user", "content": prompt }]
        })
    }
}

/// Pull the assistant text out of a chat-completions response body
pub(crate) fn parse_completion(json: &serde_json::Value) -> Result<String, GenerationError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .trim()
        .to_string();

    if content.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(content)
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(&self, prompt: &str, max_length: u32) -> Result<String, GenerationError> {
        if !self.is_configured() {
            return Err(GenerationError::NotConfigured(
                "OpenAI provider selected without an API key".to_string(),
            ));
        }

        let endpoint = self.endpoint();
        debug!(%endpoint, model = %self.config.model, max_length, "sending generation request");

        let mut request = self
            .client
            .post(&endpoint)
            .json(&self.payload(prompt, max_length));
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let start = std::time::Instant::now();
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let content = parse_completion(&body)?;
        debug!("generation completed in {:?}", start.elapsed());
        Ok(content)
    }
}
