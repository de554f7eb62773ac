//! External capabilities consumed by the handlers
//!
//! Each trait is a single request/response call to something outside the engine: an HTTP
//! API, the desktop, or a language model. Handlers only ever see these traits, so tests can
//! substitute in-memory stand-ins.

mod currency;
mod launcher;
mod llm;
mod news;
mod search;
mod translate;
mod weather;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use currency::ExchangeRateClient;
pub use launcher::{BrowserMediaPlayer, SystemLauncher};
pub use llm::LlmGenerator;
pub use news::NewsApiClient;
pub use search::InstantAnswerClient;
pub use translate::LibreTranslateClient;
pub use weather::OpenWeatherClient;

#[cfg(test)]
pub(crate) use {
    currency::parse_rate, llm::parse_completion, news::parse_headlines,
    search::parse_top_result, translate::parse_translation, weather::parse_weather,
};

/// Failure of a downstream call made on behalf of a handler
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("no result for: {0}")]
    NoResult(String),

    #[error("service error: {0}")]
    Service(String),

    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Failure of the fallback generator
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation timed out")]
    Timeout,

    #[error("generation request failed: {0}")]
    Request(String),

    #[error("generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("generator returned no text")]
    EmptyResponse,

    #[error("generator not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Request(err.to_string())
        }
    }
}

/// One news item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub description: Option<String>,
}

/// Result of asking the launcher for an application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchAck {
    /// Started; carries the display name of what was launched
    Launched(String),
    Unsupported,
}

/// Free-form text generation
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, max_length: u32) -> Result<String, GenerationError>;
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Human-readable current conditions for `city`
    async fn get_weather(&self, city: &str) -> Result<String, CapabilityError>;
}

#[async_trait]
pub trait NewsService: Send + Sync {
    async fn get_top_headlines(&self, count: usize) -> Result<Vec<Headline>, CapabilityError>;
}

#[async_trait]
pub trait CurrencyService: Send + Sync {
    /// Units of `to` per one unit of `from`
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, CapabilityError>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, CapabilityError>;
}

#[async_trait]
pub trait SearchService: Send + Sync {
    /// Snippet of the top result
    async fn search(&self, query: &str) -> Result<String, CapabilityError>;
}

#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch_app(&self, name: &str) -> Result<LaunchAck, CapabilityError>;
    async fn open_url(&self, url: &str) -> Result<(), CapabilityError>;
}

#[async_trait]
pub trait MediaPlayer: Send + Sync {
    /// Start playback of something matching `topic`; does not wait for it to finish
    async fn play(&self, topic: &str) -> Result<(), CapabilityError>;
}

/// Build the shared HTTP client used by every HTTP-backed capability
pub fn http_client(timeout_secs: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(concat!("zade/", env!("CARGO_PKG_VERSION")))
        .build()
}
