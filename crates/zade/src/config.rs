//! Assistant configuration
//!
//! Every section is defaulted, so an empty file (or no file at all) yields a working
//! assistant backed by a local Ollama server.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{intent::Intent, voice::SpeechConfig, Result, ZadeError};

/// Environment prefix for overrides, e.g. `ZADE__GENERATION__MODEL=llama3`
pub const ENV_PREFIX: &str = "ZADE";

/// Top-level configuration for the assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZadeConfig {
    pub assistant: AssistantConfig,
    pub input: InputConfig,
    pub speech: SpeechConfig,
    pub generation: GenerationConfig,
    pub services: ServicesConfig,
    pub launcher: LauncherConfig,
    pub intents: IntentsConfig,
}

impl ZadeConfig {
    /// Layer defaults, an optional TOML file and `ZADE__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut loaded: ZadeConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ZadeError::ConfigError(e.to_string()))?;

        loaded.services.apply_env_keys();
        if loaded.generation.api_key.is_none() {
            loaded.generation.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        Ok(loaded)
    }
}

/// Identity and canned phrases
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Prefix shown before every reply
    pub name: String,
    pub greeting: String,
    pub farewell: String,
    /// Reply used whenever a handler fails
    pub apology: String,
    /// Said when the recognizer could not make out the audio
    pub unintelligible: String,
    /// Said when the recognition service cannot be reached
    pub service_down: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "ZADE".to_string(),
            greeting: "Hello! I am your assistant. How can I help you today?".to_string(),
            farewell: "Goodbye! Have a great day!".to_string(),
            apology: "I'm sorry, I couldn't process your request.".to_string(),
            unintelligible: "Sorry, I could not understand. Please repeat.".to_string(),
            service_down: "Service is down. Please try again later.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// How long one acquisition waits before counting as empty input
    pub listen_timeout_secs: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            listen_timeout_secs: 7,
        }
    }
}

/// Backend for the fallback generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    /// Ollama local LLM server (OpenAI-compatible API, no key)
    Ollama,
    OpenAI,
}

impl std::str::FromStr for GenerationProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(GenerationProvider::Ollama),
            "openai" => Ok(GenerationProvider::OpenAI),
            _ => Err(format!("Unknown generation provider: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub provider: GenerationProvider,
    pub model: String,
    /// Overrides the provider's default chat-completions URL
    pub endpoint: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Upper bound on generated tokens
    pub max_length: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::Ollama,
            model: "llama3.2".to_string(),
            endpoint: None,
            api_key: None,
            max_length: 120,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

/// Endpoints and credentials for the HTTP-backed handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    #[serde(skip_serializing)]
    pub weather_api_key: Option<String>,
    pub weather_endpoint: String,
    #[serde(skip_serializing)]
    pub news_api_key: Option<String>,
    pub news_endpoint: String,
    pub news_country: String,
    pub news_count: usize,
    pub currency_endpoint: String,
    pub translate_endpoint: String,
    pub default_language: String,
    pub search_endpoint: String,
    pub timeout_secs: u64,
}

impl ServicesConfig {
    fn apply_env_keys(&mut self) {
        if self.weather_api_key.is_none() {
            self.weather_api_key = std::env::var("OPENWEATHER_API_KEY").ok();
        }
        if self.news_api_key.is_none() {
            self.news_api_key = std::env::var("NEWSAPI_KEY").ok();
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            weather_endpoint: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            news_api_key: None,
            news_endpoint: "https://newsapi.org/v2/top-headlines".to_string(),
            news_country: "us".to_string(),
            news_count: 5,
            currency_endpoint: "https://api.exchangerate-api.com/v4/latest".to_string(),
            translate_endpoint: "https://libretranslate.com/translate".to_string(),
            default_language: "en".to_string(),
            search_endpoint: "https://api.duckduckgo.com/".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Applications the assistant may start, keyed by the spoken name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub applications: BTreeMap<String, String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        let (notepad, calculator) = if cfg!(target_os = "windows") {
            ("notepad", "calc")
        } else if cfg!(target_os = "macos") {
            ("open -a TextEdit", "open -a Calculator")
        } else {
            ("gedit", "gnome-calculator")
        };

        let mut applications = BTreeMap::new();
        applications.insert("notepad".to_string(), notepad.to_string());
        applications.insert("calculator".to_string(), calculator.to_string());
        Self { applications }
    }
}

/// Which intents this deployment registers handlers for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentsConfig {
    /// `None` registers everything
    pub enabled: Option<Vec<Intent>>,
}

impl IntentsConfig {
    pub fn is_enabled(&self, intent: Intent) -> bool {
        // The fallback and terminal intents are part of the engine, not optional handlers
        if matches!(intent, Intent::Generate | Intent::Exit) {
            return true;
        }
        self.enabled
            .as_ref()
            .map_or(true, |enabled| enabled.contains(&intent))
    }
}
