//! Process-wide engine context
//!
//! Built once at startup and passed by reference to the dispatch loop and every handler.
//! Nothing in here changes after construction.

use std::sync::Arc;

use tracing::info;

use crate::{
    capabilities::{
        http_client, BrowserMediaPlayer, CurrencyService, ExchangeRateClient, Generator,
        InstantAnswerClient, Launcher, LibreTranslateClient, LlmGenerator, MediaPlayer,
        NewsApiClient, NewsService, OpenWeatherClient, SearchService, SystemLauncher, Translator,
        WeatherService,
    },
    config::ZadeConfig,
    Result, ZadeError,
};

/// Scalar settings the handlers read on every turn
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub apology: String,
    pub max_length: u32,
    pub default_language: String,
    pub news_count: usize,
}

impl EngineSettings {
    pub fn from_config(config: &ZadeConfig) -> Self {
        Self {
            apology: config.assistant.apology.clone(),
            max_length: config.generation.max_length,
            default_language: config.services.default_language.clone(),
            news_count: config.services.news_count,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&ZadeConfig::default())
    }
}

/// Capabilities and settings shared read-only across turns
#[derive(Clone)]
pub struct EngineContext {
    pub settings: EngineSettings,
    pub generator: Arc<dyn Generator>,
    pub weather: Arc<dyn WeatherService>,
    pub news: Arc<dyn NewsService>,
    pub currency: Arc<dyn CurrencyService>,
    pub translator: Arc<dyn Translator>,
    pub search: Arc<dyn SearchService>,
    pub launcher: Arc<dyn Launcher>,
    pub media: Arc<dyn MediaPlayer>,
}

impl EngineContext {
    /// Wire up the real HTTP and desktop collaborators
    pub fn from_config(config: &ZadeConfig) -> Result<Self> {
        info!("Building engine context...");

        let services = &config.services;
        let client = http_client(services.timeout_secs)?;
        let generator = LlmGenerator::new(config.generation.clone())
            .map_err(|e| ZadeError::ConfigError(e.to_string()))?;

        Ok(Self {
            settings: EngineSettings::from_config(config),
            generator: Arc::new(generator),
            weather: Arc::new(OpenWeatherClient::new(
                client.clone(),
                &services.weather_endpoint,
                services.weather_api_key.clone(),
            )),
            news: Arc::new(NewsApiClient::new(
                client.clone(),
                &services.news_endpoint,
                services.news_api_key.clone(),
                &services.news_country,
            )),
            currency: Arc::new(ExchangeRateClient::new(
                client.clone(),
                &services.currency_endpoint,
            )),
            translator: Arc::new(LibreTranslateClient::new(
                client.clone(),
                &services.translate_endpoint,
            )),
            search: Arc::new(InstantAnswerClient::new(client, &services.search_endpoint)),
            launcher: Arc::new(SystemLauncher::new(config.launcher.applications.clone())),
            media: Arc::new(BrowserMediaPlayer),
        })
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
