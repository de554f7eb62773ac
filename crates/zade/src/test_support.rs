//! In-memory collaborators for unit tests

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    capabilities::{
        CapabilityError, CurrencyService, GenerationError, Generator, Headline, LaunchAck,
        Launcher, MediaPlayer, NewsService, SearchService, Translator, WeatherService,
    },
    context::{EngineContext, EngineSettings},
    voice::{InputError, InputSource, OutputSink},
};

pub const GENERATED: &str = "Gravity is the curvature of spacetime.";

/// Replays a fixed sequence of acquisition results, then reports the input closed
pub struct ScriptedInput {
    script: VecDeque<Result<Option<String>, InputError>>,
}

impl ScriptedInput {
    pub fn utterances(lines: &[&str]) -> Self {
        Self {
            script: lines.iter().map(|l| Ok(Some(l.to_string()))).collect(),
        }
    }

    pub fn with_script(script: Vec<Result<Option<String>, InputError>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn acquire_utterance(&mut self, _timeout: Duration) -> Result<Option<String>, InputError> {
        self.script.pop_front().unwrap_or(Err(InputError::Closed))
    }
}

/// Keeps every delivered reply
#[derive(Clone, Default)]
pub struct RecordingOutput {
    pub delivered: Arc<Mutex<Vec<String>>>,
}

impl RecordingOutput {
    pub fn lines(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutputSink for RecordingOutput {
    async fn deliver(&mut self, text: &str) {
        self.delivered.lock().unwrap().push(text.to_string());
    }
}

#[derive(Default)]
pub struct StubGenerator {
    pub fail: bool,
    pub prompts: Mutex<Vec<(String, u32)>>,
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, prompt: &str, max_length: u32) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_length));
        if self.fail {
            return Err(GenerationError::Timeout);
        }
        Ok(GENERATED.to_string())
    }
}

/// Knows a couple of cities; "atlantis" raises a service error
pub struct StubWeather;

#[async_trait]
impl WeatherService for StubWeather {
    async fn get_weather(&self, city: &str) -> Result<String, CapabilityError> {
        match city {
            "atlantis" => Err(CapabilityError::Service("upstream 503".to_string())),
            "london" | "paris" => Ok(format!(
                "The weather in {} is currently light rain with a temperature of 12°C.",
                city
            )),
            other => Err(CapabilityError::NotFound(other.to_string())),
        }
    }
}

pub struct StubNews {
    pub headlines: Vec<Headline>,
}

#[async_trait]
impl NewsService for StubNews {
    async fn get_top_headlines(&self, count: usize) -> Result<Vec<Headline>, CapabilityError> {
        Ok(self.headlines.iter().take(count).cloned().collect())
    }
}

pub struct StubCurrency {
    pub rates: HashMap<(String, String), f64>,
}

#[async_trait]
impl CurrencyService for StubCurrency {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, CapabilityError> {
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .ok_or_else(|| CapabilityError::UnknownCurrency(to.to_string()))
    }
}

/// Tags the text with the requested language
pub struct StubTranslator;

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, CapabilityError> {
        Ok(format!("[{}] {}", target_lang, text))
    }
}

pub struct StubSearch;

#[async_trait]
impl SearchService for StubSearch {
    async fn search(&self, query: &str) -> Result<String, CapabilityError> {
        if query == "nothing at all" {
            return Err(CapabilityError::NoResult(query.to_string()));
        }
        Ok(format!("Top result for {}", query))
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub urls: Mutex<Vec<String>>,
    pub apps: Mutex<Vec<String>>,
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn launch_app(&self, name: &str) -> Result<LaunchAck, CapabilityError> {
        self.apps.lock().unwrap().push(name.to_string());
        if name.contains("calculator") {
            Ok(LaunchAck::Launched("Calculator".to_string()))
        } else {
            Ok(LaunchAck::Unsupported)
        }
    }

    async fn open_url(&self, url: &str) -> Result<(), CapabilityError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMedia {
    pub played: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaPlayer for RecordingMedia {
    async fn play(&self, topic: &str) -> Result<(), CapabilityError> {
        self.played.lock().unwrap().push(topic.to_string());
        Ok(())
    }
}

/// Handles on the recording collaborators behind a test context
pub struct Recorders {
    pub generator: Arc<StubGenerator>,
    pub launcher: Arc<RecordingLauncher>,
    pub media: Arc<RecordingMedia>,
}

pub fn test_context() -> (EngineContext, Recorders) {
    build_context(StubGenerator::default())
}

pub fn failing_generator_context() -> (EngineContext, Recorders) {
    build_context(StubGenerator {
        fail: true,
        ..StubGenerator::default()
    })
}

fn build_context(generator: StubGenerator) -> (EngineContext, Recorders) {
    let generator = Arc::new(generator);
    let launcher = Arc::new(RecordingLauncher::default());
    let media = Arc::new(RecordingMedia::default());

    let mut rates = HashMap::new();
    rates.insert(("USD".to_string(), "EUR".to_string()), 0.5);

    let ctx = EngineContext {
        settings: EngineSettings::default(),
        generator: generator.clone(),
        weather: Arc::new(StubWeather),
        news: Arc::new(StubNews {
            headlines: vec![
                Headline {
                    title: "Markets rally".to_string(),
                    description: Some("Stocks closed higher".to_string()),
                },
                Headline {
                    title: "Storm warning".to_string(),
                    description: None,
                },
            ],
        }),
        currency: Arc::new(StubCurrency { rates }),
        translator: Arc::new(StubTranslator),
        search: Arc::new(StubSearch),
        launcher: launcher.clone(),
        media: media.clone(),
    };

    (
        ctx,
        Recorders {
            generator,
            launcher,
            media,
        },
    )
}
