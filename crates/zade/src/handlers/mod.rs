//! Handler registry and the recovery boundary
//!
//! Each intent maps to one [`Handler`]. [`HandlerRegistry::invoke`] runs slot extraction and
//! the handler behind a single boundary: any failure, including a panic inside a handler,
//! is logged and replaced by the configured apology, so a turn always produces a
//! [`HandlerResult`].

mod desktop;
mod generate;
mod local;
mod lookup;

use std::{collections::HashMap, panic::AssertUnwindSafe, sync::Arc};

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{info, warn};

pub use desktop::{
    website_url, OpenAppHandler, OpenWebsiteHandler, PlayMediaHandler, UNSUPPORTED_APPLICATION,
};
pub use generate::GenerateHandler;
pub use local::{summarize, JokeHandler, SummarizeHandler, TimeHandler, JOKES};
pub use lookup::{CurrencyHandler, NewsHandler, SearchHandler, TranslateHandler, WeatherHandler};

use crate::{
    capabilities::{CapabilityError, GenerationError},
    config::IntentsConfig,
    context::EngineContext,
    intent::{Intent, IntentMatch, RuleTable},
    normalizer::NormalizedUtterance,
    slots::{self, MalformedSlotError, SlotPayload},
};

/// Something the assistant does besides talking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    OpenUrl(String),
    LaunchApp(String),
    PlayMedia(String),
}

/// When a handler's side effect happens relative to delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Already carried out by the handler, before the reply is delivered
    Performed(SideEffect),
    /// Left to the dispatch loop to start after the reply is delivered
    Deferred(SideEffect),
}

/// Reply text plus any side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResult {
    pub text: String,
    pub effect: Effect,
}

impl HandlerResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            effect: Effect::None,
        }
    }

    pub fn with_effect(text: impl Into<String>, effect: Effect) -> Self {
        Self {
            text: text.into(),
            effect,
        }
    }

    pub fn has_side_effect(&self) -> bool {
        !matches!(self.effect, Effect::None)
    }
}

/// Classified handler failure; never escapes [`HandlerRegistry::invoke`]
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("malformed slot: {0}")]
    MalformedSlot(#[from] MalformedSlotError),

    #[error("{0} needs a value but the utterance carried none")]
    MissingSlot(Intent),

    #[error("{0} received a payload it cannot use")]
    UnexpectedPayload(Intent),

    #[error("external call failed: {0}")]
    ExternalCall(#[from] CapabilityError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("no handler registered for {0}")]
    Unregistered(Intent),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Short category name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::MalformedSlot(_)
            | HandlerError::MissingSlot(_)
            | HandlerError::UnexpectedPayload(_) => "malformed_slot",
            HandlerError::ExternalCall(_) => "external_call_failure",
            HandlerError::Generation(_) => "generation_failure",
            HandlerError::Unregistered(_) | HandlerError::Panicked(_) => "internal",
        }
    }
}

pub type HandlerOutcome = Result<HandlerResult, HandlerError>;

/// Behavior bound to one intent
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome;
}

/// Text payload or [`HandlerError::MissingSlot`] when it is blank
pub(crate) fn required_text(intent: Intent, payload: &SlotPayload) -> Result<String, HandlerError> {
    match payload.text() {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(_) => Err(HandlerError::MissingSlot(intent)),
        None => Err(HandlerError::UnexpectedPayload(intent)),
    }
}

/// Intent → handler map; immutable once the engine starts
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<Intent, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    /// Registry with only the fallback generator
    pub fn new() -> Self {
        let mut handlers: HashMap<Intent, Arc<dyn Handler>> = HashMap::new();
        handlers.insert(Intent::Generate, Arc::new(GenerateHandler));
        Self { handlers }
    }

    /// Every built-in handler
    pub fn standard() -> Self {
        Self::new()
            .register(Intent::Weather, WeatherHandler)
            .register(Intent::Time, TimeHandler)
            .register(Intent::Joke, JokeHandler)
            .register(Intent::Translate, TranslateHandler)
            .register(Intent::Search, SearchHandler)
            .register(Intent::OpenWebsite, OpenWebsiteHandler)
            .register(Intent::OpenApp, OpenAppHandler)
            .register(Intent::News, NewsHandler)
            .register(Intent::Currency, CurrencyHandler)
            .register(Intent::Summarize, SummarizeHandler)
            .register(Intent::PlayMedia, PlayMediaHandler)
    }

    /// Built-in handlers restricted to what this deployment enables
    pub fn from_config(intents: &IntentsConfig) -> Self {
        let mut registry = Self::standard();
        registry
            .handlers
            .retain(|intent, _| intents.is_enabled(*intent));
        info!(
            "Registered handlers: {}",
            registry
                .intents()
                .iter()
                .map(Intent::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        registry
    }

    pub fn register(mut self, intent: Intent, handler: impl Handler + 'static) -> Self {
        self.handlers.insert(intent, Arc::new(handler));
        self
    }

    pub fn contains(&self, intent: Intent) -> bool {
        self.handlers.contains_key(&intent)
    }

    /// Registered intents in declaration order
    pub fn intents(&self) -> Vec<Intent> {
        Intent::ALL
            .iter()
            .copied()
            .filter(|intent| self.contains(*intent))
            .collect()
    }

    /// Drop rules whose intent has no handler, so they fall through to generation
    pub fn restrict_rules(&self, table: RuleTable) -> RuleTable {
        table.retain_intents(|intent| self.contains(intent))
    }

    /// Extract the slot and run the handler. Never fails: errors become the apology.
    pub async fn invoke(
        &self,
        ctx: &EngineContext,
        utterance: &NormalizedUtterance,
        matched: &IntentMatch,
    ) -> HandlerResult {
        match self.try_invoke(ctx, utterance, matched).await {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    intent = %matched.intent,
                    kind = err.kind(),
                    error = %err,
                    "handler failed; replying with apology"
                );
                HandlerResult::text(ctx.settings.apology.clone())
            }
        }
    }

    async fn try_invoke(
        &self,
        ctx: &EngineContext,
        utterance: &NormalizedUtterance,
        matched: &IntentMatch,
    ) -> HandlerOutcome {
        let payload = slots::extract(utterance, matched, &ctx.settings.default_language)?;
        let handler = self
            .handlers
            .get(&matched.intent)
            .ok_or(HandlerError::Unregistered(matched.intent))?;

        AssertUnwindSafe(handler.handle(ctx, payload))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(HandlerError::Panicked(panic_message(panic.as_ref()))))
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
