//! # Zade - Voice Command Assistant
//!
//! Rule-based intent resolution and dispatch. An utterance is normalized, matched against
//! an ordered table of trigger phrases, stripped down to its slot, and handed to the
//! handler registered for the intent. Anything the table does not claim goes to a
//! generative model.

pub mod capabilities;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod handlers;
pub mod intent;
pub mod normalizer;
pub mod slots;
pub mod voice;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod handlers_tests;

pub use capabilities::{CapabilityError, GenerationError, Headline, LaunchAck};
pub use config::ZadeConfig;
pub use context::{EngineContext, EngineSettings};
pub use dispatch::{DispatchLoop, DispatchState, Engine, LoopSettings, SessionSummary};
pub use handlers::{Effect, Handler, HandlerError, HandlerRegistry, HandlerResult, SideEffect};
pub use intent::{Intent, IntentMatch, Rule, RuleTable};
pub use normalizer::{normalize, NormalizedUtterance};
pub use slots::{CurrencyRequest, MalformedSlotError, SlotPayload};
pub use voice::{InputError, InputSource, OutputSink};

/// Main error types for Zade operations
#[derive(Debug, thiserror::Error)]
pub enum ZadeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ZadeError>;

/// Build the engine and its context from configuration
pub fn initialize(config: &ZadeConfig) -> Result<(Engine, EngineContext)> {
    tracing::info!("Initializing Zade...");

    let context = EngineContext::from_config(config)?;
    let engine = Engine::from_config(config);

    tracing::info!(
        rules = engine.rules().len(),
        "Zade initialized successfully"
    );
    Ok((engine, context))
}
