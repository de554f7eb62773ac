//! Dispatch loop
//!
//! ```text
//! AwaitingInput ──utterance──▶ Resolving ──intent──▶ Invoking ──result──▶ Delivering
//!      ▲   │ empty / unintelligible    │ exit / quit                          │
//!      │   └───────────────────────────┼──────────────────────────────────────┘
//!      │                               ▼
//!      └───────────────────────────  Stopped
//! ```
//!
//! Exactly one turn is in flight at a time. Handler failures are absorbed by the registry,
//! so only the terminal intent (or a closed input source) ends the loop. A recognizer that
//! cannot make out the audio or cannot be reached gets a spoken notice before listening resumes.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    config::ZadeConfig,
    context::EngineContext,
    handlers::{Effect, HandlerRegistry, HandlerResult, SideEffect},
    intent::{IntentMatch, RuleTable},
    normalizer::NormalizedUtterance,
    voice::{InputError, InputSource, OutputSink},
};

/// Resolution and invocation, independent of any input or output device
#[derive(Clone)]
pub struct Engine {
    rules: RuleTable,
    registry: HandlerRegistry,
}

impl Engine {
    /// Rules whose intent has no registered handler are dropped
    pub fn new(rules: RuleTable, registry: HandlerRegistry) -> Self {
        let rules = registry.restrict_rules(rules);
        Self { rules, registry }
    }

    pub fn from_config(config: &ZadeConfig) -> Self {
        Self::new(
            RuleTable::standard(),
            HandlerRegistry::from_config(&config.intents),
        )
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Normalize and match one raw utterance
    pub fn resolve(&self, raw: &str) -> (NormalizedUtterance, IntentMatch) {
        let utterance = NormalizedUtterance::new(raw);
        let matched = self.rules.resolve(&utterance);
        (utterance, matched)
    }

    /// Run slot extraction and the handler; always yields a result
    pub async fn invoke(
        &self,
        ctx: &EngineContext,
        utterance: &NormalizedUtterance,
        matched: &IntentMatch,
    ) -> HandlerResult {
        self.registry.invoke(ctx, utterance, matched).await
    }
}

/// Start a deferred side effect. Fire-and-forget: failures are only logged.
pub async fn apply_deferred(ctx: &EngineContext, effect: &Effect) {
    let Effect::Deferred(side_effect) = effect else {
        return;
    };

    let outcome = match side_effect {
        SideEffect::PlayMedia(topic) => ctx.media.play(topic).await,
        SideEffect::OpenUrl(url) => ctx.launcher.open_url(url).await,
        SideEffect::LaunchApp(name) => ctx.launcher.launch_app(name).await.map(|_| ()),
    };

    if let Err(err) = outcome {
        warn!(?side_effect, error = %err, "deferred side effect failed");
    }
}

/// Where the loop currently is, carrying the data for the next transition
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchState {
    AwaitingInput,
    Resolving(String),
    Invoking(NormalizedUtterance, IntentMatch),
    Delivering(HandlerResult),
    Stopped,
}

/// Phrases and timing the loop needs besides the engine
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub greeting: Option<String>,
    pub farewell: String,
    pub unintelligible: String,
    pub service_down: String,
    pub listen_timeout: Duration,
}

impl LoopSettings {
    pub fn from_config(config: &ZadeConfig) -> Self {
        Self {
            greeting: Some(config.assistant.greeting.clone()),
            farewell: config.assistant.farewell.clone(),
            unintelligible: config.assistant.unintelligible.clone(),
            service_down: config.assistant.service_down.clone(),
            listen_timeout: Duration::from_secs(config.input.listen_timeout_secs),
        }
    }
}

/// What a finished session did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Turns that reached delivery
    pub turns: usize,
    /// Acquisitions that produced nothing usable, silent or failed
    pub idle_polls: usize,
}

/// Drives acquisition, resolution, invocation and delivery until the user quits
pub struct DispatchLoop<'a> {
    engine: &'a Engine,
    ctx: &'a EngineContext,
    input: Box<dyn InputSource + 'a>,
    output: Box<dyn OutputSink + 'a>,
    settings: LoopSettings,
    state: DispatchState,
    summary: SessionSummary,
}

impl<'a> DispatchLoop<'a> {
    pub fn new(
        engine: &'a Engine,
        ctx: &'a EngineContext,
        input: Box<dyn InputSource + 'a>,
        output: Box<dyn OutputSink + 'a>,
        settings: LoopSettings,
    ) -> Self {
        Self {
            engine,
            ctx,
            input,
            output,
            settings,
            state: DispatchState::AwaitingInput,
            summary: SessionSummary::default(),
        }
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Greet, then step until [`DispatchState::Stopped`]
    pub async fn run(mut self) -> SessionSummary {
        if let Some(greeting) = self.settings.greeting.clone() {
            self.output.deliver(&greeting).await;
        }

        while self.state != DispatchState::Stopped {
            self.step().await;
        }

        info!(
            turns = self.summary.turns,
            idle = self.summary.idle_polls,
            "dispatch loop stopped"
        );
        self.summary
    }

    /// Perform exactly one state transition
    pub async fn step(&mut self) {
        let current = std::mem::replace(&mut self.state, DispatchState::Stopped);
        self.state = match current {
            DispatchState::AwaitingInput => self.acquire().await,
            DispatchState::Resolving(raw) => self.resolve(&raw).await,
            DispatchState::Invoking(utterance, matched) => {
                let result = self.engine.invoke(self.ctx, &utterance, &matched).await;
                DispatchState::Delivering(result)
            }
            DispatchState::Delivering(result) => {
                self.deliver(result).await;
                DispatchState::AwaitingInput
            }
            DispatchState::Stopped => DispatchState::Stopped,
        };
    }

    async fn acquire(&mut self) -> DispatchState {
        match self
            .input
            .acquire_utterance(self.settings.listen_timeout)
            .await
        {
            Ok(Some(raw)) if !raw.trim().is_empty() => DispatchState::Resolving(raw),
            Ok(_) => {
                self.summary.idle_polls += 1;
                DispatchState::AwaitingInput
            }
            Err(InputError::Closed) => {
                info!("input closed; ending session");
                self.output.deliver(&self.settings.farewell).await;
                DispatchState::Stopped
            }
            Err(err) => {
                debug!(error = %err, "no usable utterance");
                let notice = match err {
                    InputError::ServiceUnavailable(_) => &self.settings.service_down,
                    InputError::Unintelligible | InputError::Closed => {
                        &self.settings.unintelligible
                    }
                };
                self.output.deliver(notice).await;
                self.summary.idle_polls += 1;
                DispatchState::AwaitingInput
            }
        }
    }

    async fn resolve(&mut self, raw: &str) -> DispatchState {
        let (utterance, matched) = self.engine.resolve(raw);
        if utterance.is_empty() {
            return DispatchState::AwaitingInput;
        }

        info!(intent = %matched.intent, "resolved turn");
        if matched.intent.is_terminal() {
            self.output.deliver(&self.settings.farewell).await;
            return DispatchState::Stopped;
        }
        DispatchState::Invoking(utterance, matched)
    }

    async fn deliver(&mut self, result: HandlerResult) {
        self.output.deliver(&result.text).await;
        apply_deferred(self.ctx, &result.effect).await;
        self.summary.turns += 1;
    }
}
