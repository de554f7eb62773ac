//! Intent classification
//!
//! A deterministic, table-driven matcher. Rules are `(trigger phrase, intent)` pairs
//! scanned in order; the first trigger contained in the utterance wins. Containment is a
//! plain substring test, not a word match, so "notime" resolves to [`Intent::Time`].
//! Keep longer phrases ahead of the shorter phrases they contain ("open website" before
//! "open"), otherwise the specific rule can never fire.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalizer::NormalizedUtterance;

/// Words that end the session regardless of the rule table
pub const TERMINATION_PHRASES: &[&str] = &["exit", "quit"];

/// Action category an utterance resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Weather,
    Time,
    Joke,
    Translate,
    Search,
    OpenWebsite,
    OpenApp,
    News,
    Currency,
    Summarize,
    PlayMedia,
    /// Terminal intent; never stored in the rule table
    Exit,
    /// Fallback when no rule matches
    Generate,
}

impl Intent {
    pub const ALL: [Intent; 13] = [
        Intent::Weather,
        Intent::Time,
        Intent::Joke,
        Intent::Translate,
        Intent::Search,
        Intent::OpenWebsite,
        Intent::OpenApp,
        Intent::News,
        Intent::Currency,
        Intent::Summarize,
        Intent::PlayMedia,
        Intent::Exit,
        Intent::Generate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Weather => "weather",
            Intent::Time => "time",
            Intent::Joke => "joke",
            Intent::Translate => "translate",
            Intent::Search => "search",
            Intent::OpenWebsite => "open_website",
            Intent::OpenApp => "open_app",
            Intent::News => "news",
            Intent::Currency => "currency",
            Intent::Summarize => "summarize",
            Intent::PlayMedia => "play_media",
            Intent::Exit => "exit",
            Intent::Generate => "generate",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Intent::Exit)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == wanted)
            .ok_or_else(|| format!("Unknown intent: {}", s))
    }
}

/// One ordered entry of the rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub trigger: String,
    pub intent: Intent,
}

impl Rule {
    pub fn new(trigger: impl Into<String>, intent: Intent) -> Self {
        Self {
            trigger: trigger.into(),
            intent,
        }
    }
}

/// Outcome of resolving one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentMatch {
    pub intent: Intent,
    /// Trigger phrase that fired; `None` for the terminal and fallback intents
    pub trigger: Option<String>,
}

impl IntentMatch {
    fn fallback() -> Self {
        Self {
            intent: Intent::Generate,
            trigger: None,
        }
    }
}

/// Ordered, immutable rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The full assistant's table, most specific phrases first
    pub fn standard() -> Self {
        Self::new(vec![
            Rule::new("weather in", Intent::Weather),
            Rule::new("weather", Intent::Weather),
            Rule::new("search for", Intent::Search),
            Rule::new("on youtube", Intent::PlayMedia),
            Rule::new("time", Intent::Time),
            Rule::new("joke", Intent::Joke),
            Rule::new("translate", Intent::Translate),
            Rule::new("search", Intent::Search),
            Rule::new("open website", Intent::OpenWebsite),
            Rule::new("open", Intent::OpenApp),
            Rule::new("news", Intent::News),
            Rule::new("currency", Intent::Currency),
            Rule::new("summarize", Intent::Summarize),
        ])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Drop every rule whose intent fails `keep`, preserving order
    pub fn retain_intents(mut self, keep: impl Fn(Intent) -> bool) -> Self {
        self.rules.retain(|rule| keep(rule.intent));
        self
    }

    /// Resolve an utterance. Termination words are checked before any rule.
    pub fn resolve(&self, utterance: &NormalizedUtterance) -> IntentMatch {
        if is_termination(utterance) {
            return IntentMatch {
                intent: Intent::Exit,
                trigger: None,
            };
        }

        let matched = self
            .rules
            .iter()
            .find(|rule| utterance.contains(&rule.trigger))
            .map(|rule| IntentMatch {
                intent: rule.intent,
                trigger: Some(rule.trigger.clone()),
            })
            .unwrap_or_else(IntentMatch::fallback);

        debug!(
            intent = %matched.intent,
            trigger = matched.trigger.as_deref().unwrap_or("-"),
            "resolved utterance"
        );
        matched
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn is_termination(utterance: &NormalizedUtterance) -> bool {
    TERMINATION_PHRASES
        .iter()
        .any(|phrase| utterance.contains(phrase))
}
