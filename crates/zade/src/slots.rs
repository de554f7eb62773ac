//! Slot extraction
//!
//! Turns a resolved utterance into the payload its handler consumes. Most intents take the
//! utterance with the first occurrence of the trigger removed; currency conversion reads
//! positional tokens instead, and translation may carry a trailing target language.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    intent::{Intent, IntentMatch},
    normalizer::NormalizedUtterance,
};

/// Target language used when a translation request names none
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

static TRAILING_LANGUAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<text>.*?)\s+(?:to|into)\s+(?P<lang>[a-z]+)$")
        .expect("trailing language pattern is valid")
});

const LANGUAGES: &[(&str, &str)] = &[
    ("english", "en"),
    ("french", "fr"),
    ("spanish", "es"),
    ("german", "de"),
    ("italian", "it"),
    ("portuguese", "pt"),
    ("dutch", "nl"),
    ("russian", "ru"),
    ("polish", "pl"),
    ("swedish", "sv"),
    ("greek", "el"),
    ("turkish", "tr"),
    ("arabic", "ar"),
    ("hindi", "hi"),
    ("bengali", "bn"),
    ("urdu", "ur"),
    ("tamil", "ta"),
    ("telugu", "te"),
    ("chinese", "zh"),
    ("japanese", "ja"),
    ("korean", "ko"),
];

/// Amount and currency codes read from "currency <amount> <from> <to>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

/// Intent-specific data pulled out of an utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotPayload {
    /// Intent needs no data (time, joke, news)
    Empty,
    Text(String),
    Currency(CurrencyRequest),
    Translation { text: String, target_lang: String },
}

impl SlotPayload {
    /// Free text carried by the payload, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            SlotPayload::Text(text) => Some(text),
            SlotPayload::Translation { text, .. } => Some(text),
            SlotPayload::Empty | SlotPayload::Currency(_) => None,
        }
    }
}

/// Slot extraction failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedSlotError {
    #[error("expected at least {expected} tokens, found {found}")]
    MissingTokens { expected: usize, found: usize },

    #[error("amount is not a number: {0}")]
    InvalidAmount(String),
}

/// Extract the payload for a resolved utterance
pub fn extract(
    utterance: &NormalizedUtterance,
    matched: &IntentMatch,
    default_language: &str,
) -> Result<SlotPayload, MalformedSlotError> {
    let payload = match matched.intent {
        Intent::Time | Intent::Joke | Intent::News | Intent::Exit => SlotPayload::Empty,
        Intent::Generate => SlotPayload::Text(utterance.as_str().to_string()),
        Intent::Currency => SlotPayload::Currency(parse_currency(utterance)?),
        Intent::Translate => {
            let remainder = strip_trigger(utterance, matched.trigger.as_deref());
            let (text, target_lang) = split_target_language(&remainder, default_language);
            SlotPayload::Translation { text, target_lang }
        }
        Intent::PlayMedia => {
            let remainder = strip_trigger(utterance, matched.trigger.as_deref());
            SlotPayload::Text(strip_leading_word(&remainder, "play"))
        }
        Intent::Weather
        | Intent::Search
        | Intent::OpenWebsite
        | Intent::OpenApp
        | Intent::Summarize => {
            SlotPayload::Text(strip_trigger(utterance, matched.trigger.as_deref()))
        }
    };

    debug!(intent = %matched.intent, ?payload, "extracted slot");
    Ok(payload)
}

/// Remove the first occurrence of `trigger` and trim what is left
pub fn strip_trigger(utterance: &NormalizedUtterance, trigger: Option<&str>) -> String {
    match trigger {
        Some(trigger) if !trigger.is_empty() => utterance
            .as_str()
            .replacen(trigger, "", 1)
            .trim()
            .to_string(),
        _ => utterance.as_str().trim().to_string(),
    }
}

/// Read tokens 2 to 4 as `(amount, from, to)`; codes are upper-cased
pub fn parse_currency(
    utterance: &NormalizedUtterance,
) -> Result<CurrencyRequest, MalformedSlotError> {
    let tokens: Vec<&str> = utterance.as_str().split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(MalformedSlotError::MissingTokens {
            expected: 4,
            found: tokens.len(),
        });
    }

    let amount = tokens[1]
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| MalformedSlotError::InvalidAmount(tokens[1].to_string()))?;

    Ok(CurrencyRequest {
        amount,
        from: tokens[2].to_uppercase(),
        to: tokens[3].to_uppercase(),
    })
}

/// Map a language name or two-letter code to its code
pub fn language_code(word: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(name, code)| *name == word || *code == word)
        .map(|(_, code)| *code)
}

fn split_target_language(remainder: &str, default_language: &str) -> (String, String) {
    if let Some(caps) = TRAILING_LANGUAGE.captures(remainder) {
        if let Some(code) = language_code(&caps["lang"]) {
            return (caps["text"].trim().to_string(), code.to_string());
        }
    }
    (remainder.to_string(), default_language.to_string())
}

fn strip_leading_word(text: &str, word: &str) -> String {
    match text.strip_prefix(word) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            rest.trim().to_string()
        }
        _ => text.to_string(),
    }
}
