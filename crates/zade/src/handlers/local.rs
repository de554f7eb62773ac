//! Handlers answered without leaving the process

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;

use super::{required_text, Handler, HandlerOutcome, HandlerResult};
use crate::{context::EngineContext, intent::Intent, slots::SlotPayload};

/// Sentences kept by the summarizer
const SUMMARY_SENTENCES: usize = 3;

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").expect("sentence pattern is valid"));

pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are only 10 kinds of people in this world: those who know binary and those who don't.",
    "A SQL query walks into a bar, goes up to two tables and asks: may I join you?",
    "Why did the developer go broke? Because he used up all his cache.",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "Why do Java developers wear glasses? Because they don't C sharp.",
    "Knock knock. Race condition. Who's there?",
    "The best thing about a boolean is that even if you are wrong, you are only off by a bit.",
    "Why was the function sad after the party? It didn't get any callbacks.",
    "An optimist says the glass is half full. A programmer says the glass is twice as large as it needs to be.",
];

pub struct TimeHandler;

#[async_trait]
impl Handler for TimeHandler {
    async fn handle(&self, _ctx: &EngineContext, _payload: SlotPayload) -> HandlerOutcome {
        let now = chrono::Local::now().format("%H:%M:%S");
        Ok(HandlerResult::text(format!("The current time is {}.", now)))
    }
}

pub struct JokeHandler;

#[async_trait]
impl Handler for JokeHandler {
    async fn handle(&self, _ctx: &EngineContext, _payload: SlotPayload) -> HandlerOutcome {
        let joke = JOKES.choose(&mut rand::thread_rng()).copied().unwrap_or_default();
        Ok(HandlerResult::text(joke))
    }
}

/// First few sentences of `text`, whitespace-normalized
pub fn summarize(text: &str) -> String {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|sentence| !sentence.is_empty())
        .take(SUMMARY_SENTENCES)
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct SummarizeHandler;

#[async_trait]
impl Handler for SummarizeHandler {
    async fn handle(&self, _ctx: &EngineContext, payload: SlotPayload) -> HandlerOutcome {
        let text = required_text(Intent::Summarize, &payload)?;
        Ok(HandlerResult::text(summarize(&text)))
    }
}
