//! Voice collaborators for the dispatch loop
//!
//! The engine never captures audio or synthesizes speech itself. It talks to an
//! [`InputSource`] that yields one utterance per turn and an [`OutputSink`] that presents
//! each reply. Recognition failures are reported through [`InputError`] and treated by the
//! loop exactly like silence.

pub mod config;
pub mod tts;

use std::time::Duration;

use async_trait::async_trait;

pub use config::SpeechConfig;
pub use tts::{CommandSpeaker, Speaker};

/// Why an utterance could not be acquired
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("could not understand the audio")]
    Unintelligible,

    #[error("recognition service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The source will never yield another utterance (end of stream)
    #[error("input closed")]
    Closed,
}

/// Speech synthesis errors
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("TTS error: {0}")]
    TTSError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type VoiceResult<T> = Result<T, VoiceError>;

/// Source of user utterances, one per turn
#[async_trait]
pub trait InputSource: Send {
    /// Wait up to `timeout` for one utterance. `Ok(None)` means nothing was heard.
    async fn acquire_utterance(&mut self, timeout: Duration) -> Result<Option<String>, InputError>;
}

/// Destination for assistant replies (display plus speech)
#[async_trait]
pub trait OutputSink: Send {
    /// Present a reply. Failures are the sink's own concern and are not reported back.
    async fn deliver(&mut self, text: &str);
}
