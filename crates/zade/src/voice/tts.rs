//! Text-to-speech through a system speech program

use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::{config::SpeechConfig, VoiceError, VoiceResult};

/// Text-to-Speech trait
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text`, returning once playback has finished
    async fn speak(&self, text: &str) -> VoiceResult<()>;
}

/// Runs the configured speech program once per reply
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    config: SpeechConfig,
}

impl CommandSpeaker {
    pub fn new(config: &SpeechConfig) -> Self {
        info!("Initializing system speech via `{}`", config.command);
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> VoiceResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let start_time = Instant::now();
        let status = Command::new(&self.config.command)
            .args(self.config.render_args())
            .arg(text)
            .kill_on_drop(true)
            .status()
            .await?;

        if !status.success() {
            return Err(VoiceError::TTSError(format!(
                "{} exited with {}",
                self.config.command, status
            )));
        }

        debug!(
            "Spoke {} chars in {}ms",
            text.len(),
            start_time.elapsed().as_millis()
        );
        Ok(())
    }
}
