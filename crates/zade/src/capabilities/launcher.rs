//! Desktop side effects: applications, the default browser and media playback

use std::{cmp::Reverse, collections::BTreeMap};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use super::{CapabilityError, LaunchAck, Launcher, MediaPlayer};

/// Starts configured applications and opens URLs in the default browser
pub struct SystemLauncher {
    applications: BTreeMap<String, String>,
}

impl SystemLauncher {
    pub fn new(applications: BTreeMap<String, String>) -> Self {
        Self { applications }
    }

    /// The configured application named earliest in the request.
    ///
    /// Of names starting at the same position the longest wins, so "notepad" beats "note".
    pub fn lookup(&self, requested: &str) -> Option<(&str, &str)> {
        self.applications
            .iter()
            .filter_map(|(name, command)| {
                requested
                    .find(name.as_str())
                    .map(|position| (position, name.as_str(), command.as_str()))
            })
            .min_by_key(|(position, name, _)| (*position, Reverse(name.len())))
            .map(|(_, name, command)| (name, command))
    }
}

/// "calculator" -> "Calculator"
fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl Launcher for SystemLauncher {
    async fn launch_app(&self, requested: &str) -> Result<LaunchAck, CapabilityError> {
        let Some((name, command_line)) = self.lookup(requested) else {
            warn!(requested, "no launcher entry for application");
            return Ok(LaunchAck::Unsupported);
        };

        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| CapabilityError::NotConfigured(format!("empty command for {}", name)))?;

        Command::new(program)
            .args(parts)
            .spawn()
            .map_err(|e| CapabilityError::Service(format!("failed to start {}: {}", name, e)))?;

        info!(application = name, "launched application");
        Ok(LaunchAck::Launched(display_name(name)))
    }

    async fn open_url(&self, url: &str) -> Result<(), CapabilityError> {
        open::that_detached(url)
            .map_err(|e| CapabilityError::Service(format!("failed to open {}: {}", url, e)))?;
        info!(url, "opened in browser");
        Ok(())
    }
}

/// Plays media by opening a YouTube search for the topic in the default browser
#[derive(Debug, Default)]
pub struct BrowserMediaPlayer;

impl BrowserMediaPlayer {
    pub fn playback_url(topic: &str) -> String {
        format!(
            "https://www.youtube.com/results?search_query={}",
            urlencoding::encode(topic)
        )
    }
}

#[async_trait]
impl MediaPlayer for BrowserMediaPlayer {
    async fn play(&self, topic: &str) -> Result<(), CapabilityError> {
        let url = Self::playback_url(topic);
        open::that_detached(&url)
            .map_err(|e| CapabilityError::Service(format!("failed to start playback: {}", e)))?;
        info!(topic, "started playback");
        Ok(())
    }
}
