//! Output formatting and terminal rendering
//!
//! Replies are printed as `NAME: text` and, when speech is enabled, spoken through the
//! configured speech program.

use async_trait::async_trait;
use colored::Colorize;
use tracing::warn;
use zade::{
    voice::{CommandSpeaker, Speaker},
    OutputSink, RuleTable, ZadeConfig,
};

/// Console (and optional speech) output for assistant replies
pub struct ConsoleOutput {
    name: String,
    speaker: Option<Box<dyn Speaker>>,
}

impl ConsoleOutput {
    pub fn new(config: &ZadeConfig) -> Self {
        let speaker: Option<Box<dyn Speaker>> = if config.speech.enabled {
            Some(Box::new(CommandSpeaker::new(&config.speech)))
        } else {
            None
        };

        Self {
            name: config.assistant.name.clone(),
            speaker,
        }
    }

    pub fn speech_enabled(&self) -> bool {
        self.speaker.is_some()
    }

    /// Print the welcome banner
    pub fn print_banner(&self, rule_count: usize) {
        println!();
        println!(
            "{}",
            "╔═══════════════════════════════════════════════════════════════╗".bright_cyan()
        );
        println!(
            "{}  {:<61}{}",
            "║".bright_cyan(),
            format!("{} voice command assistant", self.name).bright_white(),
            "║".bright_cyan()
        );
        println!(
            "{}",
            "╠═══════════════════════════════════════════════════════════════╣".bright_cyan()
        );
        println!(
            "{}  Rules: {:<54}{}",
            "║".bright_cyan(),
            rule_count,
            "║".bright_cyan()
        );
        println!(
            "{}  Speech: {:<53}{}",
            "║".bright_cyan(),
            if self.speech_enabled() { "on" } else { "off" },
            "║".bright_cyan()
        );
        println!(
            "{}  {}                        {}",
            "║".bright_cyan(),
            "Say \"exit\" or \"quit\" to end the session".dimmed(),
            "║".bright_cyan()
        );
        println!(
            "{}",
            "╚═══════════════════════════════════════════════════════════════╝".bright_cyan()
        );
        println!();
    }
}

#[async_trait]
impl OutputSink for ConsoleOutput {
    async fn deliver(&mut self, text: &str) {
        println!("{}: {}", self.name.bright_green().bold(), text);

        if let Some(speaker) = &self.speaker {
            if let Err(e) = speaker.speak(text).await {
                warn!("Speech output failed: {}", e);
            }
        }
    }
}

/// Print the ordered rule table
pub fn print_rules(rules: &RuleTable) {
    println!();
    println!("{}", "▶ Rule table".bright_yellow().bold());
    println!("{}", "─".repeat(60).dimmed());
    for (index, rule) in rules.rules().iter().enumerate() {
        println!(
            "{:>3}. {:<20} {}",
            index + 1,
            format!("\"{}\"", rule.trigger).bright_white(),
            rule.intent.as_str().cyan()
        );
    }
    println!(
        "{}",
        "     (exit / quit end the session; anything else goes to generation)".dimmed()
    );
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("{} {}", "ℹ".bright_blue(), text);
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("{} {}", "⚠".bright_yellow(), text.yellow());
}
