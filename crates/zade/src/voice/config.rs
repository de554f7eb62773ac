//! Speech output configuration

use serde::{Deserialize, Serialize};

/// Settings for the system speech program
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// Program invoked once per reply, e.g. `espeak` or `say`
    pub command: String,
    /// Arguments placed before the text. `{rate}`, `{volume}` and `{amplitude}` are
    /// substituted from the fields below.
    pub args: Vec<String>,
    /// Words per minute
    pub rate: u32,
    /// 0.0 to 1.0
    pub volume: f32,
}

impl SpeechConfig {
    /// espeak amplitude scale is 0-200 with 100 as normal
    pub fn amplitude(&self) -> u32 {
        (self.volume.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    pub fn render_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{rate}", &self.rate.to_string())
                    .replace("{volume}", &format!("{:.2}", self.volume))
                    .replace("{amplitude}", &self.amplitude().to_string())
            })
            .collect()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "espeak".to_string(),
            args: vec![
                "-s".to_string(),
                "{rate}".to_string(),
                "-a".to_string(),
                "{amplitude}".to_string(),
            ],
            rate: 150,
            volume: 0.9,
        }
    }
}
