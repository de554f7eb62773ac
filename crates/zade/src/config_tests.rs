//! Tests for configuration loading

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use crate::config::{GenerationProvider, IntentsConfig, ZadeConfig};
    use crate::intent::Intent;
    use crate::voice::SpeechConfig;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "zade-{}-{}.toml",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let config = ZadeConfig::default();

        assert_eq!(config.assistant.name, "ZADE");
        assert_eq!(
            config.assistant.apology,
            "I'm sorry, I couldn't process your request."
        );
        assert_eq!(config.input.listen_timeout_secs, 7);
        assert_eq!(config.generation.provider, GenerationProvider::Ollama);
        assert_eq!(config.generation.max_length, 120);
        assert_eq!(config.services.news_count, 5);
        assert_eq!(config.services.default_language, "en");
        assert!(config.speech.enabled);
        assert!(config.launcher.applications.contains_key("calculator"));
        assert!(config.intents.enabled.is_none());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = temp_config(
            "load",
            r#"
[assistant]
name = "JARVIS"
farewell = "See you."
service_down = "Offline, try later."

[generation]
provider = "openai"
model = "gpt-4o-mini"
max_length = 200

[services]
news_count = 3

[intents]
enabled = ["time", "open_website"]
"#,
        );

        let config = ZadeConfig::load(Some(&path)).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.assistant.name, "JARVIS");
        assert_eq!(config.assistant.farewell, "See you.");
        assert_eq!(config.assistant.service_down, "Offline, try later.");
        // Unset keys keep their defaults
        assert_eq!(
            config.assistant.greeting,
            "Hello! I am your assistant. How can I help you today?"
        );
        assert_eq!(config.generation.provider, GenerationProvider::OpenAI);
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.max_length, 200);
        assert_eq!(config.services.news_count, 3);
        assert_eq!(
            config.intents.enabled,
            Some(vec![Intent::Time, Intent::OpenWebsite])
        );
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("zade-definitely-missing.toml");
        let config = ZadeConfig::load(Some(&path)).unwrap();
        assert_eq!(config.assistant.name, "ZADE");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let path = temp_config("invalid", "[generation]\nmax_length = \"lots\"\n");
        let result = ZadeConfig::load(Some(&path));
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(crate::ZadeError::ConfigError(_))));
    }

    #[test]
    fn test_keys_are_not_serialized() {
        let mut config = ZadeConfig::default();
        config.generation.api_key = Some("sk-secret".to_string());
        config.services.weather_api_key = Some("owm-secret".to_string());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_intents_config_always_enables_engine_intents() {
        let intents = IntentsConfig {
            enabled: Some(vec![Intent::Weather]),
        };
        assert!(intents.is_enabled(Intent::Weather));
        assert!(intents.is_enabled(Intent::Generate));
        assert!(intents.is_enabled(Intent::Exit));
        assert!(!intents.is_enabled(Intent::News));

        let everything = IntentsConfig::default();
        assert!(Intent::ALL.iter().all(|i| everything.is_enabled(*i)));
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(
            "OpenAI".parse::<GenerationProvider>(),
            Ok(GenerationProvider::OpenAI)
        );
        assert!("bard".parse::<GenerationProvider>().is_err());
    }

    #[test]
    fn test_speech_args_substitution() {
        let speech = SpeechConfig::default();
        assert_eq!(speech.amplitude(), 90);
        assert_eq!(speech.render_args(), vec!["-s", "150", "-a", "90"]);

        let say = SpeechConfig {
            command: "say".to_string(),
            args: vec!["-r".to_string(), "{rate}".to_string()],
            rate: 180,
            ..SpeechConfig::default()
        };
        assert_eq!(say.render_args(), vec!["-r", "180"]);
        assert!(!SpeechConfig::disabled().enabled);
    }
}
