//! Translation through a LibreTranslate-compatible endpoint

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{CapabilityError, Translator};

pub struct LibreTranslateClient {
    client: Client,
    endpoint: String,
}

impl LibreTranslateClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

pub(crate) fn parse_translation(json: &serde_json::Value) -> Result<String, CapabilityError> {
    if let Some(error) = json["error"].as_str() {
        return Err(CapabilityError::Service(error.to_string()));
    }
    json["translatedText"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CapabilityError::Service("translatedText missing".to_string()))
}

#[async_trait]
impl Translator for LibreTranslateClient {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, CapabilityError> {
        debug!(target_lang, "translating {} chars", text.len());

        let body: serde_json::Value = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "q": text,
                "source": "auto",
                "target": target_lang,
                "format": "text"
            }))
            .send()
            .await?
            .json()
            .await?;

        parse_translation(&body)
    }
}
