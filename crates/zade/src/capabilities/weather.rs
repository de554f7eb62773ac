//! OpenWeatherMap current conditions

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{CapabilityError, WeatherService};

pub struct OpenWeatherClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

/// Render the reply sentence from an OpenWeatherMap body. The API reports failures in
/// the `cod` field, as a number or a string depending on the error.
pub(crate) fn parse_weather(
    json: &serde_json::Value,
    city: &str,
) -> Result<String, CapabilityError> {
    let cod = match &json["cod"] {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    };
    if cod != Some(200) {
        return Err(CapabilityError::NotFound(city.to_string()));
    }

    let description = json["weather"][0]["description"]
        .as_str()
        .ok_or_else(|| CapabilityError::Service("weather description missing".to_string()))?;
    let temp = json["main"]["temp"]
        .as_f64()
        .ok_or_else(|| CapabilityError::Service("temperature missing".to_string()))?;

    Ok(format!(
        "The weather in {} is currently {} with a temperature of {}°C.",
        city, description, temp
    ))
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    async fn get_weather(&self, city: &str) -> Result<String, CapabilityError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CapabilityError::NotConfigured("weather API key".to_string()))?;

        debug!(city, "fetching weather");
        let body: serde_json::Value = self
            .client
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await?
            .json()
            .await?;

        parse_weather(&body, city)
    }
}
