//! Exchange rates from exchangerate-api.com

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{CapabilityError, CurrencyService};

pub struct ExchangeRateClient {
    client: Client,
    endpoint: String,
}

impl ExchangeRateClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

pub(crate) fn parse_rate(json: &serde_json::Value, to: &str) -> Result<f64, CapabilityError> {
    json["rates"][to]
        .as_f64()
        .ok_or_else(|| CapabilityError::UnknownCurrency(to.to_string()))
}

#[async_trait]
impl CurrencyService for ExchangeRateClient {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, CapabilityError> {
        let url = format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(from)
        );
        debug!(%url, to, "fetching exchange rate");

        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CapabilityError::UnknownCurrency(from.to_string()));
        }

        let body: serde_json::Value = response.error_for_status()?.json().await?;
        parse_rate(&body, to)
    }
}
