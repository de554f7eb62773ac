//! NewsAPI top headlines

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{CapabilityError, Headline, NewsService};

pub struct NewsApiClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    country: String,
}

impl NewsApiClient {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            country: country.into(),
        }
    }
}

pub(crate) fn parse_headlines(
    json: &serde_json::Value,
    count: usize,
) -> Result<Vec<Headline>, CapabilityError> {
    if json["status"].as_str() == Some("error") {
        let message = json["message"].as_str().unwrap_or("unknown error");
        return Err(CapabilityError::Service(message.to_string()));
    }

    let articles = json["articles"]
        .as_array()
        .ok_or_else(|| CapabilityError::Service("articles missing".to_string()))?;

    Ok(articles
        .iter()
        .filter_map(|article| {
            Some(Headline {
                title: article["title"].as_str()?.to_string(),
                description: article["description"].as_str().map(str::to_string),
            })
        })
        .take(count)
        .collect())
}

#[async_trait]
impl NewsService for NewsApiClient {
    async fn get_top_headlines(&self, count: usize) -> Result<Vec<Headline>, CapabilityError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CapabilityError::NotConfigured("news API key".to_string()))?;

        debug!(country = %self.country, count, "fetching headlines");
        let body: serde_json::Value = self
            .client
            .get(&self.endpoint)
            .query(&[("country", self.country.as_str()), ("apiKey", api_key)])
            .send()
            .await?
            .json()
            .await?;

        parse_headlines(&body, count)
    }
}
