//! Web search via a DuckDuckGo instant-answer style endpoint

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{CapabilityError, SearchService};

pub struct InstantAnswerClient {
    client: Client,
    endpoint: String,
}

impl InstantAnswerClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

/// Best snippet: the abstract, then a direct answer, then the first related topic
pub(crate) fn parse_top_result(
    json: &serde_json::Value,
    query: &str,
) -> Result<String, CapabilityError> {
    let non_empty = |value: &serde_json::Value| {
        value
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    non_empty(&json["AbstractText"])
        .or_else(|| non_empty(&json["Answer"]))
        .or_else(|| {
            json["RelatedTopics"]
                .as_array()?
                .iter()
                .find_map(|topic| non_empty(&topic["Text"]))
        })
        .ok_or_else(|| CapabilityError::NoResult(query.to_string()))
}

#[async_trait]
impl SearchService for InstantAnswerClient {
    async fn search(&self, query: &str) -> Result<String, CapabilityError> {
        debug!(query, "searching");

        let body: serde_json::Value = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_top_result(&body, query)
    }
}
