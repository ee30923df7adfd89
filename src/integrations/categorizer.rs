use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

/// Suggests an expense category for a free-text description.
#[async_trait]
pub trait Categorizer: Send + Sync {
    /// Returns the service's JSON answer, e.g. `{"category": "Food"}`.
    async fn categorize(&self, description: &str) -> anyhow::Result<serde_json::Value>;
}

/// [`Categorizer`] that calls the categorization microservice over HTTP.
#[derive(Clone)]
pub struct HttpCategorizer {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCategorizer {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl Categorizer for HttpCategorizer {
    async fn categorize(&self, description: &str) -> anyhow::Result<serde_json::Value> {
        self.http
            .post(format!("{}/categorize", self.base_url))
            .json(&json!({ "description": description }))
            .send()
            .await
            .context("categorizer request")?
            .error_for_status()
            .context("categorizer returned error status")?
            .json()
            .await
            .context("decode categorizer response")
    }
}
