use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;

use crate::config::RazorpayConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    /// Minor currency units (paise for INR).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub payment_capture: u8,
}

impl OrderRequest {
    pub fn for_user(user_id: i64, amount: i64, currency: &str, unix_now: i64) -> Self {
        Self {
            amount,
            currency: currency.to_owned(),
            receipt: format!("user-{user_id}-{unix_now}"),
            payment_capture: 1,
        }
    }
}

/// Creates payment orders with an external gateway.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Returns the gateway's order object as-is.
    async fn create_order(&self, order: &OrderRequest) -> anyhow::Result<serde_json::Value>;
}

/// [`OrderGateway`] backed by the Razorpay Orders API.
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    api_base: String,
}

impl RazorpayClient {
    pub fn new(http: reqwest::Client, cfg: &RazorpayConfig) -> Self {
        Self {
            http,
            key_id: cfg.key_id.clone(),
            key_secret: cfg.key_secret.clone(),
            api_base: cfg.api_base.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl OrderGateway for RazorpayClient {
    async fn create_order(&self, order: &OrderRequest) -> anyhow::Result<serde_json::Value> {
        let res = self
            .http
            .post(format!("{}/orders", self.api_base))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(order)
            .send()
            .await
            .context("razorpay request")?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("razorpay returned {status}: {text}");
        }
        res.json().await.context("decode razorpay order")
    }
}
