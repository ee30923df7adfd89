//! In-memory stand-ins for the external collaborators.
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Categorizer, OrderGateway, OrderRequest, OtpMailer};

/// Records every code it is asked to send; can be told to fail.
#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl OtpMailer for FakeMailer {
    async fn send_otp(&self, to_email: &str, code: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("mail service down");
        }
        self.sent
            .lock()
            .unwrap()
            .push((to_email.to_owned(), code.to_owned()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeGateway {
    pub fail: bool,
}

#[async_trait]
impl OrderGateway for FakeGateway {
    async fn create_order(&self, order: &OrderRequest) -> anyhow::Result<Value> {
        if self.fail {
            anyhow::bail!("gateway unreachable");
        }
        Ok(json!({
            "id": "order_fake_1",
            "entity": "order",
            "amount": order.amount,
            "currency": order.currency,
            "receipt": order.receipt,
            "status": "created",
        }))
    }
}

/// Answers with a fixed category, or fails when `category` is `None`.
pub struct FakeCategorizer {
    pub category: Option<String>,
}

#[async_trait]
impl Categorizer for FakeCategorizer {
    async fn categorize(&self, _description: &str) -> anyhow::Result<Value> {
        match &self.category {
            Some(c) => Ok(json!({ "category": c })),
            None => anyhow::bail!("connection refused"),
        }
    }
}
