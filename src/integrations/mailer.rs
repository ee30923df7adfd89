use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use crate::config::MailConfig;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Delivers one-time codes to users.
#[async_trait]
pub trait OtpMailer: Send + Sync {
    async fn send_otp(&self, to_email: &str, code: &str) -> anyhow::Result<()>;
}

/// [`OtpMailer`] backed by the SendGrid v3 mail API.
#[derive(Clone)]
pub struct SendGridMailer {
    http: reqwest::Client,
    api_key: String,
    from_email: String,
    from_name: String,
}

impl SendGridMailer {
    pub fn new(http: reqwest::Client, cfg: &MailConfig) -> Self {
        Self {
            http,
            api_key: cfg.sendgrid_api_key.clone(),
            from_email: cfg.from_email.clone(),
            from_name: cfg.from_name.clone(),
        }
    }
}

pub(crate) fn otp_message(code: &str) -> String {
    format!("Your OTP code is: {code}\nIt is valid for 10 minutes.")
}

#[async_trait]
impl OtpMailer for SendGridMailer {
    async fn send_otp(&self, to_email: &str, code: &str) -> anyhow::Result<()> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": to_email, "name": "User" }] }],
            "from": { "email": self.from_email, "name": self.from_name },
            "subject": "Your SmartBill OTP Verification Code",
            "content": [{ "type": "text/plain", "value": otp_message(code) }],
        });
        self.http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("sendgrid request")?
            .error_for_status()
            .context("sendgrid rejected message")?;
        Ok(())
    }
}
