use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub sendgrid_api_key: String,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub razorpay: RazorpayConfig,
    pub ai_service_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("SUPABASE_DB_URL"))
            .context("DATABASE_URL not set")?;
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "smartbill".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "smartbill-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };

        let mail = MailConfig {
            sendgrid_api_key: std::env::var("SENDGRID_API_KEY")
                .context("SENDGRID_API_KEY not set")?,
            from_email: std::env::var("SENDGRID_FROM_EMAIL")
                .context("SENDGRID_FROM_EMAIL not set")?,
            from_name: std::env::var("SENDGRID_FROM_NAME").unwrap_or_else(|_| "SmartBill".into()),
        };

        let razorpay = RazorpayConfig {
            key_id: std::env::var("RAZORPAY_KEY_ID").context("RAZORPAY_KEY_ID not set")?,
            key_secret: std::env::var("RAZORPAY_KEY_SECRET")
                .context("RAZORPAY_KEY_SECRET not set")?,
            api_base: std::env::var("RAZORPAY_API_BASE")
                .unwrap_or_else(|_| "https://api.razorpay.com/v1".into()),
        };

        let ai_service_url =
            std::env::var("AI_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8001".into());

        Ok(Self {
            database_url,
            max_connections,
            jwt,
            mail,
            razorpay,
            ai_service_url,
        })
    }
}
