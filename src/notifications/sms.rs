use rocket::async_trait;
use serde::Deserialize;
use thiserror::Error;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, MessagingConfig};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Twilio rejected the message ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("messaging credentials are not configured")]
    NotConfigured,
}

/// Outbound text-message channel. Returns the provider's message id.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, body: &str, to: &str) -> Result<String, SmsError>;
}

pub type SharedSender = Arc<dyn SmsSender>;

/// Minimal client for the Twilio Messages REST endpoint.
pub struct TwilioClient {
    client: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

#[derive(Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

impl TwilioClient {
    pub fn new(config: &MessagingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: TWILIO_API_BASE.to_string(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(config: &MessagingConfig, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .no_proxy()
                .build()
                .expect("reqwest client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::new(config)
        }
    }

    pub async fn create_message(&self, body: &str, from: &str, to: &str) -> Result<String, SmsError> {
        let response = self
            .client
            .post(format!(
                "{}/Accounts/{}/Messages.json",
                self.base_url, self.account_sid
            ))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("Body", body), ("From", from), ("To", to)])
            .timeout(Duration::from_secs(15))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(ApiErrorBody {
                    code: Some(code),
                    message: Some(message),
                }) => format!("{} (code {})", message, code),
                Ok(ApiErrorBody {
                    message: Some(message),
                    ..
                }) => message,
                _ => text,
            };
            return Err(SmsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let resource: MessageResource = response.json().await?;
        Ok(resource.sid)
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send(&self, body: &str, to: &str) -> Result<String, SmsError> {
        self.create_message(body, &self.from_number, to).await
    }
}

/// Used when no Twilio credentials are configured; every send fails.
pub struct UnconfiguredSender;

#[async_trait]
impl SmsSender for UnconfiguredSender {
    async fn send(&self, _body: &str, _to: &str) -> Result<String, SmsError> {
        Err(SmsError::NotConfigured)
    }
}

pub fn sender_from_config(config: &Config) -> SharedSender {
    match &config.messaging {
        Some(messaging) => Arc::new(TwilioClient::new(messaging)),
        None => Arc::new(UnconfiguredSender),
    }
}
