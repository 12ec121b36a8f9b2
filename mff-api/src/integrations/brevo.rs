use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::{error_body, IntegrationError, Mailer, OutgoingEmail};

const BREVO_SMTP_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Brevo transactional email API
pub struct BrevoMailer {
    client: reqwest::Client,
    api_key: String,
    sender_email: String,
    sender_name: String,
    endpoint: String,
}

impl BrevoMailer {
    pub fn new(
        api_key: impl Into<String>,
        sender_email: impl Into<String>,
        sender_name: impl Into<String>,
    ) -> Result<Self, IntegrationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            sender_email: sender_email.into(),
            sender_name: sender_name.into(),
            endpoint: BREVO_SMTP_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn payload(&self, email: &OutgoingEmail) -> serde_json::Value {
        let mut payload = json!({
            "sender": { "name": self.sender_name, "email": self.sender_email },
            "to": email.to.iter().map(|to| json!({ "email": to })).collect::<Vec<_>>(),
            "subject": email.subject,
            "htmlContent": email.html,
        });
        if let Some(reply_to) = &email.reply_to {
            payload["replyTo"] = match &reply_to.name {
                Some(name) => json!({ "email": reply_to.email, "name": name }),
                None => json!({ "email": reply_to.email }),
            };
        }
        payload
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), IntegrationError> {
        if email.to.is_empty() {
            return Err(IntegrationError::NotConfigured("notification recipients"));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&self.payload(email))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IntegrationError::Status {
                service: "brevo",
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }
        Ok(())
    }
}

/// Stand-in used when no Brevo key is configured
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), IntegrationError> {
        Err(IntegrationError::NotConfigured("brevo"))
    }
}
