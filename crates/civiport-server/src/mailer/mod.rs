//! Outbound one-time-code delivery.
//!
//! Codes go out through a transactional mail HTTP API. Without an API key
//! the mailer runs disabled: the code is logged instead of sent, which keeps
//! local development and tests off the network.

use serde::Serialize;
use tracing::{debug, warn};

/// Errors from the mail delivery subsystem.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// HTTP request to the mail API failed.
    #[error("mail request error: {0}")]
    Request(String),

    /// Mail API returned a non-success status code.
    #[error("mail API error (status {status}): {body}")]
    Api {
        /// HTTP status code returned by the mail API.
        status: u16,
        /// Response body from the mail API.
        body: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    text_content: String,
}

/// Client for the transactional mail API.
#[derive(Debug)]
pub struct OtpMailer {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    sender: String,
}

impl OtpMailer {
    /// Create a mailer that posts to the given API endpoint.
    pub fn new(api_url: String, api_key: String, sender: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key: Some(api_key),
            sender,
        }
    }

    /// A mailer that logs codes instead of sending them.
    pub fn disabled() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: String::new(),
            api_key: None,
            sender: String::new(),
        }
    }

    /// Send a one-time code to `email`.
    pub async fn send_code(&self, email: &str, code: &str) -> Result<(), MailerError> {
        let Some(api_key) = &self.api_key else {
            warn!(email = %email, code = %code, "Mailer disabled; code logged, not dispatched");
            return Ok(());
        };

        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender.clone(),
            },
            to: vec![EmailAddress {
                email: email.to_string(),
            }],
            subject: "Your verification code".to_string(),
            text_content: format!("Your one-time code is {code}. It expires in 10 minutes."),
        };

        let resp = self
            .http
            .post(&self.api_url)
            .header("api-key", api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(email = %email, "One-time code dispatched");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_mailer_succeeds_without_network() {
        let mailer = OtpMailer::disabled();
        mailer
            .send_code("citizen@example.com", "123456")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unreachable_api_reports_request_error() {
        // No server listens here; the send must fail, not hang or panic
        let mailer = OtpMailer::new(
            "http://127.0.0.1:1/send".to_string(),
            "test-key".to_string(),
            "no-reply@example.com".to_string(),
        );

        let err = mailer.send_code("citizen@example.com", "123456").await;
        assert!(matches!(err, Err(MailerError::Request(_))));
    }
}
