use serde_json::json;

use crate::domain::repository::Mailer;
use crate::domain::types::OutgoingMail;
use crate::error::AssistantError;

/// Mailer backed by an HTTP relay: `POST {relay}/send` with a JSON envelope.
#[derive(Clone)]
pub struct HttpMailer {
    pub client: reqwest::Client,
    pub relay_url: String,
    pub from: String,
}

impl Mailer for HttpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AssistantError> {
        let url = format!("{}/send", self.relay_url.trim_end_matches('/'));
        let envelope = json!({
            "from": self.from,
            "to": mail.to,
            "subject": mail.subject,
            "text": mail.text,
            "html": mail.html,
        });
        let response = self
            .client
            .post(&url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "mail relay unreachable");
                AssistantError::MailDelivery
            })?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "mail relay rejected message");
            return Err(AssistantError::MailDelivery);
        }
        Ok(())
    }
}

/// Fallback when no relay is configured: logs the mail instead of sending,
/// so local setups work without SMTP credentials.
#[derive(Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AssistantError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            "mail relay not configured, logging instead of sending"
        );
        Ok(())
    }
}

/// Runtime-selected mailer. The port trait is not object safe (async fn in
/// trait), so the choice is an enum rather than a `dyn` box.
#[derive(Clone)]
pub enum MailTransport {
    Http(HttpMailer),
    Log(LogMailer),
}

impl Mailer for MailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AssistantError> {
        match self {
            Self::Http(mailer) => mailer.send(mail).await,
            Self::Log(mailer) => mailer.send(mail).await,
        }
    }
}
