//! SMTP delivery through `lettre`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use super::Sender;
use crate::config::{EmailConfig, TlsType};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends newsletters over an authenticated SMTP relay.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let builder = match config.smtp_tls_type {
            TlsType::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server),
            TlsType::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            }
        }
        .with_context(|| format!("Invalid SMTP server: {}", config.smtp_server))?;

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(SMTP_TIMEOUT));
        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        let from = config
            .smtp_sender_email
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid sender address: {}", config.smtp_sender_email))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Sender for Mailer {
    async fn send(&self, subject: &str, html: &str, recipients: &[String]) -> anyhow::Result<()> {
        for recipient in recipients {
            let to = recipient
                .parse::<Mailbox>()
                .with_context(|| format!("Invalid recipient address: {recipient}"))?;
            let message = Message::builder()
                .from(self.from.clone())
                .to(to)
                .subject(subject)
                .header(ContentType::TEXT_HTML)
                .body(html.to_string())
                .context("Failed to build e-mail")?;

            self.transport
                .send(message)
                .await
                .with_context(|| format!("Failed to send newsletter to {recipient}"))?;
            debug!(recipient = %recipient, "Newsletter delivered");
        }
        info!(count = recipients.len(), "All newsletters delivered");
        Ok(())
    }

    async fn test_connection(&self) -> anyhow::Result<bool> {
        self.transport
            .test_connection()
            .await
            .context("SMTP connection test failed")
    }
}
