//! Delivery of a rendered newsletter.
//!
//! A run ends in one of three ways, chosen from the `[dry_run]` section:
//!
//! - normal mode mails the newsletter to every recipient,
//! - preview mode writes it to disk,
//! - preview mode with `test_smtp_connection` writes it to disk and checks
//!   that the SMTP server accepts our credentials.

pub mod preview;
pub mod smtp;

pub use preview::{PreviewFiles, PreviewWriter};
pub use smtp::Mailer;

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::config::Config;
use crate::digest::Digest;

/// Transport that can deliver a newsletter to recipients.
#[async_trait]
pub trait Sender: Send + Sync {
    /// Send one copy of the message to each recipient.
    async fn send(&self, subject: &str, html: &str, recipients: &[String]) -> anyhow::Result<()>;

    /// Connect and authenticate without sending anything.
    async fn test_connection(&self) -> anyhow::Result<bool>;
}

/// A rendered newsletter with the data it was built from.
#[derive(Debug, Clone)]
pub struct Newsletter<'a> {
    pub subject: String,
    pub html: String,
    pub digest: &'a Digest,
    pub generated_at: DateTime<Utc>,
}

/// How a run's newsletter left the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent {
        recipients: usize,
    },
    Preview {
        html_path: PathBuf,
        data_path: Option<PathBuf>,
    },
    PreviewWithConnectionTest {
        html_path: PathBuf,
        data_path: Option<PathBuf>,
        smtp_ok: bool,
    },
}

impl DispatchOutcome {
    /// Only a real send advances the watermark.
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Deliver `newsletter` according to the configured mode.
///
/// `sender` may be `None` only in plain preview mode.
pub async fn dispatch(
    config: &Config,
    sender: Option<&dyn Sender>,
    newsletter: &Newsletter<'_>,
) -> anyhow::Result<DispatchOutcome> {
    if config.dry_run.enabled {
        let files = PreviewWriter::new(&config.dry_run)
            .write(newsletter, &config.recipients)
            .context("Failed to write newsletter preview")?;
        info!(path = %files.html_path.display(), "Newsletter preview written");

        if !config.dry_run.test_smtp_connection {
            return Ok(DispatchOutcome::Preview {
                html_path: files.html_path,
                data_path: files.data_path,
            });
        }

        let sender = sender.context("SMTP connection test requested but no mailer is configured")?;
        let smtp_ok = match sender.test_connection().await {
            Ok(ok) => ok,
            Err(e) => {
                error!(error = %e, "SMTP connection test failed");
                false
            }
        };
        info!(smtp_ok, "SMTP connection test finished");
        return Ok(DispatchOutcome::PreviewWithConnectionTest {
            html_path: files.html_path,
            data_path: files.data_path,
            smtp_ok,
        });
    }

    let sender = sender.context("No mailer is configured")?;
    sender
        .send(&newsletter.subject, &newsletter.html, &config.recipients)
        .await?;
    info!(recipients = config.recipients.len(), "Newsletter sent");
    Ok(DispatchOutcome::Sent {
        recipients: config.recipients.len(),
    })
}
