//! One newsletter run, and the cron scheduler that triggers it.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::collector::Collector;
use crate::config::Config;
use crate::delivery::{dispatch, DispatchOutcome, Mailer, Newsletter, Sender};
use crate::digest::Watermark;
use crate::library::{JellyfinClient, MediaLibrary};
use crate::metadata::providers::TmdbProvider;
use crate::metadata::{Enricher, MetadataProvider};
use crate::render;

/// How a call to [`NewsletterJob::run_once`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Another run was still active.
    Skipped,
    /// Nothing new since the observed period or the last newsletter.
    NothingNew,
    Dispatched(DispatchOutcome),
    /// The run failed; the error has been logged.
    Failed,
}

/// Everything a run needs, built once at startup.
pub struct NewsletterJob {
    config: Config,
    library: Arc<dyn MediaLibrary>,
    provider: Arc<dyn MetadataProvider>,
    sender: Option<Arc<dyn Sender>>,
    watermark: Watermark,
    running: Mutex<()>,
}

impl NewsletterJob {
    pub fn new(
        config: Config,
        library: Arc<dyn MediaLibrary>,
        provider: Arc<dyn MetadataProvider>,
        sender: Option<Arc<dyn Sender>>,
    ) -> Self {
        let watermark = Watermark::new(&config.watermark_path);
        Self {
            config,
            library,
            provider,
            sender,
            watermark,
            running: Mutex::new(()),
        }
    }

    /// Wire up the Jellyfin, TMDB and SMTP clients described by `config`.
    ///
    /// The mailer is only built when the run may talk to the SMTP server.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let library = Arc::new(JellyfinClient::new(&config.jellyfin));
        let provider = Arc::new(TmdbProvider::new(
            config.tmdb.api_key.clone(),
            config.email_template.language.tmdb_locale().to_string(),
        ));
        let sender: Option<Arc<dyn Sender>> =
            if !config.dry_run.enabled || config.dry_run.test_smtp_connection {
                Some(Arc::new(
                    Mailer::new(&config.email).context("Failed to configure SMTP")?,
                ))
            } else {
                None
            };
        Ok(Self::new(config, library, provider, sender))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run once unless a previous run is still active.
    ///
    /// Errors never escape; they are logged and reported as
    /// [`RunOutcome::Failed`].
    pub async fn run_once(&self) -> RunOutcome {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("Previous newsletter run is still active; skipping this trigger");
            return RunOutcome::Skipped;
        };

        let started = Utc::now();
        info!(preview = self.config.dry_run.enabled, "Newsletter run started");
        match self.execute(started).await {
            Ok(outcome) => {
                info!(outcome = ?outcome, "Newsletter run finished");
                outcome
            }
            Err(e) => {
                error!("Newsletter run failed: {e:#}");
                RunOutcome::Failed
            }
        }
    }

    async fn execute(&self, started: DateTime<Utc>) -> anyhow::Result<RunOutcome> {
        let cutoff = if self.config.jellyfin.ignore_item_added_before_last_newsletter {
            let cutoff = self.watermark.load();
            match cutoff {
                Some(ts) => info!(cutoff = %ts, "Ignoring items added before the last newsletter"),
                None => info!("No previous newsletter recorded; including every item"),
            }
            cutoff
        } else {
            None
        };

        let enricher = Enricher::new(self.provider.clone());
        let mut collector = Collector::new(&self.config.jellyfin, &*self.library, enricher);
        let digest = collector
            .collect(started, cutoff)
            .await
            .context("Failed to collect library items")?;

        if digest.is_empty() {
            warn!("No new movie or episode found; no newsletter this time");
            return Ok(RunOutcome::NothingNew);
        }

        let template = &self.config.email_template;
        let newsletter = Newsletter {
            subject: render::subject(template, started),
            html: render::render_newsletter(&digest, template, started),
            digest: &digest,
            generated_at: started,
        };

        let outcome = dispatch(&self.config, self.sender.as_deref(), &newsletter).await?;

        if outcome.is_sent() {
            if let Err(e) = self.watermark.store(started) {
                error!(
                    path = %self.watermark.path().display(),
                    error = %e,
                    "Newsletter was sent but the watermark could not be saved"
                );
            }
        }

        Ok(RunOutcome::Dispatched(outcome))
    }
}

/// Register the job with a cron scheduler and start it.
///
/// The configured expression has five fields; the scheduler expects a
/// leading seconds field, which is fixed at zero. The expression is read in
/// the host's local time zone, using the offset in effect at startup.
pub async fn start_scheduler(job: Arc<NewsletterJob>) -> anyhow::Result<JobScheduler> {
    let expression = job.config().scheduler.with_seconds();
    let scheduler = JobScheduler::new().await?;

    let cron_job = Job::new_async_tz(expression.as_str(), Local, move |_uuid, _l| {
        let job = job.clone();
        Box::pin(async move {
            job.run_once().await;
        })
    })
    .with_context(|| format!("Invalid cron expression: {expression}"))?;
    scheduler.add(cron_job).await?;

    scheduler.start().await?;
    info!(cron = %expression, "Newsletter scheduler started");
    Ok(scheduler)
}
