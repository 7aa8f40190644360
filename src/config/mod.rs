mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./config/config.toml",
        "~/.config/jellydigest/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // No file found; defaults fail validation, so surface that here
    let config = Config::default();
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.jellyfin.url.is_empty() {
        anyhow::bail!("Jellyfin URL is not configured");
    }
    if config.jellyfin.api_key.is_empty() {
        anyhow::bail!("Jellyfin API key is not configured");
    }
    if config.jellyfin.watched_film_folders.is_empty()
        && config.jellyfin.watched_tv_folders.is_empty()
    {
        anyhow::bail!("No watched film or TV folders configured");
    }
    if config.jellyfin.observed_period_days == 0 {
        anyhow::bail!("observed_period_days must be at least 1");
    }

    if config.tmdb.api_key.is_empty() {
        anyhow::bail!("TMDB API key is not configured");
    }

    if config.scheduler.enabled {
        let fields = config.scheduler.cron.split_whitespace().count();
        if fields != 5 {
            anyhow::bail!(
                "Scheduler cron '{}' must have 5 fields, found {}",
                config.scheduler.cron,
                fields
            );
        }
        let expression = config.scheduler.with_seconds();
        tokio_cron_scheduler::Job::new(expression.as_str(), |_uuid, _l| {}).with_context(|| {
            format!(
                "Scheduler cron '{}' is not a valid crontab expression",
                config.scheduler.cron
            )
        })?;
    }

    // SMTP settings are only needed when something will talk to the server
    let needs_smtp = !config.dry_run.enabled || config.dry_run.test_smtp_connection;
    if needs_smtp {
        if config.email.smtp_server.is_empty() {
            anyhow::bail!("SMTP server is not configured");
        }
        if config.email.smtp_sender_email.is_empty() {
            anyhow::bail!("SMTP sender address is not configured");
        }
        if config.recipients.is_empty() {
            anyhow::bail!("No recipients configured");
        }
        for recipient in &config.recipients {
            if !recipient.contains('@') {
                anyhow::bail!("Invalid recipient email: {}", recipient);
            }
        }
    }

    Ok(())
}
