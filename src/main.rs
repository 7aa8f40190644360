mod cli;

use jellydigest::config::{self, Config};
use jellydigest::job::{self, NewsletterJob, RunOutcome};
use jellydigest::library::JellyfinClient;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

fn load(config_path: Option<&Path>, preview: bool) -> Result<Config> {
    let mut config = config::load_config_or_default(config_path)?;
    if preview {
        config.dry_run.enabled = true;
    }
    Ok(config)
}

async fn start(config: Config) -> Result<()> {
    let scheduled = config.scheduler.enabled;
    let job = Arc::new(NewsletterJob::from_config(config)?);

    if !scheduled {
        tracing::info!("Scheduler disabled; running once");
        run_once(&job).await;
        return Ok(());
    }

    let mut scheduler = job::start_scheduler(job).await?;
    tracing::info!("Waiting for scheduled runs; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down...");
    scheduler.shutdown().await?;
    Ok(())
}

async fn run_once(job: &NewsletterJob) {
    match job.run_once().await {
        RunOutcome::Dispatched(outcome) => tracing::info!(outcome = ?outcome, "Done"),
        RunOutcome::NothingNew => tracing::info!("Nothing to send"),
        RunOutcome::Skipped | RunOutcome::Failed => {}
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "jellydigest=debug,jellydigest_common=debug".to_string()
        } else {
            "jellydigest=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => {
            let config = load(cli.config.as_deref(), cli.preview)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start(config))
        }
        Commands::Run => {
            let config = load(cli.config.as_deref(), cli.preview)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let job = NewsletterJob::from_config(config)?;
                run_once(&job).await;
                Ok(())
            })
        }
        Commands::Validate { file, online } => {
            let path = file.or(cli.config);
            let config = validate_config(path.as_deref())?;
            if online {
                let rt = tokio::runtime::Runtime::new()?;
                rt.block_on(check_jellyfin(&config))?;
            }
            Ok(())
        }
        Commands::Version => {
            println!("jellydigest {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => println!("Validating config: {:?}", p),
        None => println!("No config file specified, searching default locations"),
    }
    let config = config::load_config_or_default(path)?;
    println!("✓ Configuration is valid");
    println!("  Jellyfin: {}", config.jellyfin.url);
    println!(
        "  Watched folders: {} film, {} TV",
        config.jellyfin.watched_film_folders.len(),
        config.jellyfin.watched_tv_folders.len()
    );
    println!("  Observed period: {} days", config.jellyfin.observed_period_days);
    if config.scheduler.enabled {
        println!("  Scheduler: {}", config.scheduler.cron);
    } else {
        println!("  Scheduler: disabled");
    }
    println!("  Recipients: {}", config.recipients.len());
    println!("  Preview mode: {}", config.dry_run.enabled);
    Ok(config)
}

async fn check_jellyfin(config: &Config) -> Result<()> {
    let client = JellyfinClient::new(&config.jellyfin);
    if client.test_connection().await? {
        println!("✓ Jellyfin server is reachable");
        Ok(())
    } else {
        anyhow::bail!("Jellyfin server at {} rejected the request", config.jellyfin.url)
    }
}
