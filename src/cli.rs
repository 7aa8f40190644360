use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jellydigest")]
#[command(author, version, about = "Newsletter of recently added Jellyfin movies and episodes")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write the newsletter to the preview directory instead of mailing it
    #[arg(long, global = true)]
    pub preview: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run on the configured schedule until interrupted (once when the scheduler is disabled)
    Start,

    /// Build and deliver a single newsletter now
    Run,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,

        /// Also check that the Jellyfin server answers with the configured key
        #[arg(long)]
        online: bool,
    },

    /// Display version information
    Version,
}
