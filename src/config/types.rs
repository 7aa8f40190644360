use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub jellyfin: JellyfinConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub email_template: TemplateConfig,

    #[serde(default)]
    pub recipients: Vec<String>,

    #[serde(default)]
    pub dry_run: DryRunConfig,

    /// File holding the timestamp of the last delivered newsletter
    #[serde(default = "default_watermark_path")]
    pub watermark_path: PathBuf,
}

fn default_watermark_path() -> PathBuf {
    PathBuf::from("./config/LAST_NEWSLETTER.txt")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JellyfinConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,

    /// Names of root folders scanned for movies
    #[serde(default)]
    pub watched_film_folders: Vec<String>,

    /// Names of root folders scanned for TV episodes
    #[serde(default)]
    pub watched_tv_folders: Vec<String>,

    /// Only items created within this many days are considered (default: 7)
    #[serde(default = "default_observed_period")]
    pub observed_period_days: u32,

    /// Skip items created before the last delivered newsletter
    #[serde(default)]
    pub ignore_item_added_before_last_newsletter: bool,
}

fn default_observed_period() -> u32 {
    7
}

impl Default for JellyfinConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            watched_film_folders: Vec::new(),
            watched_tv_folders: Vec::new(),
            observed_period_days: default_observed_period(),
            ignore_item_added_before_last_newsletter: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB v4 read access token (sent as a bearer token)
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Standard five-field crontab expression (default: every Friday at 08:00)
    ///
    /// Evaluated in the host's local time zone. When both day-of-month and
    /// day-of-week are restricted, a day must match both.
    #[serde(default = "default_cron")]
    pub cron: String,
}

fn default_cron() -> String {
    "0 8 * * 5".to_string()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cron: default_cron(),
        }
    }
}

impl SchedulerConfig {
    /// Six-field expression with a leading seconds column, as expected by
    /// the job scheduler.
    pub fn with_seconds(&self) -> String {
        format!("0 {}", self.cron.trim())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub smtp_server: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: String,

    #[serde(default)]
    pub smtp_password: String,

    #[serde(default)]
    pub smtp_sender_email: String,

    #[serde(default)]
    pub smtp_tls_type: TlsType,
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_sender_email: String::new(),
            smtp_tls_type: TlsType::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TlsType {
    /// Implicit TLS from the first byte (usually port 465)
    Tls,
    /// Plain connection upgraded with STARTTLS (usually port 587)
    #[default]
    Starttls,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub language: Language,

    /// Subject line; `{date}` is replaced with the run date
    #[serde(default = "default_subject")]
    pub subject: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    /// Public URL of the Jellyfin server, linked from the footer
    #[serde(default)]
    pub jellyfin_url: String,

    #[serde(default)]
    pub unsubscribe_email: String,

    #[serde(default)]
    pub jellyfin_owner_name: String,
}

fn default_subject() -> String {
    "Jellyfin newsletter {date}".to_string()
}

fn default_title() -> String {
    "Recently added".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            subject: default_subject(),
            title: default_title(),
            subtitle: String::new(),
            jellyfin_url: String::new(),
            unsubscribe_email: String::new(),
            jellyfin_owner_name: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    /// Locale tag passed to TMDB.
    pub fn tmdb_locale(self) -> &'static str {
        match self {
            Self::En => "en-US",
            Self::Fr => "fr-FR",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DryRunConfig {
    /// Write the rendered newsletter to disk instead of mailing it
    #[serde(default)]
    pub enabled: bool,

    /// Also log into the SMTP server to verify credentials
    #[serde(default)]
    pub test_smtp_connection: bool,

    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// File name pattern; supports `{date}`, `{timestamp}` and `{time}`
    #[serde(default = "default_output_filename")]
    pub output_filename: String,

    /// Prefix the HTML with a comment describing the run
    #[serde(default = "default_true")]
    pub include_metadata: bool,

    /// Write a JSON document with the run data next to the HTML
    #[serde(default = "default_true")]
    pub save_email_data: bool,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./previews")
}

fn default_output_filename() -> String {
    "newsletter_{date}_{time}.html".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DryRunConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            test_smtp_connection: false,
            output_directory: default_output_directory(),
            output_filename: default_output_filename(),
            include_metadata: default_true(),
            save_email_data: default_true(),
        }
    }
}
