//! Writing newsletters to disk instead of mailing them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::json;

use super::Newsletter;
use crate::config::DryRunConfig;

/// Files produced for one preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFiles {
    pub html_path: PathBuf,
    /// JSON run data, when `save_email_data` is on.
    pub data_path: Option<PathBuf>,
}

pub struct PreviewWriter<'a> {
    config: &'a DryRunConfig,
}

impl<'a> PreviewWriter<'a> {
    pub fn new(config: &'a DryRunConfig) -> Self {
        Self { config }
    }

    /// Directory previews are written to, with `~` expanded.
    pub fn output_directory(&self) -> PathBuf {
        let raw = self.config.output_directory.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }

    /// File name for a newsletter generated at `newsletter.generated_at`.
    ///
    /// `{date}` becomes `YYYY-MM-DD`, `{time}` becomes `HH-MM-SS` and
    /// `{timestamp}` becomes Unix seconds. A `.html` extension is added
    /// when missing.
    pub fn file_name(&self, newsletter: &Newsletter<'_>) -> String {
        let at = newsletter.generated_at;
        let mut name = self
            .config
            .output_filename
            .replace("{date}", &at.format("%Y-%m-%d").to_string())
            .replace("{time}", &at.format("%H-%M-%S").to_string())
            .replace("{timestamp}", &at.timestamp().to_string());
        if !name.ends_with(".html") {
            name.push_str(".html");
        }
        name
    }

    pub fn write(
        &self,
        newsletter: &Newsletter<'_>,
        recipients: &[String],
    ) -> anyhow::Result<PreviewFiles> {
        let dir = self.output_directory();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create preview directory {}", dir.display()))?;

        let html_path = dir.join(self.file_name(newsletter));
        let mut body = String::new();
        if self.config.include_metadata {
            body.push_str(&metadata_comment(newsletter, recipients));
        }
        body.push_str(&newsletter.html);
        fs::write(&html_path, body)
            .with_context(|| format!("Failed to write {}", html_path.display()))?;

        let data_path = if self.config.save_email_data {
            let path = html_path.with_extension("json");
            write_data(&path, newsletter, recipients)?;
            Some(path)
        } else {
            None
        };

        Ok(PreviewFiles {
            html_path,
            data_path,
        })
    }
}

fn metadata_comment(newsletter: &Newsletter<'_>, recipients: &[String]) -> String {
    // "--" would end the comment early.
    let subject = newsletter.subject.replace("--", "- -");
    format!(
        "<!--\n  Newsletter preview\n  Generated: {}\n  Subject: {}\n  Recipients: {}\n  Movies: {}\n  Series: {}\n-->\n",
        newsletter.generated_at.to_rfc3339(),
        subject,
        recipients.len(),
        newsletter.digest.movies.len(),
        newsletter.digest.series.len(),
    )
}

fn write_data(
    path: &Path,
    newsletter: &Newsletter<'_>,
    recipients: &[String],
) -> anyhow::Result<()> {
    let data = json!({
        "generated_at": newsletter.generated_at,
        "subject": newsletter.subject,
        "recipients": recipients,
        "total_movies_scanned": newsletter.digest.total_movies_scanned,
        "total_episodes_scanned": newsletter.digest.total_episodes_scanned,
        "movies": newsletter.digest.movies,
        "series": newsletter.digest.series,
    });
    let text = serde_json::to_string_pretty(&data).context("Failed to serialize newsletter data")?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
