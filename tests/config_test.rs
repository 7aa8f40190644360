//! Loading configuration files from disk.

use std::fs;

use jellydigest::config::{load_config, load_config_or_default, Language, TlsType};

#[test]
fn full_config_file_round_trips_every_section() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        r#"
recipients = ["alice@example.com", "bob@example.com"]
watermark_path = "/var/lib/jellydigest/LAST_NEWSLETTER.txt"

[jellyfin]
url = "http://jellyfin:8096"
api_key = "jf-key"
watched_film_folders = ["Movies", "Kids"]
watched_tv_folders = ["Shows"]
observed_period_days = 14
ignore_item_added_before_last_newsletter = true

[tmdb]
api_key = "tmdb-token"

[scheduler]
enabled = true
cron = "30 7 * * 1"

[email]
smtp_server = "smtp.example.com"
smtp_port = 465
smtp_username = "news"
smtp_password = "secret"
smtp_sender_email = "news@example.com"
smtp_tls_type = "TLS"

[email_template]
language = "fr"
subject = "Nouveautés du {date}"
title = "Nouveautés"
jellyfin_url = "https://jf.example.com"
unsubscribe_email = "admin@example.com"
jellyfin_owner_name = "Sam"

[dry_run]
enabled = false
output_filename = "preview_{timestamp}.html"
include_metadata = false
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();

    assert_eq!(config.recipients.len(), 2);
    assert_eq!(config.jellyfin.watched_film_folders, ["Movies", "Kids"]);
    assert_eq!(config.jellyfin.observed_period_days, 14);
    assert!(config.jellyfin.ignore_item_added_before_last_newsletter);
    assert_eq!(config.scheduler.with_seconds(), "0 30 7 * * 1");
    assert_eq!(config.email.smtp_port, 465);
    assert_eq!(config.email.smtp_tls_type, TlsType::Tls);
    assert_eq!(config.email_template.language, Language::Fr);
    assert_eq!(config.email_template.language.tmdb_locale(), "fr-FR");
    assert!(!config.dry_run.include_metadata);
    assert!(config.dry_run.save_email_data);
    assert_eq!(
        config.watermark_path.to_str(),
        Some("/var/lib/jellydigest/LAST_NEWSLETTER.txt")
    );
}

#[test]
fn explicit_path_that_does_not_exist_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("nope.toml");
    assert!(load_config_or_default(Some(&missing)).is_err());
}

#[test]
fn unknown_tls_type_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        r#"
[email]
smtp_tls_type = "SSL"
"#,
    )
    .unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}
