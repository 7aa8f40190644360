//! Shared fixtures for integration tests.
//!
//! Builds Jellyfin-shaped JSON bodies and a [`Config`] pointing at mock
//! servers, with every file the run writes kept under a temporary directory.

#![allow(dead_code)]

use std::path::Path;

use jellydigest::config::Config;
use serde_json::{json, Value};

pub const JELLYFIN_KEY: &str = "jf-key";
pub const TMDB_TOKEN: &str = "tmdb-token";

/// `{"Items": [...], "TotalRecordCount": n}`
pub fn items(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({ "Items": items, "TotalRecordCount": total })
}

pub fn folder(id: &str, name: &str) -> Value {
    json!({ "Id": id, "Name": name, "Type": "CollectionFolder" })
}

pub fn movie(id: &str, name: &str, created: &str, tmdb: Option<&str>) -> Value {
    let mut movie = json!({
        "Id": id,
        "Name": name,
        "Type": "Movie",
        "DateCreated": created,
        "ProductionYear": 1995,
    });
    if let Some(tmdb) = tmdb {
        movie["ProviderIds"] = json!({ "Tmdb": tmdb });
    }
    movie
}

pub fn episode(series_id: &str, series: &str, season: &str, index: i64, created: &str) -> Value {
    json!({
        "Id": format!("{series_id}-e{index}"),
        "Name": format!("Episode {index}"),
        "Type": "Episode",
        "SeriesId": series_id,
        "SeriesName": series,
        "SeasonName": season,
        "IndexNumber": index,
        "DateCreated": created,
    })
}

pub fn series(id: &str, name: &str, year: i32, tmdb: &str) -> Value {
    json!({
        "Id": id,
        "Name": name,
        "Type": "Series",
        "ProductionYear": year,
        "ProviderIds": { "Tmdb": tmdb },
    })
}

/// Config for a run against `jellyfin_url`, writing into `dir`.
pub fn config(jellyfin_url: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.jellyfin.url = jellyfin_url.to_string();
    config.jellyfin.api_key = JELLYFIN_KEY.to_string();
    config.jellyfin.watched_film_folders = vec!["Movies".into()];
    config.jellyfin.watched_tv_folders = vec!["Shows".into()];
    config.tmdb.api_key = TMDB_TOKEN.to_string();
    config.recipients = vec!["alice@example.com".into()];
    config.watermark_path = dir.join("LAST_NEWSLETTER.txt");
    config.dry_run.output_directory = dir.join("previews");
    config
}
