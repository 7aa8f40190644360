//! TMDB (The Movie Database) metadata provider.
//!
//! Implements [`MetadataProvider`] by querying the TMDB v3 REST API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - 30-second request timeout.
//! - Title searches with several hits pick the most popular one.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use jellydigest_common::MediaKind;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::metadata::provider::{MetadataProvider, ProviderMetadata};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const REQUESTS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbEntry>,
}

/// Shape shared by detail and search responses for movies and TV shows.
#[derive(Debug, Deserialize)]
struct TmdbEntry {
    id: u64,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    popularity: f64,
}

impl From<TmdbEntry> for ProviderMetadata {
    fn from(entry: TmdbEntry) -> Self {
        let year = parse_year(entry.release_date.as_deref())
            .or_else(|| parse_year(entry.first_air_date.as_deref()));
        Self {
            id: Some(entry.id.to_string()),
            overview: entry.overview,
            poster_path: entry.poster_path.filter(|p| !p.is_empty()),
            year,
        }
    }
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB metadata provider.
///
/// Wraps the TMDB v3 REST API with built-in rate limiting and retry logic.
///
/// # Examples
///
/// ```no_run
/// use jellydigest::metadata::providers::TmdbProvider;
///
/// let provider = TmdbProvider::new("your-read-token".into(), "en-US".into());
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbProvider {
    /// Create a new TMDB provider with the given read token and language.
    ///
    /// The `language` parameter should be a locale tag such as `"en-US"`.
    pub fn new(api_key: String, language: String) -> Self {
        Self::with_base_url(api_key, language, TMDB_BASE_URL)
    }

    /// Create a provider that talks to `base_url` instead of the public API.
    pub fn with_base_url(api_key: String, language: String, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language,
            rate_limiter: RateLimiter::direct(Quota::per_second(REQUESTS_PER_SECOND)),
        }
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> anyhow::Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.api_key)
                .header("accept", "application/json")
                .query(&[("language", self.language.as_str())])
                .query(params)
                .send()
                .await
                .with_context(|| format!("TMDB request failed: {path}"))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let resp = resp
                .error_for_status()
                .with_context(|| format!("TMDB request returned error: {path}"))?;

            return Ok(resp);
        }
    }
}

/// Extract a four-digit year from a date string like `"2023-04-15"`.
fn parse_year(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse::<i32>().ok())
}

/// Pick the single result, or the most popular one when there are several.
fn best_match(title: &str, results: Vec<TmdbEntry>) -> Option<TmdbEntry> {
    if results.len() > 1 {
        warn!(
            title,
            count = results.len(),
            "Multiple TMDB results; selecting the most popular"
        );
    }
    let best = results
        .into_iter()
        .max_by(|a, b| {
            a.popularity
                .partial_cmp(&b.popularity)
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
    info!(title, tmdb_id = best.id, "Selected TMDB search result");
    Some(best)
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn lookup_by_id(
        &self,
        id: &str,
        kind: MediaKind,
    ) -> anyhow::Result<Option<ProviderMetadata>> {
        let path = format!("/{}/{}", kind.tmdb_segment(), id);
        debug!(path = %path, "TMDB lookup by id");

        let entry: TmdbEntry = self
            .get(&path, &[])
            .await?
            .json()
            .await
            .context("failed to parse TMDB detail response")?;

        Ok(Some(entry.into()))
    }

    async fn search_by_title(
        &self,
        title: &str,
        kind: MediaKind,
        year: Option<i32>,
    ) -> anyhow::Result<Option<ProviderMetadata>> {
        let mut params = vec![("query", title.to_string())];
        if let Some(year) = year.filter(|y| *y > 0) {
            let key = match kind {
                MediaKind::Movie => "year",
                MediaKind::Series => "first_air_date_year",
            };
            params.push((key, year.to_string()));
        }

        let path = format!("/search/{}", kind.tmdb_segment());
        debug!(path = %path, title, year = ?year, "TMDB search by title");

        let body: TmdbSearchResponse = self
            .get(&path, &params)
            .await?
            .json()
            .await
            .context("failed to parse TMDB search response")?;

        Ok(best_match(title, body.results).map(ProviderMetadata::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, popularity: f64) -> TmdbEntry {
        TmdbEntry {
            id,
            overview: None,
            poster_path: None,
            release_date: None,
            first_air_date: None,
            popularity,
        }
    }

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year(Some("2023-04-15")), Some(2023));
        assert_eq!(parse_year(Some("1999")), Some(1999));
        assert_eq!(parse_year(None), None);
        assert_eq!(parse_year(Some("")), None);
    }

    #[test]
    fn best_match_prefers_popularity() {
        let best = best_match("t", vec![entry(1, 3.0), entry(2, 9.5), entry(3, 1.0)]).unwrap();
        assert_eq!(best.id, 2);
    }

    #[test]
    fn best_match_single_and_empty() {
        assert_eq!(best_match("t", vec![entry(7, 0.0)]).unwrap().id, 7);
        assert!(best_match("t", Vec::new()).is_none());
    }

    #[test]
    fn entry_conversion_uses_tv_fields() {
        let tv = TmdbEntry {
            id: 1399,
            overview: Some("Seven noble families...".into()),
            poster_path: Some("/u3bZgnGQ9T01sWNhyveQz0wH0Hl.jpg".into()),
            release_date: None,
            first_air_date: Some("2011-04-17".into()),
            popularity: 0.0,
        };
        let meta = ProviderMetadata::from(tv);
        assert_eq!(meta.id.as_deref(), Some("1399"));
        assert_eq!(meta.year, Some(2011));
    }

    #[test]
    fn empty_poster_path_is_dropped() {
        let mut e = entry(1, 0.0);
        e.poster_path = Some(String::new());
        assert_eq!(ProviderMetadata::from(e).poster_path, None);
    }

    #[test]
    fn provider_name() {
        let provider = TmdbProvider::new("key".into(), "en-US".into());
        assert_eq!(provider.name(), "tmdb");
    }
}
