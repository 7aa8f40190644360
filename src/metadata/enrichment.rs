//! Enrichment of aggregates with catalog metadata.
//!
//! The [`Enricher`] resolves overview text, poster URL, and production year for
//! a series or movie through a fallback chain:
//!
//! 1. Lookup by provider id, when the library supplied one.
//! 2. Search by title and year, when there was no id or the lookup failed or
//!    came back empty.
//! 3. The unresolved defaults, when both attempts failed.
//!
//! Provider errors are logged and never escape [`Enricher::enrich`]. Results are
//! cached per `(kind, item id)` for the lifetime of the enricher, so an item
//! appearing under several library folders costs one resolution.

use std::collections::HashMap;
use std::sync::Arc;

use jellydigest_common::MediaKind;
use tracing::{error, info, warn};

use super::provider::{MetadataProvider, ProviderMetadata};
use crate::digest::{MovieEntry, SeriesAggregate, DEFAULT_DESCRIPTION, PLACEHOLDER_POSTER_URL};

/// Prefix turning a TMDB poster path into a 500px-wide image URL.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Overview used when the catalog entry has none.
pub const NO_OVERVIEW: &str = "No overview available.";

/// What enrichment learned about one item.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    pub overview: String,
    pub poster_url: String,
    pub year: Option<i32>,
    /// Whether any provider attempt produced metadata.
    pub resolved: bool,
}

impl EnrichmentResult {
    fn unresolved(year: Option<i32>) -> Self {
        Self {
            overview: DEFAULT_DESCRIPTION.to_string(),
            poster_url: PLACEHOLDER_POSTER_URL.to_string(),
            year,
            resolved: false,
        }
    }

    fn from_metadata(meta: ProviderMetadata, year: Option<i32>) -> Self {
        let overview = match meta.overview {
            Some(text) if !text.trim().is_empty() => text,
            _ => NO_OVERVIEW.to_string(),
        };
        Self {
            overview,
            poster_url: poster_url(meta.poster_path.as_deref()),
            year: year.or(meta.year),
            resolved: true,
        }
    }

    /// Copy the result onto a series aggregate.
    ///
    /// Unresolved results only fill the year; description and poster keep
    /// whatever the aggregate already holds.
    pub fn apply_to_series(&self, series: &mut SeriesAggregate) {
        if self.resolved {
            series.description = self.overview.clone();
            series.poster_url = self.poster_url.clone();
        }
        if self.year.is_some() {
            series.year = self.year;
        }
    }

    /// Build a movie entry from a library movie and this result.
    pub fn to_movie_entry(&self, movie: &crate::library::Movie) -> MovieEntry {
        MovieEntry {
            name: movie.name.clone(),
            year: self.year,
            created_on: jellydigest_common::parse_timestamp(&movie.date_created).ok(),
            description: self.overview.clone(),
            poster_url: self.poster_url.clone(),
            tmdb_id: movie.tmdb_id.clone(),
        }
    }
}

/// Full poster URL for a catalog poster path, or the placeholder.
pub fn poster_url(path: Option<&str>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{POSTER_BASE_URL}{path}"),
        None => PLACEHOLDER_POSTER_URL.to_string(),
    }
}

/// The item to enrich.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentRequest<'a> {
    /// Library identifier, used as the cache key.
    pub key: &'a str,
    /// Catalog identifier supplied by the library, if any.
    pub candidate_id: Option<&'a str>,
    pub title: &'a str,
    pub year: Option<i32>,
    pub kind: MediaKind,
}

/// Resolves catalog metadata through the id-then-title fallback chain.
pub struct Enricher {
    provider: Arc<dyn MetadataProvider>,
    cache: HashMap<(MediaKind, String), EnrichmentResult>,
}

impl Enricher {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            cache: HashMap::new(),
        }
    }

    /// Number of distinct items resolved so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Resolve metadata for one item, consulting the provider at most once
    /// per `(kind, key)`.
    pub async fn enrich(&mut self, request: EnrichmentRequest<'_>) -> EnrichmentResult {
        let cache_key = (request.kind, request.key.to_string());
        if let Some(hit) = self.cache.get(&cache_key) {
            return hit.clone();
        }

        let result = match self.resolve(&request).await {
            Some(meta) => EnrichmentResult::from_metadata(meta, request.year),
            None => {
                warn!(
                    title = request.title,
                    kind = %request.kind,
                    "Item not found in the metadata catalog; using defaults"
                );
                EnrichmentResult::unresolved(request.year)
            }
        };

        self.cache.insert(cache_key, result.clone());
        result
    }

    async fn resolve(&self, request: &EnrichmentRequest<'_>) -> Option<ProviderMetadata> {
        if let Some(id) = request.candidate_id {
            match self.provider.lookup_by_id(id, request.kind).await {
                Ok(Some(meta)) => return Some(meta),
                Ok(None) => {
                    info!(
                        title = request.title,
                        id,
                        "Lookup by id found nothing; searching by title"
                    );
                }
                Err(e) => {
                    error!(
                        title = request.title,
                        id,
                        provider = self.provider.name(),
                        error = %e,
                        "Lookup by id failed; searching by title"
                    );
                }
            }
        } else {
            info!(title = request.title, "No catalog id; searching by title");
        }

        match self
            .provider
            .search_by_title(request.title, request.kind, request.year)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                error!(
                    title = request.title,
                    provider = self.provider.name(),
                    error = %e,
                    "Search by title failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    enum Outcome {
        Found,
        Empty,
        Fail,
    }

    /// Stub provider counting calls, for testing the fallback chain.
    struct StubProvider {
        by_id: Outcome,
        by_title: Outcome,
        id_calls: AtomicUsize,
        title_calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(by_id: Outcome, by_title: Outcome) -> Arc<Self> {
            Arc::new(Self {
                by_id,
                by_title,
                id_calls: AtomicUsize::new(0),
                title_calls: AtomicUsize::new(0),
            })
        }

        fn answer(outcome: Outcome, overview: &str) -> anyhow::Result<Option<ProviderMetadata>> {
            match outcome {
                Outcome::Found => Ok(Some(ProviderMetadata {
                    id: Some("1".into()),
                    overview: Some(overview.to_string()),
                    poster_path: Some("/poster.jpg".into()),
                    year: Some(2001),
                })),
                Outcome::Empty => Ok(None),
                Outcome::Fail => Err(anyhow::anyhow!("connection refused")),
            }
        }
    }

    #[async_trait]
    impl MetadataProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn lookup_by_id(
            &self,
            _id: &str,
            _kind: MediaKind,
        ) -> anyhow::Result<Option<ProviderMetadata>> {
            self.id_calls.fetch_add(1, Ordering::SeqCst);
            Self::answer(self.by_id, "from id")
        }

        async fn search_by_title(
            &self,
            _title: &str,
            _kind: MediaKind,
            _year: Option<i32>,
        ) -> anyhow::Result<Option<ProviderMetadata>> {
            self.title_calls.fetch_add(1, Ordering::SeqCst);
            Self::answer(self.by_title, "from title")
        }
    }

    fn request<'a>(key: &'a str, candidate_id: Option<&'a str>) -> EnrichmentRequest<'a> {
        EnrichmentRequest {
            key,
            candidate_id,
            title: "Show",
            year: Some(2019),
            kind: MediaKind::Series,
        }
    }

    #[tokio::test]
    async fn id_lookup_skips_title_search() {
        let stub = StubProvider::new(Outcome::Found, Outcome::Found);
        let mut enricher = Enricher::new(stub.clone());

        let result = enricher.enrich(request("s1", Some("42"))).await;

        assert!(result.resolved);
        assert_eq!(result.overview, "from id");
        assert_eq!(result.poster_url, "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(result.year, Some(2019));
        assert_eq!(stub.id_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.title_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_id_lookup_falls_back_to_title_once() {
        let stub = StubProvider::new(Outcome::Fail, Outcome::Found);
        let mut enricher = Enricher::new(stub.clone());

        let result = enricher.enrich(request("s1", Some("42"))).await;

        assert_eq!(result.overview, "from title");
        assert_eq!(stub.title_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_id_lookup_falls_back_to_title() {
        let stub = StubProvider::new(Outcome::Empty, Outcome::Found);
        let mut enricher = Enricher::new(stub.clone());

        let result = enricher.enrich(request("s1", Some("42"))).await;

        assert_eq!(result.overview, "from title");
        assert_eq!(stub.title_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_id_goes_straight_to_title() {
        let stub = StubProvider::new(Outcome::Found, Outcome::Found);
        let mut enricher = Enricher::new(stub.clone());

        let result = enricher.enrich(request("s1", None)).await;

        assert_eq!(result.overview, "from title");
        assert_eq!(stub.id_calls.load(Ordering::SeqCst), 0);
        assert_eq!(stub.title_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn both_failing_yields_defaults() {
        let stub = StubProvider::new(Outcome::Fail, Outcome::Fail);
        let mut enricher = Enricher::new(stub.clone());

        let result = enricher.enrich(request("s1", Some("42"))).await;

        assert!(!result.resolved);
        assert_eq!(result.overview, DEFAULT_DESCRIPTION);
        assert_eq!(result.poster_url, PLACEHOLDER_POSTER_URL);
        assert_eq!(result.year, Some(2019));
    }

    #[tokio::test]
    async fn results_are_cached_per_item() {
        let stub = StubProvider::new(Outcome::Found, Outcome::Found);
        let mut enricher = Enricher::new(stub.clone());

        enricher.enrich(request("s1", Some("42"))).await;
        enricher.enrich(request("s1", Some("42"))).await;
        enricher.enrich(request("s2", Some("43"))).await;

        assert_eq!(stub.id_calls.load(Ordering::SeqCst), 2);
        assert_eq!(enricher.cached(), 2);
    }

    #[test]
    fn missing_overview_is_substituted() {
        let meta = ProviderMetadata {
            poster_path: None,
            overview: None,
            ..ProviderMetadata::default()
        };
        let result = EnrichmentResult::from_metadata(meta, None);
        assert_eq!(result.overview, NO_OVERVIEW);
        assert_eq!(result.poster_url, PLACEHOLDER_POSTER_URL);
    }

    #[test]
    fn provider_year_used_when_library_has_none() {
        let meta = ProviderMetadata {
            year: Some(1995),
            ..ProviderMetadata::default()
        };
        assert_eq!(EnrichmentResult::from_metadata(meta, None).year, Some(1995));
    }

    #[test]
    fn unresolved_result_keeps_existing_fields() {
        let mut series = SeriesAggregate::new("Show");
        series.description = "Known already".into();
        series.year = Some(2010);

        EnrichmentResult::unresolved(None).apply_to_series(&mut series);

        assert_eq!(series.description, "Known already");
        assert_eq!(series.year, Some(2010));
    }
}
