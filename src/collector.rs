//! One pass over the watched library folders.
//!
//! The [`Collector`] lists recently created movies and episodes from each
//! watched folder, drops items older than the watermark cutoff, folds episodes
//! into series aggregates, and enriches every movie and series once.

use chrono::{DateTime, Duration, Utc};
use jellydigest_common::{parse_timestamp, FolderId, ItemId, ItemKind, MediaKind, SeriesId};
use tracing::{debug, info, warn};

use crate::config::JellyfinConfig;
use crate::digest::{is_before_cutoff, Digest, EpisodeAggregator, SeriesAggregate};
use crate::library::{MediaLibrary, Movie, RawItem, RootFolder, SeriesSummary};
use crate::metadata::{EnrichmentRequest, Enricher};

/// Root folders sorted by what they are watched for.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WatchedFolders {
    pub film: Vec<FolderId>,
    pub tv: Vec<FolderId>,
}

pub struct Collector<'a> {
    config: &'a JellyfinConfig,
    library: &'a dyn MediaLibrary,
    enricher: Enricher,
}

impl<'a> Collector<'a> {
    pub fn new(
        config: &'a JellyfinConfig,
        library: &'a dyn MediaLibrary,
        enricher: Enricher,
    ) -> Self {
        Self {
            config,
            library,
            enricher,
        }
    }

    /// Collect everything added within the observed period before `now`.
    ///
    /// Items created strictly before `cutoff` are skipped. Library listing
    /// failures abort the pass; per-item problems are logged and skipped.
    pub async fn collect(
        &mut self,
        now: DateTime<Utc>,
        cutoff: Option<DateTime<Utc>>,
    ) -> anyhow::Result<Digest> {
        let folders = self.watched_folders().await?;
        let min_created = now - Duration::days(i64::from(self.config.observed_period_days));

        let mut digest = Digest::default();
        self.collect_movies(&folders.film, min_created, cutoff, &mut digest)
            .await?;

        let mut aggregator = EpisodeAggregator::new();
        for folder in &folders.tv {
            let (items, total) = self
                .library
                .list_items(folder, ItemKind::Episode, min_created)
                .await?;
            digest.total_episodes_scanned += total;

            for item in &items {
                if skip_before_cutoff(item, cutoff) {
                    continue;
                }
                if item.item_type.as_deref().is_some_and(|t| t != "Episode") {
                    debug!(item = %item.label(), "Not an episode; skipping");
                    continue;
                }
                aggregator.fold_raw(item);
            }
        }

        let mut series = aggregator.into_inner();
        for (id, aggregate) in series.iter_mut() {
            self.enrich_series(id, aggregate, &folders.tv).await;
        }
        digest.series = series;

        info!(
            movies = digest.movies.len(),
            series = digest.series.len(),
            movies_scanned = digest.total_movies_scanned,
            episodes_scanned = digest.total_episodes_scanned,
            "Collected new library items"
        );
        Ok(digest)
    }

    /// Map configured folder names to root folder ids.
    pub async fn watched_folders(&self) -> anyhow::Result<WatchedFolders> {
        let mut watched = WatchedFolders::default();

        for raw in self.library.list_root_folders().await? {
            let folder = match RootFolder::try_from(&raw) {
                Ok(folder) => folder,
                Err(e) => {
                    warn!(item = %raw.label(), error = %e, "Skipping root folder");
                    continue;
                }
            };

            if self.config.watched_film_folders.contains(&folder.name) {
                info!(folder = %folder.name, "Folder is watched for films");
                watched.film.push(folder.id);
            } else if self.config.watched_tv_folders.contains(&folder.name) {
                info!(folder = %folder.name, "Folder is watched for TV series");
                watched.tv.push(folder.id);
            } else {
                warn!(
                    folder = %folder.name,
                    "Folder is not watched; add it to watched_film_folders or \
                     watched_tv_folders to include it"
                );
            }
        }

        Ok(watched)
    }

    async fn collect_movies(
        &mut self,
        folders: &[FolderId],
        min_created: DateTime<Utc>,
        cutoff: Option<DateTime<Utc>>,
        digest: &mut Digest,
    ) -> anyhow::Result<()> {
        for folder in folders {
            let (items, total) = self
                .library
                .list_items(folder, ItemKind::Movie, min_created)
                .await?;
            digest.total_movies_scanned += total;

            for item in &items {
                let movie = match Movie::try_from(item) {
                    Ok(movie) => movie,
                    Err(e) => {
                        warn!(item = %item.label(), error = %e, "Skipping movie");
                        continue;
                    }
                };
                if skip_before_cutoff(item, cutoff) || digest.movies.contains_key(&movie.id) {
                    continue;
                }

                let result = self
                    .enricher
                    .enrich(EnrichmentRequest {
                        key: movie.id.as_str(),
                        candidate_id: movie.tmdb_id.as_deref(),
                        title: &movie.name,
                        year: movie.production_year.filter(|y| *y > 0),
                        kind: MediaKind::Movie,
                    })
                    .await;
                digest
                    .movies
                    .insert(movie.id.clone(), result.to_movie_entry(&movie));
            }
        }
        Ok(())
    }

    async fn enrich_series(
        &mut self,
        id: &SeriesId,
        aggregate: &mut SeriesAggregate,
        folders: &[FolderId],
    ) {
        let summary = self.find_series(id, folders).await;
        if summary.is_none() {
            warn!(
                series = %aggregate.name,
                id = %id,
                "Series not found in any watched folder; searching by name"
            );
        }

        let title = summary
            .as_ref()
            .map_or(aggregate.name.clone(), |s| s.name.clone());
        let result = self
            .enricher
            .enrich(EnrichmentRequest {
                key: id.as_str(),
                candidate_id: summary.as_ref().and_then(|s| s.tmdb_id.as_deref()),
                title: &title,
                year: summary.as_ref().and_then(|s| s.production_year),
                kind: MediaKind::Series,
            })
            .await;
        result.apply_to_series(aggregate);
    }

    /// Fetch the series record from the first folder that has it.
    async fn find_series(&self, id: &SeriesId, folders: &[FolderId]) -> Option<SeriesSummary> {
        let item_id = ItemId::from(id.clone());
        for folder in folders {
            match self.library.get_item(folder, &item_id).await {
                Ok(Some(raw)) => match SeriesSummary::try_from(&raw) {
                    Ok(summary) => return Some(summary),
                    Err(e) => warn!(id = %id, error = %e, "Skipping series record"),
                },
                Ok(None) => {}
                Err(e) => warn!(id = %id, folder = %folder, error = %e, "Failed to fetch series"),
            }
        }
        None
    }
}

fn skip_before_cutoff(item: &RawItem, cutoff: Option<DateTime<Utc>>) -> bool {
    let created = item
        .date_created
        .as_deref()
        .and_then(|d| parse_timestamp(d).ok());
    let skip = is_before_cutoff(created, cutoff);
    if skip {
        info!(
            item = %item.label(),
            "Item was added before the last newsletter; ignoring"
        );
    }
    skip
}
