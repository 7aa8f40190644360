//! Folding of episode events into per-series aggregates.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use jellydigest_common::{parse_timestamp, SeriesId};
use serde::Serialize;
use tracing::{debug, warn};

use super::{DEFAULT_DESCRIPTION, PLACEHOLDER_POSTER_URL};
use crate::library::{Episode, RawItem};

/// Everything known about one series during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesAggregate {
    pub name: String,
    /// Season names in first-seen order, without duplicates.
    pub seasons: Vec<String>,
    /// One entry per folded episode; neither sorted nor deduplicated.
    pub episode_indices: Vec<Option<i64>>,
    /// Most recent creation date among the folded episodes.
    pub created_on: Option<DateTime<Utc>>,
    pub description: String,
    pub year: Option<i32>,
    pub poster_url: String,
}

impl SeriesAggregate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seasons: Vec::new(),
            episode_indices: Vec::new(),
            created_on: None,
            description: DEFAULT_DESCRIPTION.to_string(),
            year: None,
            poster_url: PLACEHOLDER_POSTER_URL.to_string(),
        }
    }

    /// Keep the later of the current and the given creation date.
    ///
    /// An unparsable date leaves the current value in place.
    fn observe_created(&mut self, raw: Option<&str>) {
        let Some(raw) = raw else {
            return;
        };
        match parse_timestamp(raw) {
            Ok(ts) => {
                if self.created_on.map_or(true, |current| ts > current) {
                    self.created_on = Some(ts);
                }
            }
            Err(e) => {
                debug!(series = %self.name, error = %e, "Ignoring unparsable episode date");
            }
        }
    }
}

/// Builds [`SeriesAggregate`]s keyed by series id from a stream of episodes.
#[derive(Debug, Default)]
pub struct EpisodeAggregator {
    series: BTreeMap<SeriesId, SeriesAggregate>,
}

impl EpisodeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a raw library item and fold it when it is a usable episode.
    ///
    /// Items missing a series id, series name, or season name are logged and
    /// leave the aggregates untouched.
    pub fn fold_raw(&mut self, item: &RawItem) {
        match Episode::try_from(item) {
            Ok(episode) => self.fold(episode),
            Err(e) => warn!(item = %item.label(), error = %e, "Skipping episode"),
        }
    }

    /// Fold one validated episode into its series aggregate.
    pub fn fold(&mut self, episode: Episode) {
        let aggregate = self
            .series
            .entry(episode.series_id)
            .or_insert_with(|| SeriesAggregate::new(episode.series_name));

        if !aggregate.seasons.contains(&episode.season_name) {
            aggregate.seasons.push(episode.season_name);
        }
        aggregate.episode_indices.push(episode.index);
        aggregate.observe_created(episode.date_created.as_deref());
    }

    pub fn get(&self, id: &SeriesId) -> Option<&SeriesAggregate> {
        self.series.get(id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<SeriesId, SeriesAggregate> {
        self.series
    }
}
