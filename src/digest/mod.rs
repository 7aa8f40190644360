//! Aggregation of newly added library items into a newsletter digest.
//!
//! # Module layout
//!
//! - [`aggregate`] -- Folding episodes into per-series records.
//! - [`ranges`] -- Compression of episode numbers into range tokens.
//! - [`watermark`] -- Timestamp of the last delivered newsletter.

pub mod aggregate;
pub mod ranges;
pub mod watermark;

pub use aggregate::{EpisodeAggregator, SeriesAggregate};
pub use ranges::{summarize, RangeValue};
pub use watermark::{is_before_cutoff, Watermark};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use jellydigest_common::{ItemId, SeriesId};
use serde::Serialize;

/// Description shown until enrichment finds something better.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

/// Poster shown when the catalog has no artwork for an item.
pub const PLACEHOLDER_POSTER_URL: &str =
    "https://redthread.uoregon.edu/files/original/affd16fd5264cab9197da4cd1a996f820e601ee4.png";

/// A newly added movie, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieEntry {
    pub name: String,
    pub year: Option<i32>,
    pub created_on: Option<DateTime<Utc>>,
    pub description: String,
    pub poster_url: String,
    pub tmdb_id: Option<String>,
}

/// Everything collected during one run, handed to rendering and delivery.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Digest {
    pub movies: BTreeMap<ItemId, MovieEntry>,
    pub series: BTreeMap<SeriesId, SeriesAggregate>,
    /// Movies reported by the library within the observed period.
    pub total_movies_scanned: u64,
    /// Episodes reported by the library within the observed period.
    pub total_episodes_scanned: u64,
}

impl Digest {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.series.is_empty()
    }
}
