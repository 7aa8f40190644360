//! Core type definitions shared by the library and metadata clients.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of media that is looked up in the metadata catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A single movie.
    Movie,
    /// A TV series.
    Series,
}

impl MediaKind {
    /// Path segment used by the TMDB API for this kind.
    pub fn tmdb_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tmdb_segment())
    }
}

/// Kind of library item queried from the media server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// A movie file.
    Movie,
    /// A single episode within a season.
    Episode,
    /// A TV series.
    Series,
}

impl ItemKind {
    /// Name of the kind as used in Jellyfin's `IncludeItemTypes` filter.
    pub fn as_jellyfin(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Episode => "Episode",
            Self::Series => "Series",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_jellyfin())
    }
}
