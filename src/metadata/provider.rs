//! Trait definition and types for metadata providers.
//!
//! This module defines the [`MetadataProvider`] trait that catalog backends
//! implement, along with the record they return.

use async_trait::async_trait;
use jellydigest_common::MediaKind;

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Descriptive metadata for a movie or TV series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderMetadata {
    /// Provider-specific identifier (e.g. TMDB numeric ID).
    pub id: Option<String>,
    /// Synopsis / overview text.
    pub overview: Option<String>,
    /// Path fragment of the poster image, relative to the image CDN.
    pub poster_path: Option<String>,
    /// Year the media was first released or premiered.
    pub year: Option<i32>,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that all metadata providers must implement.
///
/// Both lookups return `Ok(None)` when the catalog has no matching entry and
/// `Err` when the request itself failed.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Fetch metadata for the entry identified by `id`.
    async fn lookup_by_id(
        &self,
        id: &str,
        kind: MediaKind,
    ) -> anyhow::Result<Option<ProviderMetadata>>;

    /// Search by title, optionally constrained by `year`, and return the best
    /// match.
    async fn search_by_title(
        &self,
        title: &str,
        kind: MediaKind,
        year: Option<i32>,
    ) -> anyhow::Result<Option<ProviderMetadata>>;
}
