//! Media-library access.
//!
//! The [`MediaLibrary`] trait is the seam between the collector and the media
//! server. [`JellyfinClient`] implements it over the Jellyfin HTTP API; tests
//! substitute in-memory fakes.

pub mod item;
pub mod jellyfin;

pub use item::{Episode, Movie, RawItem, RootFolder, SeriesSummary};
pub use jellyfin::JellyfinClient;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jellydigest_common::{FolderId, ItemId, ItemKind};

/// Read-only view of a media library.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// List the top-level folders of the library.
    async fn list_root_folders(&self) -> Result<Vec<RawItem>>;

    /// List items of `kind` below `folder`, created at or after `min_created`.
    ///
    /// Returns the items together with the total count reported by the server.
    async fn list_items(
        &self,
        folder: &FolderId,
        kind: ItemKind,
        min_created: DateTime<Utc>,
    ) -> Result<(Vec<RawItem>, u64)>;

    /// Fetch a single item below `folder`, or `None` when it is not there.
    async fn get_item(&self, folder: &FolderId, item: &ItemId) -> Result<Option<RawItem>>;
}
