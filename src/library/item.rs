//! Library item records.
//!
//! [`RawItem`] mirrors the loosely-typed JSON object Jellyfin returns for any
//! item; every field is optional. The typed records ([`Episode`], [`Movie`],
//! [`SeriesSummary`]) are built from it with `TryFrom`, which is where required
//! fields are enforced.

use std::collections::HashMap;

use jellydigest_common::{Error, FolderId, ItemId, SeriesId};
use serde::Deserialize;

/// An item as reported by the media server, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawItem {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub item_type: Option<String>,
    pub date_created: Option<String>,
    pub production_year: Option<i32>,
    pub index_number: Option<i64>,
    pub series_id: Option<String>,
    pub series_name: Option<String>,
    pub season_name: Option<String>,
    pub provider_ids: Option<HashMap<String, String>>,
}

impl RawItem {
    /// TMDB identifier attached by the media server, if any.
    pub fn tmdb_id(&self) -> Option<&str> {
        self.provider_ids
            .as_ref()
            .and_then(|ids| ids.get("Tmdb"))
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Short label for log lines.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("<unnamed>")
    }
}

fn required<'a>(
    value: &'a Option<String>,
    kind: &'static str,
    field: &'static str,
) -> Result<&'a str, Error> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::missing(kind, field))
}

/// A root folder of the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFolder {
    pub id: FolderId,
    pub name: String,
}

impl TryFrom<&RawItem> for RootFolder {
    type Error = Error;

    fn try_from(raw: &RawItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: required(&raw.id, "folder", "Id")?.into(),
            name: required(&raw.name, "folder", "Name")?.to_string(),
        })
    }
}

/// One added episode, the unit folded into a series aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub series_id: SeriesId,
    pub series_name: String,
    pub season_name: String,
    /// Episode number within its season, when the server knows it.
    pub index: Option<i64>,
    /// Raw creation date as reported; parsed lazily by the aggregator.
    pub date_created: Option<String>,
}

impl TryFrom<&RawItem> for Episode {
    type Error = Error;

    fn try_from(raw: &RawItem) -> Result<Self, Self::Error> {
        Ok(Self {
            series_id: required(&raw.series_id, "episode", "SeriesId")?.into(),
            series_name: required(&raw.series_name, "episode", "SeriesName")?.to_string(),
            season_name: required(&raw.season_name, "episode", "SeasonName")?.to_string(),
            index: raw.index_number,
            date_created: raw.date_created.clone(),
        })
    }
}

/// One added movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: ItemId,
    pub name: String,
    pub production_year: Option<i32>,
    pub date_created: String,
    pub tmdb_id: Option<String>,
}

impl TryFrom<&RawItem> for Movie {
    type Error = Error;

    fn try_from(raw: &RawItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: required(&raw.id, "movie", "Id")?.into(),
            name: required(&raw.name, "movie", "Name")?.to_string(),
            production_year: raw.production_year,
            date_created: required(&raw.date_created, "movie", "DateCreated")?.to_string(),
            tmdb_id: raw.tmdb_id().map(str::to_string),
        })
    }
}

/// Series-level record used to look up descriptive metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSummary {
    pub id: SeriesId,
    pub name: String,
    pub production_year: Option<i32>,
    pub tmdb_id: Option<String>,
}

impl TryFrom<&RawItem> for SeriesSummary {
    type Error = Error;

    fn try_from(raw: &RawItem) -> Result<Self, Self::Error> {
        if raw.item_type.as_deref() != Some("Series") {
            return Err(Error::invalid_input(format!(
                "item {} is a {}, not a Series",
                raw.label(),
                raw.item_type.as_deref().unwrap_or("<untyped>")
            )));
        }
        Ok(Self {
            id: required(&raw.id, "series", "Id")?.into(),
            name: required(&raw.name, "series", "Name")?.to_string(),
            production_year: raw.production_year,
            tmdb_id: raw.tmdb_id().map(str::to_string),
        })
    }
}
