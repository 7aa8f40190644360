use crate::config::JellyfinConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use jellydigest_common::{FolderId, ItemId, ItemKind};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{MediaLibrary, RawItem};

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Fields requested on every item listing.
const ITEM_FIELDS: &str = "ProviderIds,DateCreated,ProductionYear";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<RawItem>,
    #[serde(default)]
    total_record_count: Option<u64>,
}

pub struct JellyfinClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl JellyfinClient {
    pub fn new(config: &JellyfinConfig) -> Self {
        let client = Client::builder()
            .timeout(CONNECTION_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    async fn get_items(&self, path: &str, query: &[(&str, String)]) -> Result<ItemsResponse> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("X-Emby-Token", &self.api_key)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to GET {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Jellyfin request {} failed ({}): {}", path, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse Jellyfin response for {}", path))
    }

    /// Test connectivity to Jellyfin
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/System/Info", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("X-Emby-Token", &self.api_key)
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl MediaLibrary for JellyfinClient {
    async fn list_root_folders(&self) -> Result<Vec<RawItem>> {
        let body = self.get_items("/Library/MediaFolders", &[]).await?;
        Ok(body.items)
    }

    async fn list_items(
        &self,
        folder: &FolderId,
        kind: ItemKind,
        min_created: DateTime<Utc>,
    ) -> Result<(Vec<RawItem>, u64)> {
        let query = [
            ("ParentId", folder.to_string()),
            ("IncludeItemTypes", kind.as_jellyfin().to_string()),
            ("Recursive", "true".to_string()),
            (
                "MinDateCreated",
                min_created.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("Fields", ITEM_FIELDS.to_string()),
        ];

        let body = self.get_items("/Items", &query).await?;
        let total = body.total_record_count.unwrap_or(body.items.len() as u64);
        tracing::debug!(
            folder = %folder,
            kind = %kind,
            returned = body.items.len(),
            total,
            "Listed Jellyfin items"
        );
        Ok((body.items, total))
    }

    async fn get_item(&self, folder: &FolderId, item: &ItemId) -> Result<Option<RawItem>> {
        let query = [
            ("ParentId", folder.to_string()),
            ("Ids", item.to_string()),
            ("Recursive", "true".to_string()),
            ("Fields", ITEM_FIELDS.to_string()),
        ];

        let body = self.get_items("/Items", &query).await?;
        Ok(body.items.into_iter().next())
    }
}
