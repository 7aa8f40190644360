//! Metadata lookups for enriching aggregates with catalog data.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and shared data types.
//! - [`providers`] -- Concrete provider implementations (TMDB).
//! - [`enrichment`] -- Id-first, title-fallback resolution with a per-run cache.

pub mod enrichment;
pub mod provider;
pub mod providers;

pub use enrichment::{EnrichmentRequest, EnrichmentResult, Enricher};
pub use provider::{MetadataProvider, ProviderMetadata};
