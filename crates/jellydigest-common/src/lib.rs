//! Jellydigest-Common: Shared types, identifiers, and utilities.
//!
//! This crate provides common functionality used across jellydigest:
//!
//! - **Typed IDs**: String wrappers for library items, series, and folders
//! - **Core Types**: The media kind shared by the library and metadata clients
//! - **Timestamps**: Lenient ISO-8601 parsing for dates reported by Jellyfin
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use jellydigest_common::{parse_timestamp, Error, MediaKind, SeriesId};
//!
//! let id = SeriesId::from("a1b2");
//! assert_eq!(id.as_str(), "a1b2");
//! assert_eq!(MediaKind::Series.to_string(), "tv");
//!
//! assert!(parse_timestamp("2024-01-05T00:00:00").is_ok());
//! assert!(matches!(parse_timestamp("not-a-date"), Err(Error::Format(_))));
//! ```

pub mod error;
pub mod ids;
pub mod time;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use time::{format_timestamp, parse_timestamp};
pub use types::*;
