//! Typed ID wrappers for library identifiers.
//!
//! Jellyfin hands out opaque string identifiers for every object. These
//! newtypes keep a series id from being passed where an item or folder id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a library item (movie, episode, or series).
    ItemId
);

string_id!(
    /// Identifier of a series, shared by all of its episodes.
    SeriesId
);

string_id!(
    /// Identifier of a top-level library folder.
    FolderId
);

impl From<SeriesId> for ItemId {
    fn from(id: SeriesId) -> Self {
        Self(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_as_str() {
        let id = SeriesId::from("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn test_serde_transparent() {
        let id = ItemId::from("42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"42\"");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_series_id_into_item_id() {
        let item: ItemId = SeriesId::from("s1").into();
        assert_eq!(item.as_str(), "s1");
    }
}
