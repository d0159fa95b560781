//! Collections: metadata, the persistent collection table and the shared
//! in-memory cache that answers existence and size questions per request.

mod cache;
mod in_memory;
mod table;

use serde::{Deserialize, Serialize};

use crate::vocab::DEFAULT_TAXII_MEDIA_TYPE;

pub use cache::CollectionCache;
pub use in_memory::InMemoryCollectionTable;
pub use table::CollectionTable;

/// A named, permissioned container of versioned objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
    pub hidden: bool,
    pub can_read: bool,
    pub can_write: bool,
    pub media_types: Vec<String>,
    /// Server-local join key between the collection and its version records.
    #[serde(default)]
    pub key: i64,
    #[serde(default)]
    pub size: u64,
}

impl Collection {
    /// An enabled, visible, readable and writable collection.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            enabled: true,
            hidden: false,
            can_read: true,
            can_write: true,
            media_types: vec![DEFAULT_TAXII_MEDIA_TYPE.to_string()],
            key: 0,
            size: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_permissions(mut self, can_read: bool, can_write: bool) -> Self {
        self.can_read = can_read;
        self.can_write = can_write;
        self
    }

    pub fn with_media_types<I, S>(mut self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media_types = media_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_key(mut self, key: i64) -> Self {
        self.key = key;
        self
    }
}

/// Cached view of a collection: identity, flags and current size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub id: String,
    pub key: i64,
    pub title: String,
    pub enabled: bool,
    pub hidden: bool,
    pub can_read: bool,
    pub can_write: bool,
    pub size: u64,
}

impl From<&Collection> for CacheEntry {
    fn from(collection: &Collection) -> Self {
        Self {
            id: collection.id.clone(),
            key: collection.key,
            title: collection.title.clone(),
            enabled: collection.enabled,
            hidden: collection.hidden,
            can_read: collection.can_read,
            can_write: collection.can_write,
            size: collection.size,
        }
    }
}
