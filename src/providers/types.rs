//! Provider record

use serde::Serialize;

/// A search provider and its pagination state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provider {
    /// Stable id, also used in the search endpoint path
    pub id: String,
    /// Display name (unique within the registry)
    pub name: String,
    /// Display order, lower sorts first
    pub order: i64,
    /// Whether more pages are believed to exist
    pub is_paginated: bool,
    /// Cursor for the next page, only ever positive
    pub cursor: Option<u64>,
    /// Page size, inferred from the first page
    pub page_size: Option<u64>,
}

impl Provider {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
            ..Default::default()
        }
    }

    /// Whether a fetch-more marker should be shown for this provider
    pub fn has_more(&self) -> bool {
        self.is_paginated && self.cursor.is_some()
    }

    /// Block ordering key
    pub fn sort_key(&self) -> (i64, &str) {
        (self.order, self.name.as_str())
    }

    /// File providers can be opened from a local sync folder
    pub fn is_file_provider(&self) -> bool {
        self.id.contains("file")
    }
}
