//! Pagination tracking
//!
//! Providers report `isPaginated` and a cursor with every page, but some
//! keep claiming more pages after the last one. The page size is therefore
//! inferred from the first page (whose cursor equals the number of items
//! it returned) and used to correct the claim on later pages.

use super::types::Provider;
use super::wire::SearchPage;

impl Provider {
    /// Update pagination state from a freshly received page.
    ///
    /// Must run before the page is merged: the merger decides from the
    /// corrected state whether the fetch-more marker stays.
    pub fn track_page(&mut self, page: &SearchPage) {
        if page.entries.is_empty() {
            self.is_paginated = false;
            return;
        }

        self.is_paginated = page.is_paginated;
        self.cursor = page.cursor;

        if self.page_size.is_none() {
            self.page_size = page.cursor;
        }

        if let Some(page_size) = self.page_size {
            if (page.entries.len() as u64) < page_size {
                self.is_paginated = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::RawEntry;

    fn page(entries: usize, is_paginated: bool, cursor: Option<u64>) -> SearchPage {
        SearchPage {
            name: "Files".to_string(),
            is_paginated,
            cursor,
            entries: vec![RawEntry::default(); entries],
        }
    }

    #[test]
    fn test_first_page_infers_page_size() {
        let mut provider = Provider::new("files", "Files", 1);
        provider.track_page(&page(2, true, Some(2)));

        assert_eq!(provider.page_size, Some(2));
        assert_eq!(provider.cursor, Some(2));
        assert!(provider.is_paginated);
        assert!(provider.has_more());
    }

    #[test]
    fn test_short_page_forces_exhaustion() {
        let mut provider = Provider::new("files", "Files", 1);
        provider.track_page(&page(10, true, Some(10)));
        provider.track_page(&page(3, true, Some(13)));

        assert_eq!(provider.page_size, Some(10));
        assert_eq!(provider.cursor, Some(13));
        assert!(!provider.is_paginated);
        assert!(!provider.has_more());
    }

    #[test]
    fn test_full_page_keeps_paginating() {
        let mut provider = Provider::new("files", "Files", 1);
        provider.track_page(&page(10, true, Some(10)));
        provider.track_page(&page(10, true, Some(20)));

        assert!(provider.is_paginated);
        assert_eq!(provider.cursor, Some(20));
    }

    #[test]
    fn test_empty_page_stops_pagination() {
        let mut provider = Provider::new("files", "Files", 1);
        provider.track_page(&page(10, true, Some(10)));
        provider.track_page(&page(0, true, Some(20)));

        assert!(!provider.is_paginated);
        assert_eq!(provider.cursor, Some(10));
    }

    #[test]
    fn test_unpaginated_provider_has_no_page_size() {
        let mut provider = Provider::new("talk", "Talk", 2);
        provider.track_page(&page(1, false, None));

        assert_eq!(provider.page_size, None);
        assert!(!provider.has_more());
    }
}
