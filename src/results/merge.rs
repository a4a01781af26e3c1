//! Merging provider pages into the shared list
//!
//! The list is partitioned into one contiguous block per provider:
//! a category separator, the provider's results, and at most one trailing
//! fetch-more trigger. Blocks are ordered by `(order, provider name)` and
//! every merge keeps that ordering intact.

use super::icons;
use super::list::{insert_rows, remove_row, ListEvent, ResultList};
use super::types::{ResultType, SearchResult};
use crate::account::Account;
use crate::providers::{Provider, RawEntry};
use std::sync::Arc;
use tracing::debug;

/// Converts raw provider entries and splices them into the list
#[derive(Debug, Clone)]
pub struct ResultMerger {
    account: Arc<Account>,
}

impl ResultMerger {
    pub fn new(account: Arc<Account>) -> Self {
        Self { account }
    }

    /// Build a result row from a raw entry
    pub fn convert(&self, provider: &Provider, entry: &RawEntry) -> SearchResult {
        let icon = icons::resolve_icon(&entry.icon, &self.account);
        let thumbnail = icons::resolve_thumbnail(&entry.thumbnail_url, &self.account);

        SearchResult {
            provider_id: provider.id.clone(),
            provider_name: provider.name.clone(),
            order: provider.order,
            result_type: ResultType::Default,
            title: entry.title.clone(),
            subline: entry.subline.clone(),
            resource_url: entry.resource_url.clone(),
            icons: icons::join_images(&thumbnail, &icon),
            is_rounded: entry.rounded,
        }
    }

    /// Merge one page from `provider` into the list.
    ///
    /// `provider` must already carry the pagination state tracked from this
    /// page. Returns the list events in the order they were applied.
    pub fn merge(
        &self,
        list: &ResultList,
        provider: &Provider,
        entries: &[RawEntry],
        append: bool,
    ) -> Vec<ListEvent> {
        let results: Vec<SearchResult> = entries
            .iter()
            .map(|entry| self.convert(provider, entry))
            .collect();

        list.update(|rows| {
            if append {
                append_to_provider(rows, provider, results)
            } else {
                insert_block(rows, provider, results).into_iter().collect()
            }
        })
    }
}

/// Insert a first page as a new block at its ordered position
pub(crate) fn insert_block(
    rows: &mut Vec<SearchResult>,
    provider: &Provider,
    results: Vec<SearchResult>,
) -> Option<ListEvent> {
    if results.is_empty() {
        return None;
    }

    let mut block = Vec::with_capacity(results.len() + 2);
    block.push(SearchResult::category_separator(provider));
    block.extend(results);
    if provider.has_more() {
        block.push(SearchResult::fetch_more_trigger(provider));
    }

    let key = provider.sort_key();
    let start = rows
        .iter()
        .position(|row| row.sort_key() > key)
        .unwrap_or(rows.len());

    debug!(
        "Inserting block for {} ({} rows) at {}",
        provider.id,
        block.len(),
        start
    );
    insert_rows(rows, start, block)
}

/// Append a continuation page after the provider's last result and retract
/// its fetch-more trigger once the provider is exhausted
pub(crate) fn append_to_provider(
    rows: &mut Vec<SearchResult>,
    provider: &Provider,
    results: Vec<SearchResult>,
) -> Vec<ListEvent> {
    let mut events = Vec::new();

    if !results.is_empty() {
        let last = rows
            .iter()
            .rposition(|row| row.belongs_to(&provider.id) && row.is(ResultType::Default));

        match last {
            Some(index) => events.extend(insert_rows(rows, index + 1, results)),
            None => debug!("No block for {} to append to", provider.id),
        }
    }

    if !provider.has_more() {
        let trigger = rows
            .iter()
            .rposition(|row| row.belongs_to(&provider.id) && row.is(ResultType::FetchMoreTrigger));

        if let Some(index) = trigger {
            events.extend(remove_row(rows, index));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn merger() -> ResultMerger {
        let account = Account::new(Url::parse("https://cloud.example.com").unwrap(), "alice");
        ResultMerger::new(Arc::new(account))
    }

    fn provider(id: &str, name: &str, order: i64, cursor: Option<u64>) -> Provider {
        let mut provider = Provider::new(id, name, order);
        provider.is_paginated = cursor.is_some();
        provider.cursor = cursor;
        provider
    }

    fn entries(titles: &[&str]) -> Vec<RawEntry> {
        titles
            .iter()
            .map(|title| RawEntry {
                title: title.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn layout(list: &ResultList) -> Vec<String> {
        list.snapshot()
            .iter()
            .map(|row| match row.result_type {
                ResultType::CategorySeparator => format!("[{}]", row.provider_id),
                ResultType::FetchMoreTrigger => format!("more:{}", row.provider_id),
                ResultType::Default => row.title.clone(),
            })
            .collect()
    }

    #[test]
    fn test_convert_resolves_images() {
        let entry = RawEntry {
            icon: "icon-folder".to_string(),
            thumbnail_url: "/core/preview?fileId=7".to_string(),
            title: "Reports".to_string(),
            rounded: true,
            ..Default::default()
        };

        let result = merger().convert(&provider("files", "Files", 1, None), &entry);
        assert_eq!(
            result.icons,
            "https://cloud.example.com/core/preview?fileId=7;:/client/theme/black/folder.svg"
        );
        assert_eq!(result.order, 1);
        assert_eq!(result.provider_name, "Files");
        assert!(result.is_rounded);
    }

    #[test]
    fn test_first_page_into_empty_list() {
        let list = ResultList::new();
        let files = provider("files", "Files", 1, Some(2));

        let events = merger().merge(&list, &files, &entries(&["a", "b"]), false);

        assert_eq!(events, vec![ListEvent::Inserted { start: 0, count: 4 }]);
        assert_eq!(layout(&list), vec!["[files]", "a", "b", "more:files"]);
    }

    #[test]
    fn test_blocks_are_ordered_by_order_then_name() {
        let list = ResultList::new();
        let merger = merger();

        merger.merge(&list, &provider("mail", "Mail", 20, None), &entries(&["m1"]), false);
        merger.merge(&list, &provider("files", "Files", 5, None), &entries(&["f1"]), false);
        let events = merger.merge(&list, &provider("deck", "Deck", 20, None), &entries(&["d1"]), false);
        merger.merge(&list, &provider("talk", "Talk", 30, None), &entries(&["t1"]), false);

        assert_eq!(events, vec![ListEvent::Inserted { start: 2, count: 2 }]);
        assert_eq!(
            layout(&list),
            vec!["[files]", "f1", "[deck]", "d1", "[mail]", "m1", "[talk]", "t1"]
        );
    }

    #[test]
    fn test_empty_first_page_creates_no_block() {
        let list = ResultList::new();
        let events = merger().merge(&list, &provider("files", "Files", 1, None), &[], false);

        assert!(events.is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn test_append_splices_after_last_result_and_retracts_trigger() {
        let list = ResultList::new();
        let merger = merger();
        let mut files = provider("files", "Files", 1, Some(2));
        merger.merge(&list, &files, &entries(&["a", "b"]), false);
        merger.merge(&list, &provider("talk", "Talk", 2, None), &entries(&["t"]), false);

        files.is_paginated = false;
        let events = merger.merge(&list, &files, &entries(&["c"]), true);

        assert_eq!(
            events,
            vec![
                ListEvent::Inserted { start: 3, count: 1 },
                ListEvent::Removed { start: 4, count: 1 },
            ]
        );
        assert_eq!(layout(&list), vec!["[files]", "a", "b", "c", "[talk]", "t"]);
    }

    #[test]
    fn test_append_keeps_trigger_while_paginated() {
        let list = ResultList::new();
        let merger = merger();
        let mut files = provider("files", "Files", 1, Some(2));
        merger.merge(&list, &files, &entries(&["a", "b"]), false);

        files.cursor = Some(4);
        let events = merger.merge(&list, &files, &entries(&["c", "d"]), true);

        assert_eq!(events, vec![ListEvent::Inserted { start: 3, count: 2 }]);
        assert_eq!(layout(&list), vec!["[files]", "a", "b", "c", "d", "more:files"]);
    }

    #[test]
    fn test_empty_continuation_only_retracts_trigger() {
        let list = ResultList::new();
        let merger = merger();
        let mut files = provider("files", "Files", 1, Some(2));
        merger.merge(&list, &files, &entries(&["a", "b"]), false);

        files.is_paginated = false;
        let events = merger.merge(&list, &files, &[], true);
        assert_eq!(events, vec![ListEvent::Removed { start: 3, count: 1 }]);

        let events = merger.merge(&list, &files, &[], true);
        assert!(events.is_empty());
        assert_eq!(layout(&list), vec!["[files]", "a", "b"]);
    }
}
