//! Unified search state machine
//!
//! [`UnifiedSearchModel`] owns the provider registry, the shared result
//! list and the request bookkeeping. It performs no I/O: every input
//! returns the [`Effect`]s a driver has to carry out, and request outcomes
//! come back in as [`Completion`]s.
//!
//! Each issued request is recorded in the outstanding set under its
//! provider id together with a fresh token. A completion is only applied
//! while its token is still the recorded one, so responses for a cleared
//! or superseded search are dropped without touching the list.

use super::error::SearchError;
use super::models::{Completion, Dispatch, Effect, RequestTarget, RequestToken, SearchEvent};
use crate::account::Account;
use crate::activation::{self, Activation};
use crate::config::SearchSettings;
use crate::network::{ApiRequest, ApiResponse, RequestError};
use crate::providers::{
    decode_providers, search_path, ProviderRegistry, SearchPage, PROVIDERS_PATH,
};
use crate::results::{ResultList, ResultMerger, ResultType};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

/// Search session state for one account
pub struct UnifiedSearchModel {
    merger: ResultMerger,
    registry: ProviderRegistry,
    results: ResultList,
    events: broadcast::Sender<SearchEvent>,
    debounce: Duration,
    denylist: Vec<String>,
    search_term: String,
    error_string: String,
    /// Provider id -> token of its outstanding request
    outstanding: HashMap<String, RequestToken>,
    discovery: Option<RequestToken>,
    fetch_more_in_progress: Option<String>,
    debounce_generation: u64,
    next_token: RequestToken,
}

impl UnifiedSearchModel {
    /// Create a model searching on `account`
    pub fn new(account: Arc<Account>, settings: &SearchSettings) -> Self {
        let (events, _) = broadcast::channel(settings.event_capacity.max(1));

        Self {
            merger: ResultMerger::new(account),
            registry: ProviderRegistry::new(),
            results: ResultList::new(),
            events,
            debounce: Duration::from_millis(settings.debounce_ms),
            denylist: settings.denylisted_providers.clone(),
            search_term: String::new(),
            error_string: String::new(),
            outstanding: HashMap::new(),
            discovery: None,
            fetch_more_in_progress: None,
            debounce_generation: 0,
            next_token: 0,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<SearchEvent> {
        self.events.clone()
    }

    /// Read handle to the result list
    pub fn results(&self) -> &ResultList {
        &self.results
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Accumulated error text, one line per failed request
    pub fn error_string(&self) -> &str {
        &self.error_string
    }

    pub fn is_search_in_progress(&self) -> bool {
        !self.outstanding.is_empty()
    }

    /// Provider currently loading an additional page
    pub fn fetch_more_in_progress(&self) -> Option<&str> {
        self.fetch_more_in_progress.as_deref()
    }

    /// Change the query text.
    ///
    /// Outstanding requests are forgotten either way. A non-empty term
    /// (re)arms the quiet-period timer; an empty term also clears the list.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> Vec<Effect> {
        let term = term.into();
        if term == self.search_term {
            return Vec::new();
        }

        self.search_term = term;
        self.emit(SearchEvent::SearchTermChanged(self.search_term.clone()));

        if !self.error_string.is_empty() {
            self.error_string.clear();
            self.emit(SearchEvent::ErrorStringChanged(String::new()));
        }

        self.debounce_generation += 1;

        // responses for the previous term are stale from here on
        self.with_outstanding(|outstanding| outstanding.clear());
        self.set_fetch_more_in_progress(None);

        if !self.search_term.is_empty() {
            return vec![Effect::ArmDebounce {
                generation: self.debounce_generation,
                delay: self.debounce,
            }];
        }

        self.reset_results();
        vec![Effect::CancelDebounce]
    }

    /// The quiet period armed under `generation` has passed
    pub fn on_debounce_elapsed(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.debounce_generation || self.search_term.is_empty() {
            debug!("Ignoring outdated debounce timer {}", generation);
            return Vec::new();
        }
        self.run_search()
    }

    /// Search with the current term, discovering providers first if needed
    pub fn run_search(&mut self) -> Vec<Effect> {
        if !self.registry.is_empty() {
            return self.start_search();
        }

        if self.discovery.is_some() {
            debug!("Provider discovery already in flight");
            return Vec::new();
        }

        let token = self.next_token();
        self.discovery = Some(token);
        info!("Discovering search providers");

        vec![Effect::Dispatch(Dispatch {
            target: RequestTarget::Discovery,
            token,
            request: ApiRequest::get(PROVIDERS_PATH),
        })]
    }

    /// Forget all discovered providers; the next search rediscovers them
    pub fn reload_providers(&mut self) {
        self.registry.clear();
        self.discovery = None;
    }

    /// Load the next page of a paginated provider
    pub fn fetch_more_trigger_clicked(&mut self, provider_id: &str) -> Vec<Effect> {
        if self.search_term.is_empty() {
            return Vec::new();
        }

        let Some(provider) = self.registry.get(provider_id) else {
            debug!("Fetch more for unknown provider {}", provider_id);
            return Vec::new();
        };
        let Some(cursor) = provider.cursor.filter(|_| provider.is_paginated) else {
            debug!("Provider {} has no further pages", provider_id);
            return Vec::new();
        };

        let id = provider.id.clone();
        if self.outstanding.contains_key(&id) {
            warn!("Fetching more from {} while a request is outstanding", id);
        }

        self.set_fetch_more_in_progress(Some(id.clone()));

        let dispatch = self.provider_dispatch(id.clone(), Some(cursor));
        let token = dispatch.token;
        self.with_outstanding(|outstanding| {
            outstanding.insert(id, token);
        });

        vec![Effect::Dispatch(dispatch)]
    }

    /// Activate the row at `index`
    pub fn result_clicked(&mut self, index: usize) -> Vec<Effect> {
        if self.is_search_in_progress() {
            return Vec::new();
        }

        let Some(row) = self.results.row_at(index) else {
            return Vec::new();
        };
        let Some(provider) = self.registry.get(&row.provider_id) else {
            return Vec::new();
        };

        if row.is(ResultType::FetchMoreTrigger) {
            if !provider.is_paginated {
                return Vec::new();
            }
            return self.fetch_more_trigger_clicked(&row.provider_id);
        }

        let Ok(url) = Url::parse(&row.resource_url) else {
            debug!("Row {} has no usable resource URL", index);
            return Vec::new();
        };

        let activation = match provider
            .is_file_provider()
            .then(|| activation::file_folder(&url))
            .flatten()
        {
            Some(folder) => Activation::OpenFile { folder, url },
            None => Activation::OpenUrl(url),
        };

        vec![Effect::Open(activation)]
    }

    /// Apply the outcome of a dispatched request
    pub fn on_completion(&mut self, completion: Completion) -> Vec<Effect> {
        match completion.target {
            RequestTarget::Discovery => {
                self.on_discovery_finished(completion.token, completion.outcome)
            }
            RequestTarget::Provider { id, append } => {
                self.on_provider_finished(&id, append, completion.token, completion.outcome);
                Vec::new()
            }
        }
    }

    fn on_discovery_finished(
        &mut self,
        token: RequestToken,
        outcome: Result<ApiResponse, RequestError>,
    ) -> Vec<Effect> {
        if self.discovery != Some(token) {
            debug!("Dropping outdated discovery response");
            return Vec::new();
        }
        self.discovery = None;

        let response = match outcome.and_then(ApiResponse::into_result) {
            Ok(response) => response,
            Err(source) => {
                warn!("Provider discovery failed: {}", source);
                self.append_error(SearchError::Discovery {
                    term: self.search_term.clone(),
                    source,
                });
                return Vec::new();
            }
        };

        self.registry
            .populate(decode_providers(response.ocs_data()), &self.denylist);

        if self.registry.is_empty() || self.search_term.is_empty() {
            return Vec::new();
        }
        self.start_search()
    }

    fn on_provider_finished(
        &mut self,
        provider_id: &str,
        append: bool,
        token: RequestToken,
        outcome: Result<ApiResponse, RequestError>,
    ) {
        if self.outstanding.get(provider_id) != Some(&token) {
            debug!("Dropping outdated response from {}", provider_id);
            return;
        }

        match outcome.and_then(ApiResponse::into_result) {
            Ok(response) => self.merge_page(provider_id, append, &response),
            Err(source) => {
                warn!("Search on {} failed: {}", provider_id, source);
                self.append_error(SearchError::Provider {
                    provider_id: provider_id.to_string(),
                    term: self.search_term.clone(),
                    source,
                });
            }
        }

        // settle only after the page is applied
        self.with_outstanding(|outstanding| {
            outstanding.remove(provider_id);
        });

        if self.fetch_more_in_progress.as_deref() == Some(provider_id) {
            self.set_fetch_more_in_progress(None);
        }
    }

    fn merge_page(&mut self, provider_id: &str, append: bool, response: &ApiResponse) {
        if self.search_term.is_empty() {
            return;
        }

        let Some(page) = SearchPage::decode(response.ocs_data()) else {
            debug!("Empty payload from {}", provider_id);
            return;
        };
        let Some(provider) = self.registry.get_mut(provider_id) else {
            return;
        };

        provider.track_page(&page);
        debug!(
            "{} returned {} entries (paginated: {}, cursor: {:?})",
            provider_id,
            page.entries.len(),
            provider.is_paginated,
            provider.cursor
        );

        let events = self
            .merger
            .merge(&self.results, provider, &page.entries, append);
        for event in events {
            self.emit(event);
        }
    }

    fn start_search(&mut self) -> Vec<Effect> {
        self.reset_results();
        self.registry.reset_pagination();

        let dispatches: Vec<Dispatch> = self
            .registry
            .ids()
            .into_iter()
            .map(|id| self.provider_dispatch(id, None))
            .collect();

        self.with_outstanding(|outstanding| {
            outstanding.clear();
            for dispatch in &dispatches {
                if let RequestTarget::Provider { id, .. } = &dispatch.target {
                    outstanding.insert(id.clone(), dispatch.token);
                }
            }
        });

        info!(
            "Searching '{}' on {} providers",
            self.search_term,
            dispatches.len()
        );
        dispatches.into_iter().map(Effect::Dispatch).collect()
    }

    fn provider_dispatch(&mut self, provider_id: String, cursor: Option<u64>) -> Dispatch {
        let mut request =
            ApiRequest::get(search_path(&provider_id)).param("term", self.search_term.clone());
        if let Some(cursor) = cursor {
            request = request.param("cursor", cursor.to_string());
        }

        Dispatch {
            target: RequestTarget::Provider {
                id: provider_id,
                append: cursor.is_some(),
            },
            token: self.next_token(),
            request,
        }
    }

    fn next_token(&mut self) -> RequestToken {
        self.next_token += 1;
        self.next_token
    }

    /// Mutate the outstanding set, announcing empty <-> non-empty transitions
    fn with_outstanding<R>(&mut self, f: impl FnOnce(&mut HashMap<String, RequestToken>) -> R) -> R {
        let was_in_progress = self.is_search_in_progress();
        let result = f(&mut self.outstanding);
        let in_progress = self.is_search_in_progress();
        if was_in_progress != in_progress {
            self.emit(SearchEvent::SearchInProgressChanged(in_progress));
        }
        result
    }

    fn set_fetch_more_in_progress(&mut self, provider_id: Option<String>) {
        if self.fetch_more_in_progress != provider_id {
            self.fetch_more_in_progress = provider_id;
            self.emit(SearchEvent::FetchMoreInProgressChanged(
                self.fetch_more_in_progress.clone(),
            ));
        }
    }

    fn reset_results(&mut self) {
        if let Some(event) = self.results.reset() {
            self.emit(event);
        }
    }

    fn append_error(&mut self, error: SearchError) {
        self.error_string.push_str(&error.to_string());
        self.error_string.push('\n');
        self.emit(SearchEvent::ErrorStringChanged(self.error_string.clone()));
    }

    fn emit(&self, event: impl Into<SearchEvent>) {
        // no subscribers is fine
        let _ = self.events.send(event.into());
    }
}
