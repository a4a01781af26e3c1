//! Search model inputs, outputs and events

use crate::activation::Activation;
use crate::network::{ApiRequest, ApiResponse, RequestError};
use crate::results::ListEvent;
use serde::Serialize;
use std::time::Duration;

/// What an issued request was for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// The provider listing
    Discovery,
    /// A provider search; `append` marks a continuation page
    Provider { id: String, append: bool },
}

/// Identifies one issued request; completions carrying an outdated token
/// are dropped
pub type RequestToken = u64;

/// A request the model wants executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub target: RequestTarget,
    pub token: RequestToken,
    pub request: ApiRequest,
}

/// Outcome of a dispatched request, fed back into the model
#[derive(Debug, Clone)]
pub struct Completion {
    pub target: RequestTarget,
    pub token: RequestToken,
    pub outcome: Result<ApiResponse, RequestError>,
}

impl Completion {
    pub fn new(dispatch: &Dispatch, outcome: Result<ApiResponse, RequestError>) -> Self {
        Self {
            target: dispatch.target.clone(),
            token: dispatch.token,
            outcome,
        }
    }
}

/// Side effects the driver performs on the model's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// (Re)start the quiet-period timer, replacing any running one
    ArmDebounce { generation: u64, delay: Duration },
    /// Stop the quiet-period timer
    CancelDebounce,
    /// Execute a request
    Dispatch(Dispatch),
    /// Open an activated result
    Open(Activation),
}

/// Observable changes of a search session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum SearchEvent {
    /// The result list changed
    List(ListEvent),
    SearchTermChanged(String),
    ErrorStringChanged(String),
    SearchInProgressChanged(bool),
    /// Id of the provider currently loading more results
    FetchMoreInProgressChanged(Option<String>),
}

impl From<ListEvent> for SearchEvent {
    fn from(event: ListEvent) -> Self {
        Self::List(event)
    }
}

/// Session properties as seen by an observer, rebuilt from [`SearchEvent`]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub search_term: String,
    pub error_string: String,
    pub search_in_progress: bool,
    pub fetch_more_in_progress: Option<String>,
}

impl SessionState {
    /// Fold one event into the state
    pub fn apply(&mut self, event: &SearchEvent) {
        match event {
            SearchEvent::List(_) => {}
            SearchEvent::SearchTermChanged(term) => self.search_term = term.clone(),
            SearchEvent::ErrorStringChanged(error) => self.error_string = error.clone(),
            SearchEvent::SearchInProgressChanged(in_progress) => {
                self.search_in_progress = *in_progress
            }
            SearchEvent::FetchMoreInProgressChanged(provider_id) => {
                self.fetch_more_in_progress = provider_id.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_follows_events() {
        let mut state = SessionState::default();
        for event in [
            SearchEvent::SearchTermChanged("report".to_string()),
            SearchEvent::SearchInProgressChanged(true),
            SearchEvent::FetchMoreInProgressChanged(Some("files".to_string())),
            SearchEvent::List(ListEvent::Reset),
            SearchEvent::ErrorStringChanged("boom\n".to_string()),
        ] {
            state.apply(&event);
        }

        assert_eq!(state.search_term, "report");
        assert!(state.search_in_progress);
        assert_eq!(state.fetch_more_in_progress.as_deref(), Some("files"));
        assert_eq!(state.error_string, "boom\n");
    }

    #[test]
    fn test_event_serialization() {
        let event = SearchEvent::from(ListEvent::Inserted { start: 2, count: 3 });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"event": "list", "value": {"kind": "inserted", "start": 2, "count": 3}})
        );
    }
}
