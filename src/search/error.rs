//! Search failure types

use crate::network::RequestError;
use thiserror::Error;

/// A failed request, rendered into the session's error text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Failed to fetch search providers for '{term}'. Error: {source}")]
    Discovery { term: String, source: RequestError },
    #[error("Search has failed for '{term}'. Error: {source}")]
    Provider {
        provider_id: String,
        term: String,
        source: RequestError,
    },
}

/// The session task is gone
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("search session is closed")]
pub struct SessionClosed;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SearchError::Discovery {
            term: "report".to_string(),
            source: RequestError::Status(404),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch search providers for 'report'. Error: HTTP error: 404"
        );

        let err = SearchError::Provider {
            provider_id: "files".to_string(),
            term: "report".to_string(),
            source: RequestError::Timeout,
        };
        assert_eq!(
            err.to_string(),
            "Search has failed for 'report'. Error: Request timed out"
        );
    }
}
