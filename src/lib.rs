//! unified-search: aggregated search over a collaboration server's
//! search providers
//!
//! Providers are discovered once, queried concurrently for every settled
//! search term, and their pages merged into one ordered list of
//! per-provider blocks that a view can render incrementally.

pub mod account;
pub mod activation;
pub mod config;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;

pub use account::Account;
pub use config::Settings;
pub use results::{ResultList, SearchResult};
pub use search::{SearchSession, UnifiedSearchModel};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Quiet period before a changed search term is searched, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 800;

/// Provider excluded from discovery by default
pub const DENYLISTED_PROVIDER_ID: &str = "talk-message-current";
