//! Search provider module
//!
//! Providers are discovered once per session and tracked in a registry;
//! each one keeps its own pagination state across responses.

mod pagination;
mod registry;
mod types;
mod wire;

pub use registry::ProviderRegistry;
pub use types::*;
pub use wire::*;

/// Path of the provider discovery endpoint
pub const PROVIDERS_PATH: &str = "ocs/v2.php/search/providers";

/// Path of a provider's search endpoint
pub fn search_path(provider_id: &str) -> String {
    format!("{}/{}/search", PROVIDERS_PATH, provider_id)
}
