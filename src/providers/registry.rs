//! Provider registry for the discovered search providers

use super::types::Provider;
use super::wire::DiscoveredProvider;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Registry of all discovered providers, keyed by display name
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Provider>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any provider with the same name
    pub fn register(&mut self, provider: Provider) {
        self.providers.insert(provider.name.clone(), provider);
    }

    /// Fill the registry from a discovery response.
    ///
    /// Entries without a name and denylisted ids are skipped. Returns the
    /// number of providers registered.
    pub fn populate(&mut self, discovered: Vec<DiscoveredProvider>, denylist: &[String]) -> usize {
        let mut registered = 0;

        for entry in discovered {
            if entry.name.is_empty() {
                debug!("Skipping provider without name: {:?}", entry.id);
                continue;
            }
            if denylist.iter().any(|id| *id == entry.id) {
                debug!("Skipping denylisted provider: {}", entry.id);
                continue;
            }

            self.register(Provider::new(entry.id, entry.name, entry.order));
            registered += 1;
        }

        info!("Registered {} search providers", self.len());
        registered
    }

    /// Get a provider by id
    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.values().find(|p| p.id == id)
    }

    /// Get a provider by id for updating its pagination state
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Provider> {
        self.providers.values_mut().find(|p| p.id == id)
    }

    /// Forget every provider's cursor before a new query; page sizes stay
    pub fn reset_pagination(&mut self) {
        for provider in self.providers.values_mut() {
            provider.is_paginated = false;
            provider.cursor = None;
        }
    }

    /// All provider ids, ordered by provider name
    pub fn ids(&self) -> Vec<String> {
        self.providers.values().map(|p| p.id.clone()).collect()
    }

    /// Drop every provider
    pub fn clear(&mut self) {
        self.providers.clear();
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
