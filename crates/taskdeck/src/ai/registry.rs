//! Provider registry - manages generation provider instances.
//!
//! Constructed once at process start and passed explicitly into the
//! orchestrator; there is no global instance.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::errors::{TrackerError, TrackerResult};

use super::gemini::GeminiProvider;
use super::openrouter::OpenRouterProvider;
use super::provider::GenerationProvider;

/// Registry of generation providers keyed by name.
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Arc<dyn GenerationProvider>>>,
}

impl ProviderRegistry {
    /// Create a new empty provider registry.
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry with default providers registered.
    pub fn with_defaults() -> Self {
        let registry = Self::new();

        if let Ok(provider) = GeminiProvider::from_env() {
            registry.register(Arc::new(provider));
        }

        if let Ok(provider) = OpenRouterProvider::from_env() {
            registry.register(Arc::new(provider));
        }

        registry
    }

    /// Register a provider.
    pub fn register(&self, provider: Arc<dyn GenerationProvider>) {
        let mut providers = self.providers.write().unwrap();
        providers.insert(provider.name().to_string(), provider);
    }

    /// Get a provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn GenerationProvider>> {
        let providers = self.providers.read().unwrap();
        providers.get(name).cloned()
    }

    /// Get a provider that supports a specific model.
    pub fn get_for_model(&self, model: &str) -> Option<Arc<dyn GenerationProvider>> {
        let providers = self.providers.read().unwrap();
        providers
            .values()
            .find(|p| p.supports_model(model))
            .cloned()
    }

    /// Check if a provider is registered.
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap();
        providers.contains_key(name)
    }

    /// Get all registered provider names.
    pub fn provider_names(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap();
        providers.keys().cloned().collect()
    }

    /// Get all configured providers.
    pub fn configured_providers(&self) -> Vec<Arc<dyn GenerationProvider>> {
        let providers = self.providers.read().unwrap();
        providers
            .values()
            .filter(|p| p.is_configured())
            .cloned()
            .collect()
    }

    /// Get a provider, returning an error if not found.
    pub fn require(&self, name: &str) -> TrackerResult<Arc<dyn GenerationProvider>> {
        self.get(name)
            .ok_or_else(|| TrackerError::ProviderNotConfigured {
                provider: name.to_string(),
            })
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
