//! Provider registry for managing available metadata providers

use super::traits::MetadataProvider;
use crate::config::ProviderConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all loaded metadata providers
pub struct ProviderRegistry {
    /// Providers by name
    providers: HashMap<String, Arc<dyn MetadataProvider>>,
    /// Registration order, used for stable listings in the UI
    order: Vec<String>,
    /// Provider configurations
    configs: HashMap<String, ProviderConfig>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            order: Vec::new(),
            configs: HashMap::new(),
        }
    }

    /// Register a provider
    pub fn register(&mut self, provider: Arc<dyn MetadataProvider>, config: ProviderConfig) {
        let name = provider.name().to_string();
        if !self.providers.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.providers.insert(name.clone(), provider);
        self.configs.insert(name, config);
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn MetadataProvider>> {
        self.providers.get(name)
    }

    /// Get provider config
    pub fn get_config(&self, name: &str) -> Option<&ProviderConfig> {
        self.configs.get(name)
    }

    /// All provider names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Names of providers not disabled by configuration, in registration order
    pub fn enabled_names(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|name| {
                self.configs
                    .get(name.as_str())
                    .map(|config| !config.disabled)
                    .unwrap_or(true)
            })
            .map(|s| s.as_str())
            .collect()
    }

    /// Check if a provider exists
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Effective timeout for a provider, config override first
    pub fn get_timeout(&self, name: &str, default: f64) -> f64 {
        self.configs
            .get(name)
            .and_then(|c| c.timeout)
            .or_else(|| self.providers.get(name).map(|p| p.timeout()))
            .unwrap_or(default)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
