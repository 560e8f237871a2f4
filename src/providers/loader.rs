//! Provider loader for initializing providers from configuration

use super::registry::ProviderRegistry;
use super::traits::MetadataProvider;
use super::{douban, google};
use crate::config::{ProviderConfig, Settings};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing providers from settings
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load all configured providers into a registry. Disabled providers are
    /// still registered so an explicit request can reach them; they are just
    /// left out of the default selection.
    pub fn load(settings: &Settings) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();

        for config in &settings.providers {
            match Self::create_provider(&config.provider, config) {
                Ok(provider) => {
                    info!("Loaded provider: {} ({})", config.name, config.provider);
                    registry.register(provider, config.clone());
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {}", config.name, e);
                }
            }
        }

        info!("Loaded {} metadata providers", registry.len());
        Ok(registry)
    }

    /// Create a provider instance by type name
    fn create_provider(
        provider_type: &str,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn MetadataProvider>> {
        let mut provider: Box<dyn MetadataProvider> = match provider_type {
            "google" => Box::new(google::Google::new()),
            "douban" => Box::new(douban::Douban::new()),
            _ => {
                return Err(anyhow::anyhow!("Unknown provider type: {}", provider_type));
            }
        };

        provider.init(config)?;

        Ok(Arc::from(provider))
    }

    /// Get list of available provider types
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "douban"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_load_all_providers() {
        let settings = Settings::default();
        let registry = ProviderLoader::load(&settings).unwrap();

        assert_eq!(registry.len(), ProviderLoader::available_providers().len());
        assert!(registry.contains("google"));
        assert!(registry.contains("douban"));
    }

    #[test]
    fn unknown_provider_type_is_skipped() {
        let mut settings = Settings::default();
        settings.providers.push(ProviderConfig {
            name: "mystery".to_string(),
            provider: "mystery".to_string(),
            ..Default::default()
        });

        let registry = ProviderLoader::load(&settings).unwrap();
        assert!(!registry.contains("mystery"));
    }
}
