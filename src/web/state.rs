//! Application state shared across handlers

use crate::config::Settings;
use crate::locales::Translations;
use crate::network::HttpClient;
use crate::providers::ProviderRegistry;
use crate::search::MetaSearch;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Provider registry
    pub registry: Arc<ProviderRegistry>,
    /// Search executor
    pub search: Arc<MetaSearch>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
    /// Dialog message catalog
    pub translations: Arc<Translations>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        settings: Settings,
        registry: ProviderRegistry,
        client: HttpClient,
    ) -> anyhow::Result<Self> {
        let settings = Arc::new(settings);
        let registry = Arc::new(registry);
        let search = Arc::new(MetaSearch::new(client, registry.clone()));
        let templates = Arc::new(super::Templates::new()?);
        let translations = Arc::new(Translations::new());

        Ok(Self {
            settings,
            registry,
            search,
            templates,
            translations,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
