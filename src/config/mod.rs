//! Configuration loading and settings types

pub mod settings;

pub use settings::{
    GeneralSettings, OutgoingSettings, ProviderConfig, ProxySettings, ServerSettings, Settings,
    UiSettings,
};
