//! Metadata provider implementations and registry

pub mod douban;
pub mod google;
pub mod loader;
pub mod registry;
pub mod traits;

pub use loader::ProviderLoader;
pub use registry::ProviderRegistry;
pub use traits::{
    MetadataProvider, ProviderAbout, ProviderRequest, ProviderResponse, SearchParams,
};
