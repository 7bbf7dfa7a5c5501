//! Infrastructure layer for llm-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the backend gateway (local CLI tools with an
//! HTTP API fallback), provider clients, and configuration file loading.

pub mod backends;
pub mod config;
pub mod gateway;
pub mod providers;

// Re-export commonly used types
pub use backends::{CliCapabilities, CliTool};
pub use config::{
    ConfigError, ConfigLoader, ConfigSources, FileConfig, FileModelConfig, FileOutputConfig,
};
pub use gateway::{CredentialSource, EnvCredentials, FallbackGateway, StaticCredentials};
pub use providers::{ProviderClient, ProviderRegistry, provider_defaults};
