pub mod config_providers;
pub mod controller_registry;

/// Re-export commonly used types from adapters
pub use config_providers::FileConfigProvider;
pub use controller_registry::StaticControllerRegistry;
