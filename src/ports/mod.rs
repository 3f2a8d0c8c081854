pub mod config_provider;
pub mod controller_registry;

pub use config_provider::ConfigProvider;
pub use controller_registry::ControllerRegistry;
