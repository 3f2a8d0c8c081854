//! Config-backed controller registry.
use std::collections::HashSet;

use crate::{config::models::RouterConfig, ports::controller_registry::ControllerRegistry};

/// Registry holding a fixed set of controller references.
///
/// Dynamic controllers are known controllers that also dispatch any action
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticControllerRegistry {
    controllers: HashSet<String>,
    dynamic: HashSet<String>,
}

impl StaticControllerRegistry {
    pub fn new<I, S>(controllers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            controllers: controllers.into_iter().map(Into::into).collect(),
            dynamic: HashSet::new(),
        }
    }

    /// Build from the `controllers` and `dynamic_controllers` config lists.
    pub fn from_config(config: &RouterConfig) -> Self {
        let mut registry = Self::new(config.controllers.iter().cloned());
        for controller in &config.dynamic_controllers {
            registry.insert_dynamic(controller.clone());
        }
        registry
    }

    pub fn insert(&mut self, controller: impl Into<String>) {
        self.controllers.insert(controller.into());
    }

    /// Register a controller that accepts any action.
    pub fn insert_dynamic(&mut self, controller: impl Into<String>) {
        let controller = controller.into();
        self.controllers.insert(controller.clone());
        self.dynamic.insert(controller);
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Known references in sorted order.
    pub fn controllers(&self) -> Vec<&str> {
        let mut controllers: Vec<&str> = self.controllers.iter().map(String::as_str).collect();
        controllers.sort_unstable();
        controllers
    }
}

impl ControllerRegistry for StaticControllerRegistry {
    fn has(&self, controller: &str) -> bool {
        self.controllers.contains(controller)
    }

    fn handles_any_action(&self, controller: &str) -> bool {
        self.dynamic.contains(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_registers_both_lists() {
        let config = RouterConfig {
            controllers: vec!["App\\Controller\\About\\IndexController".to_string()],
            dynamic_controllers: vec!["App\\Controller\\Shop\\WidgetsController".to_string()],
            ..RouterConfig::default()
        };
        let registry = StaticControllerRegistry::from_config(&config);

        assert_eq!(registry.len(), 2);
        assert!(registry.has("App\\Controller\\About\\IndexController"));
        assert!(!registry.handles_any_action("App\\Controller\\About\\IndexController"));
        assert!(registry.has("App\\Controller\\Shop\\WidgetsController"));
        assert!(registry.handles_any_action("App\\Controller\\Shop\\WidgetsController"));
        assert!(!registry.has("App\\Controller\\Missing\\IndexController"));
    }

    #[test]
    fn controllers_are_listed_sorted() {
        let registry = StaticControllerRegistry::new(["b", "a", "c"]);
        assert_eq!(registry.controllers(), vec!["a", "b", "c"]);
    }
}
