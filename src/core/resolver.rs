//! Component resolver.
//!
//! Turns a matched handler path into a dispatch target: splits it into module,
//! controller, action and param, then walks the controller naming convention
//! against a [`ControllerRegistry`] until a reference exists.
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::{
    config::models::{DefaultsConfig, NamingConfig},
    core::{
        error::{RouterError, RouterResult},
        route::Route,
    },
    ports::controller_registry::ControllerRegistry,
};

/// Resolved dispatch target for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Handler path the component was resolved from
    pub handler: String,
    pub module: String,
    /// Controller segment of the handler path
    pub controller: String,
    /// Action the dispatcher invokes
    pub action: String,
    /// Fully-qualified controller reference
    pub controller_ref: String,
    /// Action method name
    pub action_ref: String,
    pub param: String,
}

/// Handler path split into its parts.
///
/// `action` is `None` only when built by hand; [`HandlerParts::parse`] always
/// fills in the default action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerParts {
    pub handler: String,
    pub module: String,
    pub controller: String,
    pub action: Option<String>,
    pub param: String,
}

impl HandlerParts {
    pub fn parse(handler: &str, defaults: &DefaultsConfig) -> RouterResult<Self> {
        let parts: Vec<&str> = handler.split('/').collect();

        let module = parts.first().copied().unwrap_or_default();
        if module.is_empty() {
            return Err(RouterError::MissingModule {
                handler: handler.to_string(),
            });
        }

        let controller = parts
            .get(1)
            .copied()
            .filter(|c| !c.is_empty())
            .unwrap_or(defaults.controller.as_str());
        let action = parts
            .get(2)
            .copied()
            .filter(|a| !a.is_empty())
            .unwrap_or(defaults.action.as_str());
        let param = parts.get(3).copied().unwrap_or_default();

        Ok(Self {
            handler: handler.to_string(),
            module: module.to_string(),
            controller: controller.to_string(),
            action: Some(action.to_string()),
            param: param.to_string(),
        })
    }
}

/// Controller / action naming convention.
#[derive(Debug, Clone)]
pub struct ControllerNaming {
    config: NamingConfig,
    index: String,
}

impl ControllerNaming {
    pub fn new(config: NamingConfig, defaults: &DefaultsConfig) -> Self {
        Self {
            index: capitalize(&defaults.controller),
            config,
        }
    }

    fn reference(&self, parts: &[&str]) -> String {
        let mut path: Vec<&str> = Vec::with_capacity(parts.len() + 1);
        if !self.config.namespace.is_empty() {
            path.push(&self.config.namespace);
        }
        path.extend_from_slice(parts);
        format!(
            "{}{}",
            path.join(&self.config.separator),
            self.config.controller_suffix
        )
    }

    /// `Module\ControllerController`
    pub fn direct(&self, module: &str, controller: &str) -> String {
        self.reference(&[&capitalize(module), &capitalize(controller)])
    }

    /// `Module\Controller\IndexController`
    pub fn nested_index(&self, module: &str, controller: &str) -> String {
        self.reference(&[&capitalize(module), &capitalize(controller), &self.index])
    }

    /// `Module\Controller\ActionController`
    pub fn action_controller(&self, module: &str, controller: &str, action: &str) -> String {
        self.reference(&[
            &capitalize(module),
            &capitalize(controller),
            &capitalize(action),
        ])
    }

    /// `Module\IndexController`
    pub fn module_index(&self, module: &str) -> String {
        self.reference(&[&capitalize(module), &self.index])
    }

    /// Action method name: `-`, `_` and `.` removed, action suffix appended.
    pub fn action_method(&self, action: &str) -> String {
        let name: String = action
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | '.'))
            .collect();
        format!("{name}{}", self.config.action_suffix)
    }
}

/// Upper-case the first character, leave the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolves handler paths into [`Component`]s.
#[derive(Clone)]
pub struct ComponentResolver {
    registry: Arc<dyn ControllerRegistry>,
    naming: ControllerNaming,
    defaults: DefaultsConfig,
}

impl ComponentResolver {
    pub fn new(
        registry: Arc<dyn ControllerRegistry>,
        naming: NamingConfig,
        defaults: DefaultsConfig,
    ) -> Self {
        Self {
            registry,
            naming: ControllerNaming::new(naming, &defaults),
            defaults,
        }
    }

    pub fn naming(&self) -> &ControllerNaming {
        &self.naming
    }

    /// Resolve a handler path for `route`. An empty handler means the default handler.
    pub fn resolve(&self, route: &Route, handler: &str) -> RouterResult<Component> {
        let handler = if handler.is_empty() {
            self.defaults.handler()
        } else {
            handler.to_string()
        };
        let parts = HandlerParts::parse(&handler, &self.defaults)?;
        self.resolve_parts(route, parts)
    }

    /// Walk the controller fallback chain:
    /// 1. default controller or action: direct controller, then nested index controller
    /// 2. any other action: one controller per action, dispatched to the default action
    /// 3. no action: module index controller
    pub fn resolve_parts(&self, route: &Route, parts: HandlerParts) -> RouterResult<Component> {
        let HandlerParts {
            handler,
            module,
            controller,
            action,
            param,
        } = parts;

        let direct = self.naming.direct(&module, &controller);
        let is_default_action = action.as_deref() == Some(self.defaults.action.as_str());

        let (controller_ref, action) = if route.controller() == self.defaults.controller
            || is_default_action
        {
            let action = action.unwrap_or_else(|| self.defaults.action.clone());
            if self.registry.has(&direct) {
                (direct, action)
            } else {
                let nested = self.naming.nested_index(&module, &controller);
                if !self.registry.has(&nested) {
                    return Err(RouterError::ControllerNotFound { controller: nested });
                }
                (nested, action)
            }
        } else if let Some(action) = action {
            if self.registry.has(&direct) && self.registry.handles_any_action(&direct) {
                (direct, action)
            } else {
                let per_action = self.naming.action_controller(&module, &controller, &action);
                if !self.registry.has(&per_action) {
                    return Err(RouterError::ActionControllerNotFound {
                        controller: per_action,
                    });
                }
                // The action was spent naming the class; dispatch its default action.
                (per_action, self.defaults.action.clone())
            }
        } else {
            let module_index = self.naming.module_index(&module);
            if !self.registry.has(&module_index) {
                return Err(RouterError::ModuleControllerNotFound {
                    controller: module_index,
                });
            }
            (module_index, self.defaults.action.clone())
        };

        debug!(
            handler = %handler,
            controller = %controller_ref,
            action = %action,
            "Resolved component"
        );

        Ok(Component {
            action_ref: self.naming.action_method(&action),
            handler,
            module,
            controller,
            action,
            controller_ref,
            param,
        })
    }
}
