//! Configuration data structures for Switchyard.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files. They are
//! serde-friendly and include defaults so that minimal configs only need `http_path`
//! and a `routes` table. Builders here are part of the public API for embedding.
use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

fn default_true() -> bool {
    true
}

fn default_redirect_status() -> u16 {
    301
}

/// Default module / controller / action identifiers.
///
/// The site root resolves to `module/controller`, and a request whose controller
/// and action both equal the defaults skips the rule table entirely.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub module: String,
    pub controller: String,
    pub action: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            module: "home".to_string(),
            controller: "index".to_string(),
            action: "index".to_string(),
        }
    }
}

impl DefaultsConfig {
    /// Handler path used for the default-route shortcut (`module/controller`).
    pub fn handler(&self) -> String {
        format!("{}/{}", self.module, self.controller)
    }
}

/// Naming convention used to turn handler segments into controller references.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NamingConfig {
    /// Root namespace every controller reference starts with
    pub namespace: String,
    /// Separator placed between namespace parts
    pub separator: String,
    /// Suffix appended to controller class names
    pub controller_suffix: String,
    /// Suffix appended to action method names
    pub action_suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            namespace: "App\\Controller".to_string(),
            separator: "\\".to_string(),
            controller_suffix: "Controller".to_string(),
            action_suffix: "Action".to_string(),
        }
    }
}

/// Canonical URL guard switches.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GuardsConfig {
    #[serde(default = "default_true")]
    pub double_slash: bool,
    #[serde(default = "default_true")]
    pub index_suffix: bool,
    #[serde(default = "default_true")]
    pub trailing_slash: bool,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// Status code emitted with every guard redirect
    #[serde(default = "default_redirect_status")]
    pub status_code: u16,
}

impl Default for GuardsConfig {
    fn default() -> Self {
        Self {
            double_slash: true,
            index_suffix: true,
            trailing_slash: true,
            lowercase: true,
            status_code: default_redirect_status(),
        }
    }
}

/// Structured route registration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub method: String,
    pub module: String,
    pub controller: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub action: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub param: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arg: String,
}

impl RuleSpec {
    pub fn new(
        method: impl Into<String>,
        module: impl Into<String>,
        controller: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            module: module.into(),
            controller: controller.into(),
            action: String::new(),
            param: String::new(),
            arg: String::new(),
        }
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = arg.into();
        self
    }
}

/// A single `routes` entry: either a structured table or the compact
/// `METHOD@module::controller[/action][/param][/arg]` string.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RuleEntry {
    Compact(String),
    Structured(RuleSpec),
}

impl From<RuleSpec> for RuleEntry {
    fn from(spec: RuleSpec) -> Self {
        RuleEntry::Structured(spec)
    }
}

impl From<&str> for RuleEntry {
    fn from(compact: &str) -> Self {
        RuleEntry::Compact(compact.to_string())
    }
}

/// Ordered `pattern -> rule` registration map.
///
/// Iteration order is the order entries appear in the source document, which
/// is the order rules are evaluated in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMap {
    entries: Vec<(String, RuleEntry)>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A pattern that is already present keeps its position
    /// and takes the new rule.
    pub fn insert(&mut self, pattern: impl Into<String>, entry: impl Into<RuleEntry>) {
        let pattern = pattern.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(p, _)| *p == pattern) {
            Some(existing) => existing.1 = entry,
            None => self.entries.push((pattern, entry)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleEntry)> {
        self.entries.iter().map(|(p, e)| (p.as_str(), e))
    }
}

impl<P: Into<String>, E: Into<RuleEntry>> FromIterator<(P, E)> for RouteMap {
    fn from_iter<I: IntoIterator<Item = (P, E)>>(iter: I) -> Self {
        let mut map = RouteMap::new();
        for (pattern, entry) in iter {
            map.insert(pattern, entry);
        }
        map
    }
}

impl Serialize for RouteMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (pattern, entry) in &self.entries {
            map.serialize_entry(pattern, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RouteMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RouteMapVisitor;

        impl<'de> Visitor<'de> for RouteMapVisitor {
            type Value = RouteMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of route patterns to rules")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RouteMap, A::Error> {
                let mut map = RouteMap::new();
                while let Some((pattern, entry)) = access.next_entry::<String, RuleEntry>()? {
                    map.insert(pattern, entry);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(RouteMapVisitor)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RouterConfig {
    /// Canonical absolute base URL (with trailing slash) used for redirects
    pub http_path: String,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub guards: GuardsConfig,
    /// Controller references known to the config-backed registry
    #[serde(default)]
    pub controllers: Vec<String>,
    /// Controllers that dispatch any action themselves
    #[serde(default)]
    pub dynamic_controllers: Vec<String>,
    pub routes: RouteMap,
}

impl RouterConfig {
    /// Create a new router configuration builder
    pub fn builder() -> RouterConfigBuilder {
        RouterConfigBuilder::default()
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            http_path: "http://localhost/".to_string(),
            defaults: DefaultsConfig::default(),
            naming: NamingConfig::default(),
            guards: GuardsConfig::default(),
            controllers: Vec::new(),
            dynamic_controllers: Vec::new(),
            routes: RouteMap::new(),
        }
    }
}

/// Builder for RouterConfig to allow for cleaner configuration creation
#[derive(Default)]
pub struct RouterConfigBuilder {
    http_path: Option<String>,
    defaults: Option<DefaultsConfig>,
    naming: Option<NamingConfig>,
    guards: Option<GuardsConfig>,
    controllers: Vec<String>,
    dynamic_controllers: Vec<String>,
    routes: RouteMap,
}

impl RouterConfigBuilder {
    /// Set the canonical base URL
    pub fn http_path(mut self, http_path: impl Into<String>) -> Self {
        self.http_path = Some(http_path.into());
        self
    }

    /// Set the default module / controller / action
    pub fn defaults(mut self, defaults: DefaultsConfig) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Set the controller naming convention
    pub fn naming(mut self, naming: NamingConfig) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Set guard switches
    pub fn guards(mut self, guards: GuardsConfig) -> Self {
        self.guards = Some(guards);
        self
    }

    /// Register a known controller reference
    pub fn controller(mut self, reference: impl Into<String>) -> Self {
        self.controllers.push(reference.into());
        self
    }

    /// Register a controller that handles any action itself
    pub fn dynamic_controller(mut self, reference: impl Into<String>) -> Self {
        self.dynamic_controllers.push(reference.into());
        self
    }

    /// Add a route with the given pattern; registration order is kept
    pub fn route(mut self, pattern: impl Into<String>, entry: impl Into<RuleEntry>) -> Self {
        self.routes.insert(pattern, entry);
        self
    }

    /// Build the final RouterConfig
    pub fn build(self) -> Result<RouterConfig, String> {
        let http_path = self
            .http_path
            .ok_or_else(|| "http_path is required".to_string())?;

        if self.routes.is_empty() {
            return Err("At least one route must be configured".to_string());
        }

        Ok(RouterConfig {
            http_path,
            defaults: self.defaults.unwrap_or_default(),
            naming: self.naming.unwrap_or_default(),
            guards: self.guards.unwrap_or_default(),
            controllers: self.controllers,
            dynamic_controllers: self.dynamic_controllers,
            routes: self.routes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_map_keeps_document_order() {
        let json = r#"{
            "zeta": "get@zeta::index",
            "alpha": {"method": "post", "module": "alpha", "controller": "save"},
            "mid/:controller": "get@mid::1"
        }"#;

        let map: RouteMap = serde_json::from_str(json).unwrap();
        let patterns: Vec<&str> = map.iter().map(|(p, _)| p).collect();
        assert_eq!(patterns, vec!["zeta", "alpha", "mid/:controller"]);
        assert!(matches!(
            map.iter().nth(1).map(|(_, e)| e),
            Some(RuleEntry::Structured(_))
        ));
    }

    #[test]
    fn route_map_rejects_non_mapping() {
        let result: Result<RouteMap, _> = serde_json::from_str(r#"["about"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn builder_requires_routes() {
        let result = RouterConfig::builder()
            .http_path("https://example.com/")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_reinserting_pattern_keeps_position() {
        let config = RouterConfig::builder()
            .http_path("https://example.com/")
            .route("about", "get@about::index")
            .route("contact", "get@contact::index")
            .route("about", "get@about::us")
            .build()
            .unwrap();

        let entries: Vec<(&str, &RuleEntry)> = config.routes.iter().collect();
        assert_eq!(entries[0].0, "about");
        assert_eq!(entries[0].1, &RuleEntry::Compact("get@about::us".to_string()));
        assert_eq!(entries[1].0, "contact");
    }
}
