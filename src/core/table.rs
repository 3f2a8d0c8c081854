//! Routing table: compiled rules partitioned by request method.
//!
//! Built once at startup and read-only afterwards, so a table can be shared
//! across request workers behind an `Arc` without locking.
use crate::{
    config::models::RouteMap,
    core::{
        error::{RouterError, RouterResult},
        rule::{HttpMethod, Rule, RuleCompiler},
    },
};

#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    get: Vec<Rule>,
    post: Vec<Rule>,
}

impl RoutingTable {
    /// Compile every registration, keeping registration order within each method.
    ///
    /// Fails with [`RouterError::Configuration`] when the map is empty, or with the
    /// first compilation error encountered.
    pub fn register_routes(routes: &RouteMap) -> RouterResult<Self> {
        if routes.is_empty() {
            return Err(RouterError::Configuration(
                "route map import failed: no rules found".to_string(),
            ));
        }

        let mut table = RoutingTable::default();
        for (pattern, entry) in routes.iter() {
            let rule = RuleCompiler::compile(pattern, entry)?;
            tracing::debug!(
                method = %rule.method(),
                pattern = rule.name(),
                handler = rule.handler().as_str(),
                "Registered route"
            );
            table.rules_mut(rule.method()).push(rule);
        }

        tracing::info!(
            get = table.get.len(),
            post = table.post.len(),
            "Routing table built"
        );
        Ok(table)
    }

    /// Register from an untyped document; anything but a non-empty mapping is
    /// rejected as a configuration error.
    pub fn from_value(value: serde_json::Value) -> RouterResult<Self> {
        if !value.is_object() {
            return Err(RouterError::Configuration(
                "route map import failed: routes must be a mapping".to_string(),
            ));
        }

        let routes: RouteMap = serde_json::from_value(value)
            .map_err(|e| RouterError::Configuration(format!("route map import failed: {e}")))?;
        Self::register_routes(&routes)
    }

    /// Rules for a method, in evaluation order.
    pub fn rules(&self, method: HttpMethod) -> &[Rule] {
        match method {
            HttpMethod::Get => &self.get,
            HttpMethod::Post => &self.post,
        }
    }

    fn rules_mut(&mut self, method: HttpMethod) -> &mut Vec<Rule> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
        }
    }

    /// Total number of rules across all methods.
    pub fn len(&self) -> usize {
        self.get.len() + self.post.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rules, GET first, each method in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.get.iter().chain(self.post.iter())
    }

    /// Reverse lookup: the first pattern registered for `handler` under `method`.
    pub fn find_pattern(&self, method: HttpMethod, handler: &str) -> Option<&str> {
        self.rules(method)
            .iter()
            .find(|rule| rule.handler().as_str() == handler)
            .map(Rule::name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::models::{RuleEntry, RuleSpec};

    fn sample_routes() -> RouteMap {
        [
            ("about", RuleEntry::from(RuleSpec::new("get", "about", "index"))),
            ("login/attempt", RuleEntry::from("post@login::attempt")),
            ("contact", RuleEntry::from("get@contact::index")),
        ]
        .into_iter()
        .collect::<RouteMap>()
    }

    #[test]
    fn partitions_by_method_in_registration_order() {
        let table = RoutingTable::register_routes(&sample_routes()).unwrap();

        let get: Vec<&str> = table.rules(HttpMethod::Get).iter().map(Rule::name).collect();
        assert_eq!(get, vec!["about", "contact"]);

        let post = table.rules(HttpMethod::Post);
        assert_eq!(post.len(), 1);
        assert_eq!(post[0].handler().as_str(), "login/attempt");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty_registration_is_a_configuration_error() {
        let result = RoutingTable::register_routes(&RouteMap::new());
        assert!(matches!(result, Err(RouterError::Configuration(_))));
    }

    #[test]
    fn untyped_registration_requires_a_mapping() {
        for value in [json!([]), json!("about"), json!(null), json!(42), json!({})] {
            let result = RoutingTable::from_value(value);
            assert!(matches!(result, Err(RouterError::Configuration(_))));
        }

        let table = RoutingTable::from_value(json!({"about": "get@about::index"})).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn reverse_lookup_finds_pattern_for_handler() {
        let table = RoutingTable::register_routes(&sample_routes()).unwrap();
        assert_eq!(table.find_pattern(HttpMethod::Get, "contact/index"), Some("contact"));
        assert_eq!(table.find_pattern(HttpMethod::Post, "contact/index"), None);
    }
}
