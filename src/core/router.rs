//! Request routing pipeline.
//!
//! The `Router` owns an immutable routing table, the guard chain and the
//! component resolver. Per request it runs the guards (which may short-circuit
//! with a redirect), checks the default-route shortcut, scans the table and
//! resolves the winning handler into a [`Component`].
//!
//! Nothing here performs I/O or suspends, so one `Router` can be shared across
//! workers behind an `Arc` and swapped wholesale on configuration reload.
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::models::{DefaultsConfig, RouterConfig},
    core::{
        error::{RouterError, RouterResult},
        guards::{GuardChain, GuardOutcome, Redirect},
        matcher::Matcher,
        resolver::{Component, ComponentResolver},
        route::Route,
        rule::HttpMethod,
        table::RoutingTable,
    },
    metrics,
    ports::controller_registry::ControllerRegistry,
};

/// Outcome of a full dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Dispatch {
    /// A guard terminated the request; the host emits the redirect
    Redirect(Redirect),
    /// The request resolved to a controller
    Handler(Component),
}

pub struct Router {
    table: RoutingTable,
    guards: GuardChain,
    resolver: ComponentResolver,
    defaults: DefaultsConfig,
    http_path: String,
}

impl Router {
    /// Build a router from configuration.
    ///
    /// Registers every route eagerly, so configuration errors surface here and
    /// never during request handling.
    pub fn new(config: &RouterConfig, registry: Arc<dyn ControllerRegistry>) -> RouterResult<Self> {
        let table = RoutingTable::register_routes(&config.routes)?;
        for method in HttpMethod::ALL {
            metrics::set_registered_rules(method.as_str(), table.rules(method).len());
        }

        let guards = GuardChain::from_config(&config.guards);
        info!(
            rules = table.len(),
            guards = ?guards.names(),
            http_path = %config.http_path,
            "Router initialized"
        );

        Ok(Self {
            table,
            guards,
            resolver: ComponentResolver::new(
                registry,
                config.naming.clone(),
                config.defaults.clone(),
            ),
            defaults: config.defaults.clone(),
            http_path: config.http_path.clone(),
        })
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn guards(&self) -> &GuardChain {
        &self.guards
    }

    pub fn resolver(&self) -> &ComponentResolver {
        &self.resolver
    }

    pub fn http_path(&self) -> &str {
        &self.http_path
    }

    /// Parse a raw request URI against this router's base URL and defaults.
    pub fn route(&self, method: &str, uri: &str) -> Route {
        Route::from_request(method, uri, &self.http_path, &self.defaults)
    }

    pub fn check_guards(&self, route: &Route) -> GuardOutcome {
        self.guards.run(route)
    }

    /// Resolve a route to a component without running guards.
    pub fn match_route(&self, route: &Route) -> RouterResult<Component> {
        let result = self.match_inner(route);
        if let Err(e) = &result
            && e.is_not_found()
        {
            debug!(error = %e, request = route.request(), "Route not found");
            metrics::increment_not_found_total(e.kind());
        }
        result
    }

    fn match_inner(&self, route: &Route) -> RouterResult<Component> {
        if route.controller() == self.defaults.controller && route.action() == self.defaults.action
        {
            debug!(request = route.request(), "Default route shortcut");
            let component = self.resolver.resolve(route, "")?;
            metrics::increment_match_total(route.method(), "default");
            return Ok(component);
        }

        let no_match = || RouterError::NoMatch {
            method: route.method().to_string(),
            request: route.request().to_string(),
        };

        let method: HttpMethod = route.method().parse().map_err(|_| no_match())?;
        let matched = Matcher::find(&self.table, method, route).ok_or_else(no_match)?;

        let component = self.resolver.resolve(route, &matched.handler)?;
        metrics::increment_match_total(method.as_str(), matched.strategy.as_str());
        Ok(component)
    }

    /// Guards first, then matching and resolution.
    pub fn dispatch(&self, route: &Route) -> RouterResult<Dispatch> {
        let _timer = metrics::DispatchTimer::new(route.method());

        if let GuardOutcome::Redirect(redirect) = self.check_guards(route) {
            return Ok(Dispatch::Redirect(redirect));
        }
        self.match_route(route).map(Dispatch::Handler)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::models::GuardsConfig;

    fn router(known: &[&str]) -> Router {
        let config = RouterConfig::builder()
            .http_path("https://example.com/")
            .route("about", "get@about::index")
            .route("shop/:controller/:action", "get@shop::1/2")
            .route("login", "post@login::attempt")
            .build()
            .unwrap();
        let known: HashSet<String> = known.iter().map(|s| s.to_string()).collect();
        Router::new(&config, Arc::new(move |c: &str| known.contains(c))).unwrap()
    }

    #[test]
    fn root_uses_default_handler() {
        let router = router(&["App\\Controller\\Home\\IndexController"]);
        let route = router.route("GET", "/");
        let component = router.match_route(&route).unwrap();
        assert_eq!(component.handler, "home/index");
        assert_eq!(component.action_ref, "indexAction");
    }

    #[test]
    fn exact_rule_resolves() {
        let router = router(&["App\\Controller\\About\\IndexController"]);
        let component = router.match_route(&router.route("get", "/about")).unwrap();
        assert_eq!(component.module, "about");
        assert_eq!(component.controller, "index");
        assert_eq!(component.action, "index");
    }

    #[test]
    fn unknown_request_is_no_match() {
        let router = router(&[]);
        let err = router
            .match_route(&router.route("get", "/missing"))
            .unwrap_err();
        assert!(matches!(err, RouterError::NoMatch { .. }));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn unsupported_method_is_no_match() {
        let router = router(&[]);
        let err = router
            .match_route(&router.route("delete", "/about"))
            .unwrap_err();
        assert!(matches!(err, RouterError::NoMatch { .. }));
    }

    #[test]
    fn dispatch_redirects_before_matching() {
        let router = router(&[]);
        let dispatch = router.dispatch(&router.route("get", "/About")).unwrap();
        match dispatch {
            Dispatch::Redirect(redirect) => {
                assert_eq!(redirect.location, "https://example.com/about");
                assert_eq!(redirect.status, 301);
                assert_eq!(redirect.guard, "lowercase");
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn dispatch_resolves_token_rule() {
        let router = router(&["App\\Controller\\Shop\\Widgets\\ViewController"]);
        let dispatch = router
            .dispatch(&router.route("get", "/shop/widgets/view"))
            .unwrap();
        let Dispatch::Handler(component) = dispatch else {
            panic!("expected handler");
        };
        assert_eq!(component.handler, "shop/widgets/view");
        assert_eq!(
            component.controller_ref,
            "App\\Controller\\Shop\\Widgets\\ViewController"
        );
    }

    #[test]
    fn disabled_guards_do_not_redirect() {
        let config = RouterConfig::builder()
            .http_path("https://example.com/")
            .guards(GuardsConfig {
                lowercase: false,
                ..GuardsConfig::default()
            })
            .route("about", "get@about::index")
            .build()
            .unwrap();
        let router = Router::new(&config, Arc::new(|_: &str| true)).unwrap();
        let outcome = router.check_guards(&router.route("get", "/About"));
        assert!(!outcome.is_redirect());
    }
}
