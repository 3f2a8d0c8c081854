//! Guard chain that runs every enabled canonical URL guard in a fixed order

use tracing::{debug, warn};

use super::{
    CanonicalGuard, DoubleSlashGuard, GuardOutcome, IndexSuffixGuard, LowercaseGuard,
    TrailingSlashGuard,
};
use crate::{config::GuardsConfig, core::route::Route, metrics};

/// Ordered list of guards; the first redirect wins.
pub struct GuardChain {
    guards: Vec<Box<dyn CanonicalGuard>>,
}

impl GuardChain {
    /// Build the chain from configuration.
    ///
    /// Order: duplicate slashes, index suffix, trailing slash, uppercase.
    pub fn from_config(config: &GuardsConfig) -> Self {
        let status = config.status_code;
        let mut guards: Vec<Box<dyn CanonicalGuard>> = Vec::new();

        if config.double_slash {
            guards.push(Box::new(DoubleSlashGuard::new(status)));
        }
        if config.index_suffix {
            guards.push(Box::new(IndexSuffixGuard::new(status)));
        }
        if config.trailing_slash {
            guards.push(Box::new(TrailingSlashGuard::new(status)));
        }
        if config.lowercase {
            guards.push(Box::new(LowercaseGuard::new(status)));
        }

        Self { guards }
    }

    /// Chain with caller-supplied guards, run in the given order.
    pub fn with_guards(guards: Vec<Box<dyn CanonicalGuard>>) -> Self {
        Self { guards }
    }

    /// Run guards in order until one redirects.
    pub fn run(&self, route: &Route) -> GuardOutcome {
        for guard in &self.guards {
            if let GuardOutcome::Redirect(redirect) = guard.check(route) {
                warn!(
                    guard = guard.name(),
                    request = route.request(),
                    location = %redirect.location,
                    status = redirect.status,
                    "Canonical URL redirect"
                );
                metrics::increment_redirect_total(guard.name(), redirect.status);
                return GuardOutcome::Redirect(redirect);
            }
        }

        debug!(request = route.request(), "Request passed canonical URL guards");
        GuardOutcome::Continue
    }

    /// Names of the enabled guards, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::DefaultsConfig;

    fn route(uri: &str) -> Route {
        Route::from_request("get", uri, "https://example.com/", &DefaultsConfig::default())
    }

    fn redirect_guard(outcome: GuardOutcome) -> Option<&'static str> {
        match outcome {
            GuardOutcome::Redirect(redirect) => Some(redirect.guard),
            GuardOutcome::Continue => None,
        }
    }

    #[test]
    fn default_chain_order() {
        let chain = GuardChain::from_config(&GuardsConfig::default());
        assert_eq!(
            chain.names(),
            vec!["double_slash", "index_suffix", "trailing_slash", "lowercase"]
        );
    }

    #[test]
    fn earlier_guard_wins() {
        let chain = GuardChain::from_config(&GuardsConfig::default());
        // Triggers double slash, trailing slash and uppercase at once.
        assert_eq!(redirect_guard(chain.run(&route("/A//b/"))), Some("double_slash"));
        // Trailing slash before uppercase.
        assert_eq!(redirect_guard(chain.run(&route("/About/"))), Some("trailing_slash"));
        assert_eq!(redirect_guard(chain.run(&route("/about"))), None);
    }

    #[test]
    fn disabled_guards_are_skipped() {
        let config = GuardsConfig {
            lowercase: false,
            ..GuardsConfig::default()
        };
        let chain = GuardChain::from_config(&config);
        assert_eq!(chain.run(&route("/About")), GuardOutcome::Continue);
    }
}
