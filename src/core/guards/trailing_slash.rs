//! Trailing slash guard
//!
//! Redirects `/page/` to `/page`.

use super::{CanonicalGuard, GuardOutcome, Redirect, redirect_target};
use crate::core::route::Route;

pub struct TrailingSlashGuard {
    status: u16,
}

impl TrailingSlashGuard {
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

impl CanonicalGuard for TrailingSlashGuard {
    fn check(&self, route: &Route) -> GuardOutcome {
        let request = route.request();
        if request.is_empty() || !request.ends_with('/') {
            return GuardOutcome::Continue;
        }

        GuardOutcome::Redirect(Redirect::new(
            redirect_target(route, request.trim_end_matches('/')),
            self.status,
            self.name(),
        ))
    }

    fn name(&self) -> &'static str {
        "trailing_slash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::DefaultsConfig;

    fn route(uri: &str) -> Route {
        Route::from_request("get", uri, "https://example.com/", &DefaultsConfig::default())
    }

    #[test]
    fn strips_trailing_slashes() {
        let guard = TrailingSlashGuard::new(308);
        assert_eq!(
            guard.check(&route("/page/")),
            GuardOutcome::Redirect(Redirect::new(
                "https://example.com/page",
                308,
                "trailing_slash"
            ))
        );
    }

    #[test]
    fn site_root_is_not_redirected() {
        let guard = TrailingSlashGuard::new(301);
        assert_eq!(guard.check(&route("/")), GuardOutcome::Continue);
        assert_eq!(guard.check(&route("/page")), GuardOutcome::Continue);
    }
}
