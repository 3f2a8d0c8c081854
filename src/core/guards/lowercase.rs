//! Uppercase guard
//!
//! Redirects any request path containing an uppercase letter to its lowercase
//! form on the same host. The query string is carried over unchanged.

use super::{CanonicalGuard, GuardOutcome, Redirect, redirect_target};
use crate::core::route::Route;

pub struct LowercaseGuard {
    status: u16,
}

impl LowercaseGuard {
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

impl CanonicalGuard for LowercaseGuard {
    fn check(&self, route: &Route) -> GuardOutcome {
        // Some uppercase characters have no lowercase form; only fire when
        // lowercasing actually changes the path.
        let request = route.request();
        let lowered = request.to_lowercase();
        if lowered == request {
            return GuardOutcome::Continue;
        }

        GuardOutcome::Redirect(Redirect::new(
            redirect_target(route, &lowered),
            self.status,
            self.name(),
        ))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
