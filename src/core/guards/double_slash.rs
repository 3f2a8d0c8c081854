//! Duplicate slash guard
//!
//! Redirects `/git///sentry////account` to `/git/sentry/account`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CanonicalGuard, GuardOutcome, Redirect, redirect_target};
use crate::core::route::Route;

static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"/{2,}").expect("valid regex"));

pub struct DoubleSlashGuard {
    status: u16,
}

impl DoubleSlashGuard {
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

impl CanonicalGuard for DoubleSlashGuard {
    fn check(&self, route: &Route) -> GuardOutcome {
        // The query string may legitimately carry "//" (e.g. an embedded URL).
        let path = route.uri().split(['?', '#']).next().unwrap_or_default();
        if !REPEATED_SLASHES.is_match(path) {
            return GuardOutcome::Continue;
        }

        let collapsed = REPEATED_SLASHES.replace_all(route.request(), "/");
        GuardOutcome::Redirect(Redirect::new(
            redirect_target(route, &collapsed),
            self.status,
            self.name(),
        ))
    }

    fn name(&self) -> &'static str {
        "double_slash"
    }
}
