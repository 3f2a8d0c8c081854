//! Index suffix guard
//!
//! `index` is never a public last segment: `/index` redirects to the site root,
//! `/contact/index` to `/contact`, and direct front-controller access
//! (`/index.php`) to the site root.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CanonicalGuard, GuardOutcome, Redirect, redirect_target};
use crate::core::route::Route;

static INDEX_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(/index)+$").expect("valid regex"));
static FRONT_CONTROLLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/index\.php$").expect("valid regex"));

pub struct IndexSuffixGuard {
    status: u16,
}

impl IndexSuffixGuard {
    pub fn new(status: u16) -> Self {
        Self { status }
    }

    fn redirect(&self, location: String) -> GuardOutcome {
        GuardOutcome::Redirect(Redirect::new(location, self.status, self.name()))
    }
}

impl CanonicalGuard for IndexSuffixGuard {
    fn check(&self, route: &Route) -> GuardOutcome {
        let request = route.request();

        if request == "index" {
            return self.redirect(redirect_target(route, ""));
        }

        if INDEX_SUFFIX.is_match(request) {
            // Strip every trailing "/index" so the target cannot end in one again.
            let stripped = INDEX_SUFFIX.replace(request, "");
            if stripped.is_empty() || stripped.eq_ignore_ascii_case("index") {
                return self.redirect(redirect_target(route, ""));
            }
            return self.redirect(redirect_target(route, &stripped));
        }

        if let Some(source) = route.redirect_url()
            && FRONT_CONTROLLER.is_match(source.trim())
        {
            return self.redirect(redirect_target(route, ""));
        }

        GuardOutcome::Continue
    }

    fn name(&self) -> &'static str {
        "index_suffix"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::DefaultsConfig;

    const BASE: &str = "https://example.com/";

    fn route(uri: &str) -> Route {
        Route::from_request("get", uri, BASE, &DefaultsConfig::default())
    }

    fn location(outcome: GuardOutcome) -> Option<String> {
        match outcome {
            GuardOutcome::Redirect(redirect) => Some(redirect.location),
            GuardOutcome::Continue => None,
        }
    }

    #[test]
    fn bare_index_goes_to_site_root() {
        let guard = IndexSuffixGuard::new(301);
        assert_eq!(location(guard.check(&route("/index"))), Some(BASE.to_string()));
    }

    #[test]
    fn index_suffix_is_stripped() {
        let guard = IndexSuffixGuard::new(301);
        assert_eq!(
            location(guard.check(&route("/page/index"))),
            Some("https://example.com/page".to_string())
        );
        assert_eq!(
            location(guard.check(&route("/contact/INDEX"))),
            Some("https://example.com/contact".to_string())
        );
        assert_eq!(
            location(guard.check(&route("/a/index/index"))),
            Some("https://example.com/a".to_string())
        );
        assert_eq!(
            location(guard.check(&route("/index/index"))),
            Some(BASE.to_string())
        );
    }

    #[test]
    fn index_inside_a_segment_is_left_alone() {
        let guard = IndexSuffixGuard::new(301);
        assert_eq!(guard.check(&route("/reindex")), GuardOutcome::Continue);
        assert_eq!(guard.check(&route("/page/indexes")), GuardOutcome::Continue);
        assert_eq!(guard.check(&route("/index/page")), GuardOutcome::Continue);
    }

    #[test]
    fn front_controller_access_goes_to_site_root() {
        let guard = IndexSuffixGuard::new(301);
        let route = Route::builder("get", BASE)
            .module("home")
            .redirect_url("/index.php")
            .build();
        assert_eq!(location(guard.check(&route)), Some(BASE.to_string()));

        let route = Route::builder("get", BASE)
            .module("about")
            .redirect_url("/about")
            .build();
        assert_eq!(guard.check(&route), GuardOutcome::Continue);
    }
}
