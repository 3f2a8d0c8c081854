//! Canonical URL guards.
//!
//! Each guard inspects a [`Route`] before matching and may short-circuit the
//! request with a permanent redirect to its canonical form:
//! - duplicate slashes
//! - `index` suffixes and direct front-controller access
//! - trailing slashes
//! - uppercase letters
//!
//! A guard never produces a location that would trigger itself again.

pub mod chain;
pub mod double_slash;
pub mod index_suffix;
pub mod lowercase;
pub mod trailing_slash;

pub use chain::GuardChain;
pub use double_slash::DoubleSlashGuard;
pub use index_suffix::IndexSuffixGuard;
pub use lowercase::LowercaseGuard;
use serde::Serialize;
pub use trailing_slash::TrailingSlashGuard;

use crate::core::route::Route;

/// Redirect emitted by a guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Absolute `Location` header value
    pub location: String,
    /// HTTP status code (301 unless configured otherwise)
    pub status: u16,
    /// Name of the guard that issued the redirect
    pub guard: &'static str,
}

impl Redirect {
    pub fn new(location: impl Into<String>, status: u16, guard: &'static str) -> Self {
        Self {
            location: location.into(),
            status,
            guard,
        }
    }
}

/// Result of running a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Request is canonical as far as this guard is concerned
    Continue,
    /// Request must be answered with a redirect and not processed further
    Redirect(Redirect),
}

impl GuardOutcome {
    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardOutcome::Redirect(_))
    }
}

/// Canonicalization check run before route matching.
pub trait CanonicalGuard: Send + Sync {
    /// Inspect a route and decide whether it must be redirected.
    fn check(&self, route: &Route) -> GuardOutcome;

    /// Get the name of this guard
    fn name(&self) -> &'static str;
}

/// Join the canonical base URL and a request path with exactly one slash.
pub fn canonical_location(http_path: &str, path: &str) -> String {
    let base = http_path.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Redirect target for `path` on the route's canonical host, keeping the
/// request's query string.
pub fn redirect_target(route: &Route, path: &str) -> String {
    let location = canonical_location(route.http_path(), path);
    match route.query() {
        Some(query) => format!("{location}?{query}"),
        None => location,
    }
}
