//! Lightweight metrics helpers for Switchyard.
//!
//! Convenience functions and an RAII timer wrapping the `metrics` crate macros.
//! No exporter is bundled; the host installs any compatible recorder and these
//! calls report into it.
//!
//! Provided metrics (labels vary by family):
//! * `switchyard_matches_total` (counter; method, strategy)
//! * `switchyard_redirects_total` (counter; guard, status)
//! * `switchyard_not_found_total` (counter; kind)
//! * `switchyard_dispatch_duration_seconds` (histogram; method)
//! * `switchyard_registered_rules` (gauge per method)
use std::{collections::HashMap, sync::Mutex, time::Instant};

use metrics::{
    Unit, counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use once_cell::sync::Lazy;

pub const SWITCHYARD_MATCHES_TOTAL: &str = "switchyard_matches_total";
pub const SWITCHYARD_REDIRECTS_TOTAL: &str = "switchyard_redirects_total";
pub const SWITCHYARD_NOT_FOUND_TOTAL: &str = "switchyard_not_found_total";
pub const SWITCHYARD_DISPATCH_DURATION_SECONDS: &str = "switchyard_dispatch_duration_seconds";
pub const SWITCHYARD_REGISTERED_RULES: &str = "switchyard_registered_rules";

/// Last reported rule count per method
pub static REGISTERED_RULES: Lazy<Mutex<HashMap<String, usize>>> = Lazy::new(|| {
    describe_counter!(
        SWITCHYARD_MATCHES_TOTAL,
        Unit::Count,
        "Requests resolved to a handler, by method and matching strategy."
    );
    describe_counter!(
        SWITCHYARD_REDIRECTS_TOTAL,
        Unit::Count,
        "Requests short-circuited by a canonical URL guard."
    );
    describe_counter!(
        SWITCHYARD_NOT_FOUND_TOTAL,
        Unit::Count,
        "Requests that matched no rule or resolved to no controller."
    );
    describe_histogram!(
        SWITCHYARD_DISPATCH_DURATION_SECONDS,
        Unit::Seconds,
        "Time spent in guards, matching and component resolution."
    );
    describe_gauge!(
        SWITCHYARD_REGISTERED_RULES,
        "Number of rules in the routing table for each method."
    );

    Mutex::new(HashMap::new())
});

pub fn increment_match_total(method: &str, strategy: &str) {
    counter!(
        SWITCHYARD_MATCHES_TOTAL,
        "method" => method.to_string(),
        "strategy" => strategy.to_string()
    )
    .increment(1);
}

/// Count a guard redirect.
pub fn increment_redirect_total(guard: &str, status: u16) {
    counter!(
        SWITCHYARD_REDIRECTS_TOTAL,
        "guard" => guard.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Count a not-found outcome; `kind` is the error kind label.
pub fn increment_not_found_total(kind: &str) {
    counter!(SWITCHYARD_NOT_FOUND_TOTAL, "kind" => kind.to_string()).increment(1);
}

pub fn record_dispatch_duration(method: &str, duration: std::time::Duration) {
    histogram!(
        SWITCHYARD_DISPATCH_DURATION_SECONDS,
        "method" => method.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Set (and record) the registered rule gauge for a method.
pub fn set_registered_rules(method: &str, count: usize) {
    if let Ok(mut rules) = REGISTERED_RULES.lock() {
        rules.insert(method.to_string(), count);
    } else {
        tracing::error!("Failed to acquire lock for registered rule gauges");
        return;
    }

    gauge!(SWITCHYARD_REGISTERED_RULES, "method" => method.to_string()).set(count as f64);
}

/// Snapshot of the registered rule gauges.
pub fn registered_rules() -> HashMap<String, usize> {
    REGISTERED_RULES
        .lock()
        .map(|rules| rules.clone())
        .unwrap_or_default()
}

/// RAII helper measuring one dispatch.
pub struct DispatchTimer {
    start: Instant,
    method: String,
}

impl DispatchTimer {
    pub fn new(method: &str) -> Self {
        Self {
            start: Instant::now(),
            method: method.to_string(),
        }
    }
}

impl Drop for DispatchTimer {
    fn drop(&mut self) {
        record_dispatch_duration(&self.method, self.start.elapsed());
    }
}

/// Initialize metric descriptions (idempotent).
pub fn init_metrics() -> eyre::Result<()> {
    tracing::info!("Initializing Switchyard metrics");

    Lazy::force(&REGISTERED_RULES);

    tracing::info!("Switchyard metrics initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_registered_rules() {
        set_registered_rules("test-method", 3);
        assert_eq!(registered_rules().get("test-method"), Some(&3));

        set_registered_rules("test-method", 5);
        assert_eq!(registered_rules().get("test-method"), Some(&5));
    }

    #[test]
    fn test_dispatch_timer() {
        let timer = DispatchTimer::new("get");
        // Records on drop
        drop(timer);
    }

    #[test]
    fn test_counters_without_recorder() {
        increment_match_total("get", "exact");
        increment_redirect_total("lowercase", 301);
        increment_not_found_total("no_match");
    }

    #[test]
    fn test_init_metrics() {
        assert!(init_metrics().is_ok());
    }
}
