//! Switchyard - a request router with canonical URL guards.
//!
//! Switchyard resolves an inbound request path into a handler reference
//! (module / controller / action / param) and enforces canonical-URL policies
//! before dispatch. It follows a **hexagonal architecture**: the routing engine
//! in `core` is pure and synchronous, the seams it depends on are traits in
//! `ports`, and `adapters` provides the config-backed implementations.
//!
//! # Features
//! - Ordered rule table per request method, first match wins
//! - Four matching strategies: exact module, literal segments, `/:token`
//!   placeholders and regex captures
//! - Typed handler placeholders (`1`..`4` or `:controller` style) filled from
//!   the request or from regex captures
//! - Canonical URL guards (duplicate slashes, `index` suffixes, trailing
//!   slashes, uppercase) returned as redirect values, never as process exits
//! - Controller resolution through a naming convention and an injected
//!   [`ControllerRegistry`](ports::ControllerRegistry)
//! - File configuration (TOML / YAML / JSON / INI) with validation and hot reload
//! - Metrics via the `metrics` facade and structured logging via `tracing`
//!
//! # Quick Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use switchyard::{Dispatch, Router, StaticControllerRegistry, config::RouterConfig};
//!
//! # fn main() -> eyre::Result<()> {
//! let config = RouterConfig::builder()
//!     .http_path("https://example.com/")
//!     .route("about", "get@about::index")
//!     .controller("App\\Controller\\About\\IndexController")
//!     .build()
//!     .map_err(|e| eyre::eyre!(e))?;
//!
//! let registry = Arc::new(StaticControllerRegistry::from_config(&config));
//! let router = Router::new(&config, registry)?;
//!
//! let route = router.route("GET", "/about");
//! match router.dispatch(&route)? {
//!     Dispatch::Redirect(redirect) => println!("{} {}", redirect.status, redirect.location),
//!     Dispatch::Handler(component) => println!("{}::{}", component.controller_ref, component.action_ref),
//! }
//! # Ok(()) }
//! ```
//!
//! # Error Handling
//! Routing APIs return [`RouterResult`] with a typed [`RouterError`]; use
//! [`RouterError::status_code`] to pick the response. Configuration loading
//! returns `eyre::Result` with `WrapErr` context attached.
pub mod config;
pub mod metrics;
pub mod ports;
pub mod tracing_setup;

pub mod adapters;
pub mod core;

// Re-export the specific types needed by the binary crate and embedders
pub use crate::{
    adapters::{FileConfigProvider, StaticControllerRegistry},
    core::{
        Component, Dispatch, Redirect, Route, Router, RouterError, RouterResult, RoutingTable,
    },
    ports::{ConfigProvider, ControllerRegistry},
};
