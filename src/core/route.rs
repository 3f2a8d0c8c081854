//! Parsed inbound request.
//!
//! A [`Route`] carries every input the guards and matcher read. Nothing in the
//! routing core looks at process environment; the host builds a `Route` per
//! request and hands it over.
use serde::Serialize;

use crate::{config::models::DefaultsConfig, core::rule::Field};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    method: String,
    module: String,
    controller: String,
    action: String,
    param: String,
    arg: String,
    /// Request path without leading slashes, query or fragment
    request: String,
    /// Raw request URI as received
    uri: String,
    /// Original path recorded by a front-controller rewrite, if any
    redirect_url: Option<String>,
    /// Canonical absolute base URL, trailing slash included
    http_path: String,
}

impl Route {
    pub fn builder(method: impl Into<String>, http_path: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(method, http_path)
    }

    /// Split a raw request URI into module/controller/action/param/arg.
    ///
    /// The site root maps to the default module, controller and action. Any other
    /// path leaves the segments it does not carry empty.
    pub fn from_request(
        method: &str,
        uri: &str,
        http_path: &str,
        defaults: &DefaultsConfig,
    ) -> Self {
        let path = uri.split(['?', '#']).next().unwrap_or_default();
        let request = path.trim_start_matches('/');
        let segments: Vec<&str> = request.split('/').filter(|s| !s.is_empty()).collect();

        let builder = Route::builder(method, http_path)
            .uri(uri)
            .request(request);

        let builder = if segments.is_empty() {
            builder
                .module(&defaults.module)
                .controller(&defaults.controller)
                .action(&defaults.action)
        } else {
            let segment = |i: usize| segments.get(i).copied().unwrap_or_default();
            builder
                .module(segment(0))
                .controller(segment(1))
                .action(segment(2))
                .param(segment(3))
                .arg(segment(4))
        };

        builder.build()
    }

    /// Lower-cased request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn arg(&self) -> &str {
        &self.arg
    }

    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Query string without the leading `?`, if the request carried a non-empty one.
    pub fn query(&self) -> Option<&str> {
        let (_, rest) = self.uri.split_once('?')?;
        let query = rest.split('#').next().unwrap_or_default();
        (!query.is_empty()).then_some(query)
    }

    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    pub fn http_path(&self) -> &str {
        &self.http_path
    }

    /// Value of the request segment a placeholder field stands for.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Controller => &self.controller,
            Field::Action => &self.action,
            Field::Param => &self.param,
            Field::Arg => &self.arg,
        }
    }
}

/// Builder for [`Route`].
///
/// When no request path is given it is derived from the non-empty segments, and
/// the raw URI defaults to `/` followed by the request path.
pub struct RouteBuilder {
    method: String,
    http_path: String,
    module: String,
    controller: String,
    action: String,
    param: String,
    arg: String,
    request: Option<String>,
    uri: Option<String>,
    redirect_url: Option<String>,
}

impl RouteBuilder {
    fn new(method: impl Into<String>, http_path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            http_path: http_path.into(),
            module: String::new(),
            controller: String::new(),
            action: String::new(),
            param: String::new(),
            arg: String::new(),
            request: None,
            uri: None,
            redirect_url: None,
        }
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = controller.into();
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = arg.into();
        self
    }

    pub fn request(mut self, request: impl Into<String>) -> Self {
        self.request = Some(request.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
        self.redirect_url = Some(redirect_url.into());
        self
    }

    pub fn build(self) -> Route {
        let request = self.request.unwrap_or_else(|| {
            [
                &self.module,
                &self.controller,
                &self.action,
                &self.param,
                &self.arg,
            ]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("/")
        });
        let uri = self.uri.unwrap_or_else(|| format!("/{request}"));

        Route {
            method: self.method.to_lowercase(),
            module: self.module,
            controller: self.controller,
            action: self.action,
            param: self.param,
            arg: self.arg,
            request,
            uri,
            redirect_url: self.redirect_url,
            http_path: self.http_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/";

    #[test]
    fn root_request_maps_to_defaults() {
        let route = Route::from_request("GET", "/", BASE, &DefaultsConfig::default());
        assert_eq!(route.method(), "get");
        assert_eq!(route.module(), "home");
        assert_eq!(route.controller(), "index");
        assert_eq!(route.action(), "index");
        assert_eq!(route.request(), "");
    }

    #[test]
    fn segments_fill_in_order_and_query_is_dropped() {
        let route = Route::from_request(
            "get",
            "/bridge/firewall/ip/edit/1?tab=rules#top",
            BASE,
            &DefaultsConfig::default(),
        );
        assert_eq!(route.module(), "bridge");
        assert_eq!(route.controller(), "firewall");
        assert_eq!(route.action(), "ip");
        assert_eq!(route.param(), "edit");
        assert_eq!(route.arg(), "1");
        assert_eq!(route.request(), "bridge/firewall/ip/edit/1");
        assert_eq!(route.uri(), "/bridge/firewall/ip/edit/1?tab=rules#top");
    }

    #[test]
    fn single_segment_leaves_rest_unset() {
        let route = Route::from_request("get", "/about", BASE, &DefaultsConfig::default());
        assert_eq!(route.module(), "about");
        assert!(route.controller().is_empty());
        assert!(route.action().is_empty());
    }

    #[test]
    fn builder_derives_request_and_uri() {
        let route = Route::builder("POST", BASE)
            .module("shop")
            .controller("widgets")
            .action("view")
            .build();
        assert_eq!(route.method(), "post");
        assert_eq!(route.request(), "shop/widgets/view");
        assert_eq!(route.uri(), "/shop/widgets/view");
        assert_eq!(route.field(Field::Action), "view");
        assert_eq!(route.redirect_url(), None);
    }
}
