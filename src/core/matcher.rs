//! Multi-strategy rule matcher.
//!
//! Rules are scanned in registration order and the first match wins. Within one
//! rule the strategies are tried in a fixed order: exact module, literal
//! segments, token placeholders, regex captures.
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::core::{
    route::Route,
    rule::{Field, HttpMethod, PatternKind, Rule, SlotValues},
    table::RoutingTable,
};

/// Strategy that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Exact,
    Literal,
    Token,
    Regex,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Literal => "literal",
            Strategy::Token => "token",
            Strategy::Regex => "regex",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Winning rule together with the handler path it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRule {
    pub rule: String,
    pub strategy: Strategy,
    pub handler: String,
}

pub struct Matcher;

impl Matcher {
    /// First rule in `table` that matches `route`, or `None`.
    pub fn find(table: &RoutingTable, method: HttpMethod, route: &Route) -> Option<MatchedRule> {
        let found = table
            .rules(method)
            .iter()
            .find_map(|rule| Self::match_rule(rule, route));

        if let Some(matched) = &found {
            debug!(
                rule = %matched.rule,
                strategy = %matched.strategy,
                handler = %matched.handler,
                "Rule matched"
            );
        }
        found
    }

    /// Try every strategy a single rule is eligible for.
    pub fn match_rule(rule: &Rule, route: &Route) -> Option<MatchedRule> {
        let module = route.module();
        let template = rule.handler();

        let matched = |strategy, handler| MatchedRule {
            rule: rule.name().to_string(),
            strategy,
            handler,
        };

        if rule.name() == module {
            return Some(matched(Strategy::Exact, template.as_str().to_string()));
        }

        match rule.pattern().kind() {
            PatternKind::Exact => None,
            PatternKind::Literal { segments } => {
                if template.module() != module {
                    return None;
                }
                let values = Self::positional_values(segments, |_, segment| segment);
                Some(matched(Strategy::Literal, template.fill_positional(&values)))
            }
            PatternKind::Token { segments } => {
                if segments.first().map(String::as_str) != Some(module) {
                    return None;
                }
                let values = Self::positional_values(segments, |field, _| route.field(field));
                Some(matched(Strategy::Token, template.fill_slots(&values)))
            }
            PatternKind::Regex(regex) => {
                let captures = regex.captures(module)?;
                let mut values = SlotValues::new();
                for field in Field::ALL {
                    if let Some(capture) = captures.name(field.name()) {
                        values.set(field, capture.as_str());
                    }
                }
                Some(matched(Strategy::Regex, template.fill_positional(&values)))
            }
        }
    }

    /// Values for every field whose position exists among the pattern segments.
    fn positional_values<'a, F>(segments: &'a [String], mut value: F) -> SlotValues
    where
        F: FnMut(Field, &'a str) -> &'a str,
    {
        let mut values = SlotValues::new();
        for field in Field::ALL {
            if let Some(segment) = segments.get(field.position()) {
                values.set(field, value(field, segment));
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::{RouteMap, RuleEntry, RuleSpec};

    const BASE: &str = "https://example.com/";

    fn build(routes: &[(&str, RuleEntry)]) -> RoutingTable {
        let map: RouteMap = routes.iter().cloned().collect();
        RoutingTable::register_routes(&map).unwrap()
    }

    fn route(module: &str, controller: &str, action: &str) -> Route {
        Route::builder("get", BASE)
            .module(module)
            .controller(controller)
            .action(action)
            .build()
    }

    #[test]
    fn exact_module_uses_template_verbatim() {
        let table = build(&[("about", RuleSpec::new("get", "about", "index").into())]);
        let matched = Matcher::find(&table, HttpMethod::Get, &route("about", "", "")).unwrap();
        assert_eq!(matched.strategy, Strategy::Exact);
        assert_eq!(matched.handler, "about/index");
        assert_eq!(matched.rule, "about");
    }

    #[test]
    fn literal_pattern_values_replace_template_segments() {
        let table = build(&[("login/attempt", "get@login::attempt".into())]);
        let matched = Matcher::find(&table, HttpMethod::Get, &route("login", "", "")).unwrap();
        assert_eq!(matched.strategy, Strategy::Literal);
        assert_eq!(matched.handler, "login/attempt");
    }

    #[test]
    fn literal_pattern_supplies_values_for_template_shape() {
        let table = build(&[("docs/intro/setup", "get@docs::page/1".into())]);
        let matched = Matcher::find(&table, HttpMethod::Get, &route("docs", "", "")).unwrap();
        assert_eq!(matched.handler, "docs/intro/setup");

        // Template positions the pattern lacks are left empty.
        let table = build(&[(
            "blog/archive",
            RuleSpec::new("get", "blog", "post").action("view").into(),
        )]);
        let matched = Matcher::find(&table, HttpMethod::Get, &route("blog", "", "")).unwrap();
        assert_eq!(matched.handler, "blog/archive/");

        // The template's first segment must be the request module.
        let table = build(&[("guide/intro", "get@docs::page".into())]);
        assert!(Matcher::find(&table, HttpMethod::Get, &route("guide", "", "")).is_none());
    }

    #[test]
    fn token_pattern_fills_from_route() {
        let table = build(&[("shop/:controller/:action", "get@shop::1/2".into())]);
        let matched =
            Matcher::find(&table, HttpMethod::Get, &route("shop", "widgets", "view")).unwrap();
        assert_eq!(matched.strategy, Strategy::Token);
        assert_eq!(matched.handler, "shop/widgets/view");
    }

    #[test]
    fn token_fill_requires_pattern_segment() {
        // Pattern has no action position, so the action slot stays unfilled.
        let table = build(&[("shop/:controller", "get@shop::1/2".into())]);
        let matched =
            Matcher::find(&table, HttpMethod::Get, &route("shop", "widgets", "view")).unwrap();
        assert_eq!(matched.handler, "shop/widgets");
    }

    #[test]
    fn named_placeholders_fill_like_digits() {
        let table = build(&[("shop/:controller/:action", "get@shop:::controller/:action".into())]);
        let matched =
            Matcher::find(&table, HttpMethod::Get, &route("shop", "cart", "add")).unwrap();
        assert_eq!(matched.handler, "shop/cart/add");
    }

    #[test]
    fn regex_captures_fill_positions() {
        let table = build(&[(
            "(?P<action>[a-z]+)-php-(?P<controller>[a-z]+)",
            "get@php::2/1".into(),
        )]);
        let matched = Matcher::find(
            &table,
            HttpMethod::Get,
            &route("framework-php-widgets", "", ""),
        )
        .unwrap();
        assert_eq!(matched.strategy, Strategy::Regex);
        assert_eq!(matched.handler, "php/widgets/framework");
    }

    #[test]
    fn regex_missing_capture_leaves_position_empty() {
        let table = build(&[("(?P<controller>[a-z]+)-docs", "get@docs::page/intro".into())]);
        let matched =
            Matcher::find(&table, HttpMethod::Get, &route("rust-docs", "", "")).unwrap();
        assert_eq!(matched.strategy, Strategy::Regex);
        assert_eq!(matched.handler, "docs/rust/");
    }

    #[test]
    fn regex_shorthand_matches() {
        let table = build(&[("<:action>-php-<:controller>", "get@php::2/1".into())]);
        let matched =
            Matcher::find(&table, HttpMethod::Get, &route("orm-php-models", "", "")).unwrap();
        assert_eq!(matched.handler, "php/models/orm");
    }

    #[test]
    fn first_registered_rule_wins() {
        let table = build(&[
            ("shop", "get@shop::first".into()),
            ("shop/:controller", "get@shop::second".into()),
        ]);
        let matched = Matcher::find(&table, HttpMethod::Get, &route("shop", "cart", "")).unwrap();
        assert_eq!(matched.handler, "shop/first");
    }

    #[test]
    fn method_partitions_are_independent() {
        let table = build(&[("login", "post@login::attempt".into())]);
        assert!(Matcher::find(&table, HttpMethod::Get, &route("login", "", "")).is_none());
        assert!(Matcher::find(&table, HttpMethod::Post, &route("login", "", "")).is_some());
    }

    #[test]
    fn no_rule_matches() {
        let table = build(&[("about", "get@about::index".into())]);
        assert!(Matcher::find(&table, HttpMethod::Get, &route("contact", "", "")).is_none());
    }
}
