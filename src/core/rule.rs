//! Rule compiler.
//!
//! Turns `routes` registrations into [`Rule`]s: the registration key becomes the
//! URL [`Pattern`] and the module/controller/action/param/arg fields are joined
//! into a [`HandlerTemplate`]. Patterns are classified and regexes compiled once,
//! here, so matching never has to parse configuration again.
use std::{fmt, str::FromStr};

use regex::Regex;
use serde::Serialize;

use crate::{
    config::models::{RuleEntry, RuleSpec},
    core::error::{RouterError, RouterResult},
};

/// Request methods a rule can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 2] = [HttpMethod::Get, HttpMethod::Post];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            other => Err(RouterError::Configuration(format!(
                "unsupported route method '{other}' (expected get or post)"
            ))),
        }
    }
}

/// Request fields that handler placeholders stand for, in positional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Controller,
    Action,
    Param,
    Arg,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Controller, Field::Action, Field::Param, Field::Arg];

    /// Segment position this field occupies after the module (1-based).
    pub fn position(self) -> usize {
        match self {
            Field::Controller => 1,
            Field::Action => 2,
            Field::Param => 3,
            Field::Arg => 4,
        }
    }

    pub fn from_position(position: usize) -> Option<Field> {
        Field::ALL.get(position.checked_sub(1)?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Controller => "controller",
            Field::Action => "action",
            Field::Param => "param",
            Field::Arg => "arg",
        }
    }

    /// Parse a whole template segment as a placeholder: `1`..`4` or `:controller` style.
    pub fn from_placeholder(segment: &str) -> Option<Field> {
        match segment {
            "1" | ":controller" => Some(Field::Controller),
            "2" | ":action" => Some(Field::Action),
            "3" | ":param" => Some(Field::Param),
            "4" | ":arg" => Some(Field::Arg),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self.position() - 1
    }
}

/// Values available to fill handler template positions.
///
/// Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotValues {
    values: [Option<String>; 4],
}

impl SlotValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        self.values[field.index()] = (!value.is_empty()).then_some(value);
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values[field.index()].as_deref()
    }
}

/// One handler template segment after the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Slot(Field),
}

/// Slash-joined handler path describing which segments a resolved path has.
///
/// The first segment is always the literal module; later segments are literals
/// or placeholders. Placeholders are recognised only as whole segments, so a
/// literal `v1` is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerTemplate {
    source: String,
    module: String,
    segments: Vec<Segment>,
}

impl HandlerTemplate {
    pub fn parse(source: &str) -> Self {
        let mut parts = source.split('/');
        let module = parts.next().unwrap_or_default().to_string();
        let segments = parts
            .map(|part| match Field::from_placeholder(part) {
                Some(field) => Segment::Slot(field),
                None => Segment::Literal(part.to_string()),
            })
            .collect();

        Self {
            source: source.to_string(),
            module,
            segments,
        }
    }

    /// The template exactly as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Overwrite the segment at each position 1..=4 with the value for the field
    /// of that position. The template only supplies the shape: a position with
    /// no value renders as an empty segment, which the resolver reads as the
    /// default.
    pub fn fill_positional(&self, values: &SlotValues) -> String {
        self.render(|position, _| {
            let value = Field::from_position(position).and_then(|field| values.get(field));
            Some(value.unwrap_or_default().to_string())
        })
    }

    /// Replace each placeholder with the value of the field it names.
    /// Literals are kept; unfilled placeholders are dropped.
    pub fn fill_slots(&self, values: &SlotValues) -> String {
        self.render(|_, segment| match segment {
            Segment::Literal(text) => Some(text.clone()),
            Segment::Slot(field) => values.get(*field).map(str::to_string),
        })
    }

    fn render<F>(&self, mut segment_value: F) -> String
    where
        F: FnMut(usize, &Segment) -> Option<String>,
    {
        let mut parts = vec![self.module.clone()];
        for (i, segment) in self.segments.iter().enumerate() {
            if let Some(value) = segment_value(i + 1, segment) {
                parts.push(value);
            }
        }
        parts.join("/")
    }
}

impl fmt::Display for HandlerTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Matching strategy a pattern is eligible for, besides the exact module test
/// every pattern gets first.
#[derive(Debug, Clone)]
pub enum PatternKind {
    /// No `/`, `:` or `<`: only the exact module test applies
    Exact,
    /// Contains `/` and no token or regex marker
    Literal { segments: Vec<String> },
    /// Contains a `/:` marker
    Token { segments: Vec<String> },
    /// Contains `<`; applied to the request module
    Regex(Regex),
}

/// A registered URL pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    kind: PatternKind,
}

impl Pattern {
    pub fn compile(source: &str) -> RouterResult<Self> {
        let kind = if source.contains('/') && !source.contains(':') && !source.contains('<') {
            PatternKind::Literal {
                segments: source.split('/').map(str::to_string).collect(),
            }
        } else if source.contains("/:") {
            PatternKind::Token {
                segments: source.split('/').map(str::to_string).collect(),
            }
        } else if source.contains('<') {
            let expanded = expand_regex_tokens(source);
            let regex = Regex::new(&expanded).map_err(|e| RouterError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })?;
            PatternKind::Regex(regex)
        } else {
            PatternKind::Exact
        };

        Ok(Self {
            source: source.to_string(),
            kind,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }
}

/// Expand `<:controller>`-style shorthand into named capture groups.
pub fn expand_regex_tokens(pattern: &str) -> String {
    Field::ALL.iter().fold(pattern.to_string(), |acc, field| {
        acc.replace(
            &format!("<:{}>", field.name()),
            &format!("(?P<{}>[a-z]+)", field.name()),
        )
    })
}

/// A compiled routing rule.
#[derive(Debug, Clone)]
pub struct Rule {
    method: HttpMethod,
    pattern: Pattern,
    handler: HandlerTemplate,
}

impl Rule {
    pub fn new(method: HttpMethod, pattern: Pattern, handler: HandlerTemplate) -> Self {
        Self {
            method,
            pattern,
            handler,
        }
    }

    /// Rule name: the registration key, which is also the pattern source.
    pub fn name(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn handler(&self) -> &HandlerTemplate {
        &self.handler
    }
}

/// Compiles registration entries into [`Rule`]s.
pub struct RuleCompiler;

impl RuleCompiler {
    /// Compile one `pattern -> entry` registration.
    pub fn compile(pattern: &str, entry: &RuleEntry) -> RouterResult<Rule> {
        let spec = match entry {
            RuleEntry::Compact(compact) => Self::parse_compact(pattern, compact)?,
            RuleEntry::Structured(spec) => spec.clone(),
        };

        if spec.module.trim().is_empty() || spec.controller.trim().is_empty() {
            return Err(RouterError::Configuration(format!(
                "route '{pattern}' must name both a module and a controller"
            )));
        }

        let method: HttpMethod = spec.method.parse()?;
        let path = Self::compile_path(&spec);

        Ok(Rule::new(
            method,
            Pattern::compile(pattern)?,
            HandlerTemplate::parse(&path),
        ))
    }

    /// Expand `METHOD@module::controller[/action][/param][/arg]`.
    pub fn parse_compact(pattern: &str, compact: &str) -> RouterResult<RuleSpec> {
        let malformed = || {
            RouterError::Configuration(format!(
                "route '{pattern}': '{compact}' is not in METHOD@module::controller form"
            ))
        };

        let (method, handler) = compact.split_once('@').ok_or_else(malformed)?;
        let (module, rest) = handler.split_once("::").ok_or_else(malformed)?;

        let mut tail = rest.split('/');
        let controller = tail.next().unwrap_or_default();
        let mut spec = RuleSpec::new(method.trim(), module.trim(), controller.trim());
        if let Some(action) = tail.next() {
            spec.action = action.to_string();
        }
        if let Some(param) = tail.next() {
            spec.param = param.to_string();
        }
        if let Some(arg) = tail.next() {
            spec.arg = arg.to_string();
        }
        if tail.next().is_some() {
            return Err(malformed());
        }

        Ok(spec)
    }

    /// Join `module/controller` and append action, param and arg when non-empty.
    pub fn compile_path(spec: &RuleSpec) -> String {
        let mut path = format!("{}/{}", spec.module, spec.controller);
        for part in [&spec.action, &spec.param, &spec.arg] {
            if !part.is_empty() {
                path.push('/');
                path.push_str(part);
            }
        }
        path.trim().to_string()
    }
}
