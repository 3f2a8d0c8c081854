pub mod error;
pub mod guards;
pub mod matcher;
pub mod resolver;
pub mod route;
pub mod router;
pub mod rule;
pub mod table;

pub use error::{RouterError, RouterResult};
pub use guards::{CanonicalGuard, GuardChain, GuardOutcome, Redirect};
pub use matcher::{MatchedRule, Matcher, Strategy};
pub use resolver::{Component, ComponentResolver, ControllerNaming, HandlerParts};
pub use route::{Route, RouteBuilder};
pub use router::{Dispatch, Router};
pub use rule::{Field, HandlerTemplate, HttpMethod, Pattern, PatternKind, Rule, RuleCompiler};
pub use table::RoutingTable;
