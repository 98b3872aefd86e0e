//! Dependency rules for controller template parameters.
//!
//! Templates annotate parameters with small boolean expressions over other
//! parameters (`"REPLICATION_MODE==Multicast"`). This crate parses those
//! annotations into a [`RuleSet`], and [`VerifyPlaybookParams`] checks a
//! playbook configuration against them, reporting parameters that are
//! required but missing or set while not applicable.

mod config;
mod error;
mod evaluate;
pub mod normalize;
pub mod parse;
mod types;
mod verify;

pub use config::{default_rule_annotations, VerifyConfig};
pub use error::Error;
pub use evaluate::{evaluate, Evaluation, Resolve, TermOutcome, Truth};
pub use parse::{parse_rule, RuleParseError};
pub use types::{
    param, BadParam, Clause, CompareOp, ContextTag, Expr, MetaProperties, ParamExpr, ParamInfo,
    ParamSpec, ParameterType, Reason, Rule, RuleDiagnostic, RuleSet, RuleTerm, TemplateDefinition,
    TemplateParameterDescriptor, TermOperator, TypeError, ValidationContext, ValidationError,
    ValidationResult, ValueError, Value,
};
pub use verify::VerifyPlaybookParams;
