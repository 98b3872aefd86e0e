mod context;
pub(crate) mod error;
mod expr;
mod param_info;
mod result;
mod rule;
mod ruleset;
pub(crate) mod template;
mod value;

pub use context::ValidationContext;
pub use error::{TypeError, ValidationError, ValueError};
pub use expr::{param, CompareOp, Expr, ParamExpr, RuleTerm, TermOperator};
pub use param_info::{ParamInfo, ParamSpec, ParameterType};
pub use result::{BadParam, Reason, RuleDiagnostic, ValidationResult};
pub use rule::{Clause, ContextTag, Rule};
pub use ruleset::RuleSet;
pub use template::{MetaProperties, TemplateDefinition, TemplateParameterDescriptor};
pub use value::Value;
