use thiserror::Error;

use crate::parse::RuleParseError;
use crate::{TypeError, ValidationError, ValueError};

/// Unified error type covering setters, template structure, rule parsing,
/// configuration loading, and I/O.
///
/// Returned by convenience methods like [`RuleSet::from_template()`](crate::RuleSet::from_template)
/// and [`VerifyConfig::from_file()`](crate::VerifyConfig::from_file).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    RuleParse(#[from] RuleParseError),

    #[error(transparent)]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
