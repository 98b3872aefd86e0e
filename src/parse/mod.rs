mod error;
mod grammar;

pub use error::RuleParseError;

use crate::normalize::{normalize, split_multi_clause};
use crate::{Expr, TermOperator};

/// Normalize and parse the rule text attached to `parameter`.
///
/// A rule made of two parenthesized clauses joined by a combinator is split
/// and each clause parsed on its own. Any other shape, or a split whose
/// middle is not a lone combinator, goes through the generic grammar.
///
/// # Errors
///
/// Returns [`RuleParseError`] if the normalized text is not a well-formed
/// boolean expression.
pub fn parse_rule(parameter: &str, raw: &str) -> Result<Expr, RuleParseError> {
    let rule = normalize(raw);
    if rule.trim().is_empty() {
        return Err(RuleParseError::new(parameter, raw, "empty rule"));
    }

    if let Some(parts) = split_multi_clause(&rule) {
        if let Ok(op) = parts.middle.parse::<TermOperator>() {
            let clauses = parse_expr(parts.left).and_then(|left| {
                parse_expr(parts.right).map(|right| left.combine(op, right))
            });
            if let Ok(Some(combined)) = clauses {
                return Ok(combined);
            }
        }
        tracing::trace!(
            parameter,
            rule = %rule,
            middle = parts.middle,
            "two-clause split did not parse, using full grammar"
        );
    }

    parse_expr(&rule).map_err(|message| RuleParseError::new(parameter, raw, message))
}

fn parse_expr(input: &str) -> Result<Expr, String> {
    use winnow::Parser;
    grammar::rule_expr.parse(input).map_err(|e| e.to_string())
}
