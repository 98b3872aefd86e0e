use std::collections::HashMap;
use std::ops::Not;

use crate::{Expr, RuleTerm, Value};

/// Three-valued outcome of evaluating a rule expression.
///
/// A comparison whose parameter has no value is `Unknown`; `and`/`or`/`not`
/// follow Kleene logic so missing data never decides an outcome on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    #[must_use]
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    #[must_use]
    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }
}

impl Not for Truth {
    type Output = Truth;

    fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }
}

impl From<bool> for Truth {
    fn from(b: bool) -> Self {
        if b { Truth::True } else { Truth::False }
    }
}

/// Supplies the value a rule comparison observes for a parameter.
pub trait Resolve {
    /// `None` when the parameter has no value anywhere.
    fn resolve(&self, parameter: &str) -> Option<Value>;
}

impl Resolve for HashMap<String, Value> {
    fn resolve(&self, parameter: &str) -> Option<Value> {
        self.get(parameter).cloned()
    }
}

/// One evaluated comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct TermOutcome {
    pub term: RuleTerm,
    pub observed: Option<Value>,
    pub truth: Truth,
}

/// Result of evaluating one expression, with every comparison it visited.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub truth: Truth,
    pub outcomes: Vec<TermOutcome>,
    decided_by: Option<usize>,
}

impl Evaluation {
    /// The comparison that settled `truth`.
    ///
    /// Under `not` its own truth is the opposite of the overall result. For
    /// `and`/`or` it comes from the operand whose value the node took, the
    /// left one when both agree. `None` when a literal decided the result.
    #[must_use]
    pub fn deciding_term(&self) -> Option<&TermOutcome> {
        self.decided_by.and_then(|i| self.outcomes.get(i))
    }
}

/// Evaluate `expr` against `ctx`. Every comparison is visited so the
/// outcome list is complete regardless of short-circuiting.
pub fn evaluate(expr: &Expr, ctx: &impl Resolve) -> Evaluation {
    let mut outcomes = Vec::new();
    let (truth, decided_by) = eval_expr(expr, ctx, &mut outcomes);
    Evaluation {
        truth,
        outcomes,
        decided_by,
    }
}

/// A node's truth and the index of the outcome that decided it.
type Decided = (Truth, Option<usize>);

fn eval_expr(expr: &Expr, ctx: &impl Resolve, outcomes: &mut Vec<TermOutcome>) -> Decided {
    match expr {
        Expr::Compare {
            parameter,
            op,
            value,
        } => {
            let observed = ctx.resolve(parameter);
            let truth = observed
                .as_ref()
                .map_or(Truth::Unknown, |v| v.compare(*op, value).into());
            tracing::trace!(%parameter, %op, %value, ?observed, ?truth, "rule term evaluated");
            outcomes.push(TermOutcome {
                term: RuleTerm {
                    operator: (*op).into(),
                    parameter: parameter.clone(),
                    value: value.clone(),
                },
                observed,
                truth,
            });
            (truth, Some(outcomes.len() - 1))
        }
        Expr::And(a, b) => {
            let left = eval_expr(a, ctx, outcomes);
            let right = eval_expr(b, ctx, outcomes);
            settle(left.0.and(right.0), left, right)
        }
        Expr::Or(a, b) => {
            let left = eval_expr(a, ctx, outcomes);
            let right = eval_expr(b, ctx, outcomes);
            settle(left.0.or(right.0), left, right)
        }
        Expr::Not(inner) => {
            let (truth, decided_by) = eval_expr(inner, ctx, outcomes);
            (!truth, decided_by)
        }
        Expr::Literal(b) => ((*b).into(), None),
    }
}

/// Credit a binary node's result to the operand that produced it.
fn settle(truth: Truth, left: Decided, right: Decided) -> Decided {
    let decided_by = if left.0 == truth { left.1 } else { right.1 };
    (truth, decided_by)
}
