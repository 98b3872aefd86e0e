use std::fmt;
use std::ops::Not;
use std::str::FromStr;

use serde::Serialize;

use super::Value;

/// Comparison operators supported in rule expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
}

/// Operator of a [`RuleTerm`]. `And`/`Or` mark combinator terms that link
/// two sub-expressions rather than comparing a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TermOperator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

/// One atomic comparison extracted from a rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTerm {
    pub operator: TermOperator,
    pub parameter: String,
    pub value: Value,
}

/// Parsed rule expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Compare {
        parameter: String,
        op: CompareOp,
        value: Value,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Literal(bool),
}

impl From<CompareOp> for TermOperator {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Eq => TermOperator::Eq,
            CompareOp::Neq => TermOperator::Neq,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
        }
    }
}

impl fmt::Display for TermOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermOperator::Eq => write!(f, "=="),
            TermOperator::Neq => write!(f, "!="),
            TermOperator::And => write!(f, "&&"),
            TermOperator::Or => write!(f, "||"),
        }
    }
}

/// Accepts both the raw (`&&`, `||`) and normalized (`and`, `or`) spellings.
impl FromStr for TermOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" => Ok(TermOperator::Eq),
            "!=" => Ok(TermOperator::Neq),
            "&&" | "and" => Ok(TermOperator::And),
            "||" | "or" => Ok(TermOperator::Or),
            other => Err(format!("unknown operator '{other}'")),
        }
    }
}

impl fmt::Display for RuleTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.parameter, self.operator, self.value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Compare {
                parameter,
                op,
                value,
            } => write!(f, "({parameter} {op} {value})"),
            Expr::And(a, b) => write!(f, "({a} and {b})"),
            Expr::Or(a, b) => write!(f, "({a} or {b})"),
            Expr::Not(inner) => write!(f, "(not {inner})"),
            Expr::Literal(b) => write!(f, "{b}"),
        }
    }
}

impl Expr {
    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }

    /// Join two expressions with a combinator operator.
    /// Returns `None` when `op` is a comparison rather than a combinator.
    #[must_use]
    pub fn combine(self, op: TermOperator, other: Expr) -> Option<Expr> {
        match op {
            TermOperator::And => Some(self.and(other)),
            TermOperator::Or => Some(self.or(other)),
            TermOperator::Eq | TermOperator::Neq => None,
        }
    }

    /// The combinator at the root of this expression, if any.
    #[must_use]
    pub fn combinator(&self) -> Option<TermOperator> {
        match self {
            Expr::And(..) => Some(TermOperator::And),
            Expr::Or(..) => Some(TermOperator::Or),
            _ => None,
        }
    }

    /// Leaf comparisons in left-to-right order.
    #[must_use]
    pub fn terms(&self) -> Vec<RuleTerm> {
        let mut out = Vec::new();
        collect_terms(self, &mut out);
        out
    }
}

fn collect_terms(expr: &Expr, out: &mut Vec<RuleTerm>) {
    match expr {
        Expr::Compare {
            parameter,
            op,
            value,
        } => out.push(RuleTerm {
            operator: (*op).into(),
            parameter: parameter.clone(),
            value: value.clone(),
        }),
        Expr::And(a, b) | Expr::Or(a, b) => {
            collect_terms(a, out);
            collect_terms(b, out);
        }
        Expr::Not(inner) => collect_terms(inner, out),
        Expr::Literal(_) => {}
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

/// Intermediate builder for comparison expressions.
/// Created by [`param()`]; requires a comparison method to produce an [`Expr`].
#[derive(Debug, Clone)]
pub struct ParamExpr {
    name: String,
}

impl ParamExpr {
    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Expr {
        Expr::Compare {
            parameter: self.name,
            op: CompareOp::Eq,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> Expr {
        Expr::Compare {
            parameter: self.name,
            op: CompareOp::Neq,
            value: value.into(),
        }
    }
}

#[must_use]
pub fn param(name: &str) -> ParamExpr {
    ParamExpr {
        name: name.to_owned(),
    }
}
