use std::fmt;

use serde::Serialize;

use super::expr::CompareOp;

/// Scalar values seen by rule evaluation: rule literals and coerced
/// configuration values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
}

impl Value {
    /// Compare this value to another using the given operator.
    ///
    /// A string compared with a boolean or a number is read as that kind
    /// first, so `String("True")` equals `Bool(true)` and `String("1.0")`
    /// equals `Float(1.0)`. Only strings that do not read as the other kind
    /// fall back to comparing plain text.
    #[must_use]
    pub fn compare(&self, op: CompareOp, other: &Value) -> bool {
        let equal = self.equals(other);
        match op {
            CompareOp::Eq => equal,
            CompareOp::Neq => !equal,
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::String(s), Value::Bool(b)) | (Value::Bool(b), Value::String(s)) => {
                parse_bool(s.trim()).map_or_else(|| s == &b.to_string(), |parsed| parsed == *b)
            }
            (Value::String(s), number @ (Value::Int(_) | Value::Float(_)))
            | (number @ (Value::Int(_) | Value::Float(_)), Value::String(s)) => {
                match parse_number(s.trim()) {
                    Some(parsed) => parsed.equals(number),
                    None => s == &number.plain(),
                }
            }
            _ => self.plain() == other.plain(),
        }
    }

    /// The value rendered without quoting.
    #[must_use]
    pub fn plain(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Whether this value counts as "not supplied" for a mandatory parameter.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::String(s) if s.trim().is_empty())
    }

    /// Interpret a bare rule word: `True`/`False`, integers, floats, and
    /// anything else as a string.
    #[must_use]
    pub fn from_literal(word: &str) -> Value {
        match word {
            "True" => return Value::Bool(true),
            "False" => return Value::Bool(false),
            _ => {}
        }
        if let Ok(i) = word.parse::<i64>() {
            return Value::Int(i);
        }
        if word.contains('.') {
            if let Ok(f) = word.parse::<f64>() {
                if f.is_finite() {
                    return Value::Float(f);
                }
            }
        }
        Value::String(word.to_owned())
    }

    /// Convert a JSON scalar. Null, arrays and objects have no scalar form.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Value> {
        match value {
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float)),
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
        }
    }
}

/// Case-insensitive `true`/`false`.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::Int(i));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
        }
    }
}
