//! Scalar argument values.

use serde_yaml::{Number, Value};
use std::fmt;

/// A single value a client parameter can take.
///
/// Configuration documents may mix strings, numbers and booleans in the
/// same value list. Values keep their declared type, but they are always
/// compared and substituted through their string form, so `1`, `"1"` and
/// a pin `n=1` all refer to the same thing. Booleans are spelled `True`
/// and `False`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// `true` / `false`, displayed as `True` / `False`
    Bool(bool),
    /// Integer or floating point number
    Number(Number),
    /// Any string
    String(String),
}

impl ArgValue {
    /// Convert a YAML scalar. Returns `None` for null, sequences and
    /// mappings.
    pub fn from_yaml(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
