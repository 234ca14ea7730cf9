//! Cell values and their kinds.
//!
//! A [`Value`] is a tagged union: numbers are ordered and support arithmetic,
//! symbols support equality only. `Missing` stands for an unknown cell (`?`
//! in text data) and is compatible with either kind.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a column or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Num,
    Sym,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Num => f.write_str("numeric"),
            Kind::Sym => f.write_str("symbolic"),
        }
    }
}

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Num(f64),
    Sym(String),
    Missing,
}

impl Value {
    /// Returns the kind of this value, or `None` for [`Value::Missing`].
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Value::Num(_) => Some(Kind::Num),
            Value::Sym(_) => Some(Kind::Sym),
            Value::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Value::Sym(s) => Some(s),
            _ => None,
        }
    }

    /// Total order used to sort a column before binning.
    ///
    /// Missing sorts first, then numbers (by [`f64::total_cmp`]), then
    /// symbols (lexicographically).
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Missing, Value::Missing) => Ordering::Equal,
            (Value::Missing, _) => Ordering::Less,
            (_, Value::Missing) => Ordering::Greater,
            (Value::Num(a), Value::Num(b)) => a.total_cmp(b),
            (Value::Num(_), Value::Sym(_)) => Ordering::Less,
            (Value::Sym(_), Value::Num(_)) => Ordering::Greater,
            (Value::Sym(a), Value::Sym(b)) => a.cmp(b),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Num(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Sym(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Sym(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(x) => write!(f, "{x}"),
            Value::Sym(s) => f.write_str(s),
            Value::Missing => f.write_str("?"),
        }
    }
}
