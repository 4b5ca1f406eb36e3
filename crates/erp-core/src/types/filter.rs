//! Filter types for dynamic query building.
//!
//! Only the two operators the console needs exist: exact equality (used
//! for keys and names) and case-insensitive pattern matching (used by the
//! list screens' substring filters).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// SQL `ILIKE` case-insensitive pattern match.
    ILike,
}

impl FilterOp {
    /// Operator keyword in the hosted REST dialect.
    pub fn as_rest(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::ILike => "ilike",
        }
    }
}

/// A dynamic filter value that can represent the column types in use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// Null / no value.
    Null,
}

impl FilterValue {
    /// Convert to the JSON value stored in a row.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Null => serde_json::Value::Null,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column or field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value.into())
    }

    /// Shorthand for a case-insensitive LIKE filter with a raw pattern.
    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOp::ILike, FilterValue::String(pattern.into()))
    }

    /// Case-insensitive substring match: `ILIKE '%text%'` with the LIKE
    /// metacharacters of `text` escaped.
    pub fn contains(field: impl Into<String>, text: &str) -> Self {
        Self::ilike(field, format!("%{}%", escape_like(text)))
    }
}

/// Escape `\`, `%` and `_` so they match literally inside a LIKE pattern.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Evaluate an `ILIKE` pattern (backslash escapes) against a candidate.
pub fn ilike_matches(pattern: &str, candidate: &str) -> bool {
    #[derive(Clone, Copy)]
    enum Token {
        Any,
        One,
        Lit(char),
    }

    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => tokens.push(Token::Lit(chars.next().unwrap_or('\\'))),
            '%' => tokens.push(Token::Any),
            '_' => tokens.push(Token::One),
            other => tokens.push(Token::Lit(other)),
        }
    }
    let text: Vec<char> = candidate.chars().collect();

    // Classic wildcard matcher with single backtrack point.
    let (mut t, mut p) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        match tokens.get(p) {
            Some(Token::Any) => {
                star = Some((p, t));
                p += 1;
            }
            Some(Token::One) => {
                t += 1;
                p += 1;
            }
            Some(Token::Lit(c)) if eq_ignore_case(*c, text[t]) => {
                t += 1;
                p += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    p = sp + 1;
                    t = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }
    tokens[p..].iter().all(|tok| matches!(tok, Token::Any))
}

fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_wraps_and_escapes() {
        let f = FilterField::contains("status", "50%_off");
        assert_eq!(f.op, FilterOp::ILike);
        assert_eq!(f.value, FilterValue::String("%50\\%\\_off%".to_string()));
    }

    #[test]
    fn test_ilike_substring_case_insensitive() {
        assert!(ilike_matches("%pend%", "Pending"));
        assert!(ilike_matches("%PEND%", "pending"));
        assert!(!ilike_matches("%ship%", "pending"));
        assert!(ilike_matches("%%", ""));
    }

    #[test]
    fn test_ilike_escaped_metacharacters_are_literal() {
        let pattern = format!("%{}%", escape_like("a_b"));
        assert!(ilike_matches(&pattern, "xa_bx"));
        assert!(!ilike_matches(&pattern, "xacbx"));
        let pct = format!("%{}%", escape_like("10%"));
        assert!(ilike_matches(&pct, "save 10% today"));
        assert!(!ilike_matches(&pct, "save 100 today"));
    }

    #[test]
    fn test_ilike_single_char_wildcard() {
        assert!(ilike_matches("a_c", "abc"));
        assert!(!ilike_matches("a_c", "ac"));
    }
}
