use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed value handed to the assertion API.
///
/// The assertion primitives compare values in two ways: coercively
/// ([`Value::loose_eq`]) and by identity ([`Value::identical`]). Keeping the
/// operands in one enum lets a test compare an integer against a string
/// without the caller converting anything first.
///
/// # Examples
///
/// ```rust
/// use casework::value::Value;
/// let n = Value::from(3);
/// assert_eq!(n.type_name(), "Int");
/// let s = Value::from("3");
/// assert!(n.loose_eq(&s));
/// assert!(!n.identical(&s));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::List(_) => "List",
        }
    }

    /// Returns true if the value is Null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the contained bool if this is a Bool value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use casework::value::Value;
    /// assert_eq!(Value::Bool(false).as_bool(), Some(false));
    /// assert_eq!(Value::from("false").as_bool(), None);
    /// ```
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of the value: numbers as-is, numeric strings parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => numeric_str(s),
            _ => None,
        }
    }

    /// Truthiness used when a value is coerced to a boolean.
    ///
    /// `Null`, `false`, `0`, `0.0`, `""`, `"0"` and the empty list are falsy.
    /// Comparing with `Null` uses this, except that a string only equals
    /// `Null` when it is empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !(s.is_empty() || s == "0"),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Strict comparison: same variant and same payload, no coercion.
    ///
    /// ```rust
    /// use casework::value::Value;
    /// assert!(Value::from(1).identical(&Value::from(1)));
    /// assert!(!Value::from(1).identical(&Value::from(1.0)));
    /// ```
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.identical(y))
            }
            _ => self == other,
        }
    }

    /// Coercive comparison.
    ///
    /// ```rust
    /// use casework::value::Value;
    /// assert!(Value::from(1).loose_eq(&Value::from("1")));
    /// assert!(Value::from(0).loose_eq(&Value::from(false)));
    /// assert!(!Value::from("abc").loose_eq(&Value::from(0)));
    /// ```
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(b), v) | (v, Value::Bool(b)) => *b == v.is_truthy(),
            (Value::Null, Value::Null) => true,
            (Value::Null, Value::Str(s)) | (Value::Str(s), Value::Null) => s.is_empty(),
            (Value::Null, v) | (v, Value::Null) => !v.is_truthy(),
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_number() == other.as_number()
            }
            (Value::Int(_) | Value::Float(_), Value::Str(s))
            | (Value::Str(s), Value::Int(_) | Value::Float(_)) => {
                let number = if let Value::Str(_) = self { other } else { self };
                match numeric_str(s) {
                    Some(parsed) => number.as_number() == Some(parsed),
                    None => number.to_string() == *s,
                }
            }
            (Value::Str(a), Value::Str(b)) => match (numeric_str(a), numeric_str(b)) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            _ => false,
        }
    }

    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

/// Parses a string that looks like a number. Words `f64::from_str` accepts
/// (`inf`, `NaN`) are rejected.
fn numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => Value::fmt_list(f, items),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! int_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(i: $t) -> Self {
                Value::Int(i as i64)
            }
        })*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32, isize);

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        i64::try_from(u).map_or(Value::Float(u as f64), Value::Int)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        i64::try_from(u).map_or(Value::Float(u as f64), Value::Int)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_that_look_like_numbers_compare_numerically() {
        assert!(Value::from("1e3").loose_eq(&Value::from(1000)));
        assert!(Value::from(" 42").loose_eq(&Value::from(42.0)));
        assert!(Value::from("10").loose_eq(&Value::from("1e1")));
        assert!(!Value::from("abc").loose_eq(&Value::from("ABC")));
    }

    #[test]
    fn words_accepted_by_float_parsing_are_not_numeric() {
        assert_eq!(numeric_str("inf"), None);
        assert_eq!(numeric_str("NaN"), None);
        assert_eq!(numeric_str("-"), None);
        assert_eq!(numeric_str("-2.5"), Some(-2.5));
    }

    #[test]
    fn booleans_compare_against_truthiness() {
        assert!(Value::from(true).loose_eq(&Value::from("yes")));
        assert!(Value::from(false).loose_eq(&Value::from("0")));
        assert!(Value::from(false).loose_eq(&Value::Null));
        assert!(!Value::from(true).loose_eq(&Value::List(vec![])));
    }

    #[test]
    fn null_is_loosely_equal_to_empty_values_only() {
        assert!(Value::Null.loose_eq(&Value::from("")));
        assert!(Value::Null.loose_eq(&Value::from(0)));
        assert!(!Value::Null.loose_eq(&Value::from("x")));
        assert!(!Value::Null.loose_eq(&Value::from("0")));
        assert!(!Value::from("0").loose_eq(&Value::Null));
        assert!(!Value::Null.identical(&Value::from("")));
    }

    #[test]
    fn lists_compare_elementwise() {
        let a = Value::from(vec![1, 2]);
        let b = Value::from(vec!["1", "2"]);
        assert!(a.loose_eq(&b));
        assert!(!a.identical(&b));
        assert!(a.identical(&Value::from(vec![1, 2])));
        assert!(!a.loose_eq(&Value::from(vec![1])));
    }

    #[test]
    fn non_numeric_string_compares_with_number_text() {
        assert!(!Value::from(1).loose_eq(&Value::from("1 apple")));
        assert!(Value::from(2.5).loose_eq(&Value::from("2.5")));
    }
}
