use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Display;

/// A single cell of a [`Table`](super::Table)
///
/// Values carry a total order so they can be used as group keys: nulls sort
/// first, then numbers (integers and floats compare numerically), booleans,
/// strings and lists.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this value is an identifier equal to `key`
    ///
    /// Identifiers arrive as text but may be stored as integers, so `Int(10)`
    /// and `Float(10.0)` match `"10"`. Strings compare exactly (case-sensitive).
    pub fn matches_key(&self, key: &str) -> bool {
        match self {
            Value::Str(s) => s == key,
            Value::Int(i) => key.parse::<i64>().is_ok_and(|k| k == *i),
            // Integer ids read back as floats when the column had gaps
            Value::Float(_) => key.parse::<i64>().is_ok_and(|k| *self == Value::Int(k)),
            Value::Bool(b) => key.parse::<bool>().is_ok_and(|k| k == *b),
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Bool(_) => 2,
            Value::Str(_) => 3,
            Value::List(_) => 4,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            // Nested objects have no use in a flat table
            serde_json::Value::Object(map) => Value::Str(serde_json::Value::Object(map).to_string()),
        }
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

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
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
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Value::Float(a), Value::Float(b)) => {
                a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b))
            }
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

/// Exact comparison of an integer with a float, without rounding the
/// integer to 53 bits
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63, the first float above every i64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return (i as f64).total_cmp(&f);
    }
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    i.cmp(&(whole as i64)).then_with(|| {
        if f > whole {
            Ordering::Less
        } else if f < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_compare_across_variants() {
        assert_eq!(Value::Int(0), Value::Float(0.0));
        assert!(Value::Int(2) > Value::Float(1.5));
        assert!(Value::Float(-0.5) < Value::Int(0));
    }

    #[test]
    fn test_large_integers_compare_exactly_with_floats() {
        let two_53 = 9_007_199_254_740_992_i64;
        assert_eq!(Value::Int(two_53), Value::Float(two_53 as f64));
        assert_ne!(Value::Int(two_53 + 1), Value::Float(two_53 as f64));
        assert!(Value::Int(two_53 + 1) > Value::Float(two_53 as f64));
        assert!(Value::Float(two_53 as f64) < Value::Int(two_53 + 1));
        assert!(Value::Int(i64::MAX) < Value::Float(1e19));
        assert!(Value::Int(i64::MIN) > Value::Float(-1e19));
        assert!(Value::Int(-2) < Value::Float(-1.5));
        assert!(Value::Int(-1) > Value::Float(-1.5));
    }

    #[test]
    fn test_null_sorts_first() {
        let mut values = vec![Value::from("a"), Value::Int(3), Value::Null, Value::Bool(true)];
        values.sort();
        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::Int(3));
        assert_eq!(values[3], Value::from("a"));
    }

    #[test]
    fn test_matches_key_string_and_integer_ids() {
        assert!(Value::from("76561197970982479").matches_key("76561197970982479"));
        assert!(Value::Int(10).matches_key("10"));
        assert!(!Value::Int(10).matches_key("ten"));
        assert!(!Value::from("Valve").matches_key("valve"));
        assert!(Value::Float(10.0).matches_key("10"));
        assert!(!Value::Float(10.5).matches_key("10"));
        assert!(!Value::Float(76561197970982480.0).matches_key("76561197970982479"));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!(["Action", 3, 2.5, null, true]);
        let value = Value::from(json);
        assert_eq!(
            value,
            Value::List(vec![
                Value::from("Action"),
                Value::Int(3),
                Value::Float(2.5),
                Value::Null,
                Value::Bool(true),
            ])
        );
    }

    #[test]
    fn test_serialize_untagged() {
        let value = Value::List(vec![Value::Int(1), Value::from("x")]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[1,"x"]"#);
    }
}
