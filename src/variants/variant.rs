use std::collections::HashMap;
use std::fmt;

/// Kind tag of a [`Variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantType {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl VariantType {
    pub fn name(&self) -> &'static str {
        match self {
            VariantType::Null => "null",
            VariantType::Boolean => "boolean",
            VariantType::Integer => "integer",
            VariantType::Float => "float",
            VariantType::String => "string",
            VariantType::Array => "array",
            VariantType::Object => "object",
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed value consumed and produced by expressions.
///
/// Integers and floats are kept apart; operations decide how to mix them.
///
/// # Examples
///
/// ```
/// use stamen::{Variant, VariantType};
///
/// let price = Variant::from(2.5);
/// let tags = Variant::from(vec![Variant::from("new"), Variant::from(3)]);
///
/// assert_eq!(price.variant_type(), VariantType::Float);
/// assert_eq!(price.as_int(), Some(3));
/// assert_eq!(tags.as_string(), "new,3");
/// assert!(!Variant::default().as_bool());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// Empty value
    #[default]
    Null,

    Boolean(bool),

    Integer(i64),

    Float(f64),

    String(String),

    Array(Vec<Variant>),

    /// Object with string keys
    Object(HashMap<String, Variant>),
}

impl Variant {
    pub fn variant_type(&self) -> VariantType {
        match self {
            Variant::Null => VariantType::Null,
            Variant::Boolean(_) => VariantType::Boolean,
            Variant::Integer(_) => VariantType::Integer,
            Variant::Float(_) => VariantType::Float,
            Variant::String(_) => VariantType::String,
            Variant::Array(_) => VariantType::Array,
            Variant::Object(_) => VariantType::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Variant::Integer(_) | Variant::Float(_))
    }

    /// Truth value used by conditions and logical operators. Null, `false`,
    /// zero and empty strings, arrays or objects are false.
    pub fn as_bool(&self) -> bool {
        match self {
            Variant::Null => false,
            Variant::Boolean(flag) => *flag,
            Variant::Integer(n) => *n != 0,
            Variant::Float(f) => *f != 0.0,
            Variant::String(text) => !text.is_empty(),
            Variant::Array(items) => !items.is_empty(),
            Variant::Object(fields) => !fields.is_empty(),
        }
    }

    /// Numeric value as `f64`; `None` for anything that is not a number.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Variant::Integer(n) => Some(n as f64),
            Variant::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Integer value, with finite floats rounded to the nearest integer.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Variant::Integer(n) => Some(n),
            Variant::Float(f) if f.is_finite() => Some(f.round() as i64),
            _ => None,
        }
    }

    /// Text form used by string concatenation and `LIKE`. Null is empty and
    /// array items are joined with commas.
    pub fn as_string(&self) -> String {
        match self {
            Variant::String(s) => s.clone(),
            Variant::Float(n) => n.to_string(),
            Variant::Integer(n) => n.to_string(),
            Variant::Boolean(b) => b.to_string(),
            Variant::Null => String::new(),
            Variant::Array(items) => {
                let items: Vec<String> = items.iter().map(Variant::as_string).collect();
                items.join(",")
            }
            Variant::Object(_) => format!("{:?}", self),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Boolean(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Integer(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::Integer(value as i64)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Float(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(value: Vec<Variant>) -> Self {
        Variant::Array(value)
    }
}
