//! Typed field values for the writer.

use std::borrow::Cow;

/// A field value handed to the writer.
///
/// The type, not the text, decides numeric-ness for
/// [`Quoting::NonNumeric`](crate::Quoting::NonNumeric): an `Int` or `Float`
/// is written bare, everything else is quoted. Numbers render through
/// `itoa`/`ryu` rather than the `Display` machinery.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text field
    Str(String),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
}

impl Value {
    /// Whether this value counts as numeric for quoting decisions.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Render the value to field text.
    pub(crate) fn render(&self) -> Cow<'_, str> {
        match self {
            Value::Str(s) => Cow::Borrowed(s.as_str()),
            Value::Int(i) => Cow::Owned(itoa::Buffer::new().format(*i).to_string()),
            Value::Float(f) => Cow::Owned(ryu::Buffer::new().format(*f).to_string()),
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

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}
