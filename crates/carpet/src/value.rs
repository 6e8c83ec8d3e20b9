use std::fmt;

use tracing::warn;

/// Host-side copy of a value produced by the embedded runtime.
///
/// Only the shapes a render call can produce are represented; everything
/// else collapses into [`Value::Unrepresentable`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    Float(f64),
    String(String),
    Bool(bool),
    #[default]
    Unrepresentable,
}

impl Value {
    /// Marshal a runtime value.
    ///
    /// Numbers become [`Value::Float`] whether QuickJS stores them as
    /// integers or doubles. Strings are copied using their explicit byte
    /// length, so embedded NUL bytes survive. Any other type is logged once
    /// and replaced with [`Value::Unrepresentable`].
    #[must_use]
    pub fn from_js(value: &rquickjs::Value<'_>) -> Self {
        if let Some(b) = value.as_bool() {
            return Self::Bool(b);
        }
        if let Some(n) = value.as_number() {
            return Self::Float(n);
        }
        if let Some(s) = value.as_string() {
            match s.to_string() {
                Ok(s) => return Self::String(s),
                Err(e) => {
                    warn!(kind = ?value.type_of(), error = %e, "failed to decode runtime string");
                    return Self::Unrepresentable;
                }
            }
        }

        warn!(kind = ?value.type_of(), value = ?value, "unhandled runtime value type");
        Self::Unrepresentable
    }

    #[must_use]
    pub const fn is_unrepresentable(&self) -> bool {
        matches!(self, Self::Unrepresentable)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// String form used by documents; unrepresentable values are empty.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::String(s) => s,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Unrepresentable => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}
