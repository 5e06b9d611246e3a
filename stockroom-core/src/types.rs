//! # Path Parameter Types
//!
//! Type conversion for path parameters. Routes declare the expected type in
//! the pattern (`/product/{id:int}`); the router converts the matched
//! segment before the handler runs. A segment that fails conversion is kept
//! as a string so the handler can reject it with a client error instead of
//! the route silently not matching.

use std::fmt;

/// Supported path parameter types
///
/// Declared during route registration. Default is `String` (no conversion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamType {
    /// String type (default) - no conversion
    #[default]
    String,
    /// Integer type - parses to i64
    Int,
}

impl ParamType {
    /// Parse a type specifier from a route pattern (e.g., "int" from "{id:int}")
    #[must_use]
    pub fn from_specifier(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "int" | "integer" | "i64" => Self::Int,
            _ => Self::String,
        }
    }

    /// Get the type name for error messages
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Converted parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String value (no conversion performed, or conversion fallback)
    String(String),
    /// Integer value (i64)
    Int(i64),
}

impl ParamValue {
    /// Get the value as a string
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Int(i) => i.to_string(),
        }
    }

    /// Check if the value is a string
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Get as i64 if Int variant
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// Convert a raw path segment to a typed value based on `ParamType`
///
/// Returns `None` if the segment does not parse as the declared type; the
/// caller decides the fallback (the router keeps the raw string).
#[must_use]
pub fn convert_param(raw: &str, param_type: ParamType) -> Option<ParamValue> {
    match param_type {
        ParamType::String => Some(ParamValue::String(raw.to_string())),
        ParamType::Int => raw.parse::<i64>().ok().map(ParamValue::Int),
    }
}

/// Parse a path segment pattern to extract name and type
///
/// Examples:
/// - `{id}` -> ("id", ParamType::String)
/// - `{id:int}` -> ("id", ParamType::Int)
///
/// # Returns
///
/// `Some((name, type))` if the segment is a parameter, `None` if static.
#[must_use]
pub fn parse_param_pattern(segment: &str) -> Option<(String, ParamType)> {
    if segment.starts_with('{') && segment.ends_with('}') {
        let inner = &segment[1..segment.len() - 1];

        if let Some((name, type_spec)) = inner.split_once(':') {
            Some((name.to_string(), ParamType::from_specifier(type_spec)))
        } else {
            Some((inner.to_string(), ParamType::String))
        }
    } else {
        None
    }
}
