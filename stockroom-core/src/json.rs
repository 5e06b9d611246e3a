//! # JSON Serialization Module
//!
//! High-performance JSON parsing using simd-json with serde_json for
//! serialization.
//!
//! ## Design Principles (SOLID)
//!
//! - **S**: Only handles JSON serialization/deserialization
//! - **O**: Extensible via serde traits
//! - **D**: Depends on serde abstractions, not concrete parsers

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parse JSON string to a typed value using simd-json
///
/// # Arguments
///
/// * `json_str` - JSON string to parse
///
/// # Returns
///
/// Deserialized value of type T
///
/// # Errors
///
/// Returns `Error::Json` if parsing fails
pub fn parse_json<T: DeserializeOwned>(json_str: &str) -> Result<T> {
    let mut bytes = json_str.as_bytes().to_vec();

    simd_json::from_slice(&mut bytes).map_err(|e| Error::Json {
        message: format!("Parse error: {e}"),
    })
}

/// Parse JSON bytes to a typed value using simd-json
///
/// More efficient than string parsing - avoids allocations.
///
/// # Arguments
///
/// * `bytes` - Mutable byte slice containing JSON
///
/// # Returns
///
/// Deserialized value of type T
///
/// # Errors
///
/// Returns `Error::Json` if parsing fails
pub fn parse_json_bytes<T: DeserializeOwned>(bytes: &mut [u8]) -> Result<T> {
    simd_json::from_slice(bytes).map_err(|e| Error::Json {
        message: format!("Parse error: {e}"),
    })
}

/// Serialize a value to JSON string
///
/// Uses serde_json for serialization (simd-json is primarily for parsing).
///
/// # Arguments
///
/// * `value` - Value to serialize
///
/// # Returns
///
/// JSON string representation
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Json {
        message: format!("Serialize error: {e}"),
    })
}
