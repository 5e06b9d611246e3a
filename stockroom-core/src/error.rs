//! # Error Handling
//!
//! Centralized error types for the stockroom core.
//! Uses `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Result type alias for stockroom operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the stockroom runtime
#[derive(Error, Debug)]
pub enum Error {
    /// Server failed to bind to the specified address
    #[error("Failed to bind server to {address}: {source}")]
    Bind {
        /// The address we tried to bind to
        address: String,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Router failed to match the requested path
    #[error("No route found for path: {path}")]
    RouteNotFound {
        /// The path that wasn't matched
        path: String,
    },

    /// Invalid route pattern provided at registration time
    #[error("Invalid route pattern: {pattern}: {reason}")]
    InvalidRoutePattern {
        /// The invalid pattern
        pattern: String,
        /// Reason for invalidity
        reason: String,
    },

    /// JSON parse or serialize error
    #[error("JSON error: {message}")]
    Json {
        /// What the JSON layer reported
        message: String,
    },

    /// Database error
    #[error("Database error: {message}")]
    Database {
        /// Error message from the store driver
        message: String,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request payload too large
    #[error("Payload too large: limit={limit} bytes, received={actual} bytes")]
    PayloadTooLarge {
        /// Max allowed size
        limit: usize,
        /// Actual size
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_not_found_error() {
        let err = Error::RouteNotFound {
            path: "/unknown".to_string(),
        };
        assert!(err.to_string().contains("/unknown"));
    }

    #[test]
    fn test_bind_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = Error::Bind {
            address: "0.0.0.0:8000".to_string(),
            source: io_err,
        };
        assert!(err.to_string().contains("0.0.0.0:8000"));
    }

    #[test]
    fn test_database_error_carries_driver_text() {
        let err = Error::Database {
            message: "no such table: products".to_string(),
        };
        assert!(err.to_string().contains("no such table"));
    }
}
