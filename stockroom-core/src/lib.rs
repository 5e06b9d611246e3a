//! # Stockroom Core
//!
//! Core library for the stockroom product service.
//! Provides the HTTP server, routing, and the SQL-backed product store.
//!
//! ## Architecture
//!
//! One `products` table, five HTTP operations over it. Handlers validate
//! and shape responses; the store owns the SQL; the server owns the wire.
//!
//! ## Modules
//!
//! - `server` - HTTP server built on Hyper
//! - `router` - High-performance routing using matchit (radix trie)
//! - `route` - Route metadata and information
//! - `request` - HTTP request wrapper with headers and query parsing
//! - `handlers` - The product CRUD operations
//! - `store` - Parameterized SQL over the products table
//! - `model` - Product and ProductDraft serde types
//! - `json` - High-performance JSON parsing with simd-json
//! - `database` - SQLx database connectivity (SQLite, PostgreSQL)
//! - `types` - Path parameter types and conversion
//! - `error` - Error types and handling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod database;
pub mod error;
pub mod handlers;
pub mod json;
pub mod model;
pub mod request;
pub mod route;
pub mod router;
pub mod server;
pub mod store;
pub mod types;

pub use database::{Backend, DatabasePool, DbValue, ExecResult};
pub use error::{Error, Result};
pub use json::{parse_json, to_json};
pub use model::{Product, ProductDraft};
pub use request::ApiRequest;
pub use route::RouteInfo;
pub use router::{Method, Router};
pub use server::{ApiResponse, Server, ServerConfig};
pub use store::ProductStore;
pub use types::{ParamType, ParamValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
