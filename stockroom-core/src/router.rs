//! # High-Performance Router
//!
//! Radix-trie based router using `matchit` for O(log n) route matching.
//! Significantly faster than regex-based routing.
//!
//! ## Features
//!
//! - Path parameter extraction (`/product/{id}`)
//! - Typed parameters (`/product/{id:int}`)
//! - Zero-copy path matching
//!
//! ## SOLID Principles
//!
//! - **S**: Router only handles routing, type conversion delegated to `types` module
//! - **O**: Extensible via new ParamType without modifying Router
//! - **D**: Depends on `types::convert_param`, not concrete conversion logic

use crate::error::{Error, Result};
use crate::route::RouteInfo;
use crate::types::{convert_param, ParamValue};
use matchit::Router as MatchitRouter;
use std::collections::HashMap;

/// HTTP methods supported by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP DELETE
    Delete,
    /// HTTP PATCH
    Patch,
    /// HTTP HEAD
    Head,
    /// HTTP OPTIONS
    Options,
}

impl Method {
    /// Convert from a hyper method
    ///
    /// Returns `None` for methods the router does not route (e.g., CONNECT).
    #[must_use]
    pub fn from_hyper(method: &hyper::Method) -> Option<Self> {
        match *method {
            hyper::Method::GET => Some(Self::Get),
            hyper::Method::POST => Some(Self::Post),
            hyper::Method::PUT => Some(Self::Put),
            hyper::Method::DELETE => Some(Self::Delete),
            hyper::Method::PATCH => Some(Self::Patch),
            hyper::Method::HEAD => Some(Self::Head),
            hyper::Method::OPTIONS => Some(Self::Options),
            _ => None,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Patch => write!(f, "PATCH"),
            Self::Head => write!(f, "HEAD"),
            Self::Options => write!(f, "OPTIONS"),
        }
    }
}

/// Route handler identifier
pub type HandlerId = usize;

/// Matched route with extracted and converted parameters
///
/// Contains both the raw string params and the converted typed params.
/// A parameter declared `{id:int}` whose segment does not parse stays a
/// `ParamValue::String`, so handlers can reject it explicitly.
#[derive(Debug)]
pub struct Match<'a> {
    /// The handler ID for this route
    pub handler_id: HandlerId,
    /// Raw extracted path parameters
    pub params: HashMap<&'a str, &'a str>,
    /// Typed path parameters
    pub typed_params: HashMap<String, ParamValue>,
}

impl<'a> Match<'a> {
    /// Get a typed parameter by name
    ///
    /// Returns `None` if parameter doesn't exist.
    #[must_use]
    pub fn get_typed(&self, name: &str) -> Option<&ParamValue> {
        self.typed_params.get(name)
    }

    /// Get a parameter as i64 (convenience method)
    ///
    /// Returns `None` if the parameter is missing or failed int conversion.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.typed_params.get(name).and_then(ParamValue::as_int)
    }
}

/// Per-method storage for routes
#[derive(Clone)]
struct MethodRoutes {
    /// Matchit router for path matching
    router: MatchitRouter<HandlerId>,
    /// Route metadata indexed by handler ID
    routes: Vec<RouteInfo>,
}

impl MethodRoutes {
    fn new() -> Self {
        Self {
            router: MatchitRouter::new(),
            routes: Vec::new(),
        }
    }
}

/// High-performance HTTP router using radix trie
///
/// ## Design (SOLID)
///
/// - Single Responsibility: Only handles route registration and matching
/// - Open/Closed: Extensible via new ParamTypes without modification
/// - Dependency Inversion: Uses abstract `convert_param` function
#[derive(Clone)]
pub struct Router {
    /// Per-method routers for efficient matching
    method_routes: HashMap<Method, MethodRoutes>,
    /// Counter for generating handler IDs
    next_handler_id: HandlerId,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a new empty router
    #[must_use]
    pub fn new() -> Self {
        Self {
            method_routes: HashMap::new(),
            next_handler_id: 0,
        }
    }

    /// Register a route with the given method and path pattern
    ///
    /// Supports typed parameters: `/product/{id:int}`
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `path` - Path pattern (e.g., "/product/{id}" or "/product/{id:int}")
    ///
    /// # Returns
    ///
    /// The handler ID assigned to this route
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRoutePattern` if the pattern is malformed
    pub fn add_route(&mut self, method: Method, path: &str) -> Result<HandlerId> {
        let handler_id = self.next_handler_id;
        self.next_handler_id += 1;

        let route_info = RouteInfo::new(handler_id, path);
        let match_pattern = route_info.match_pattern.clone();

        let method_routes = self
            .method_routes
            .entry(method)
            .or_insert_with(MethodRoutes::new);

        method_routes
            .router
            .insert(&match_pattern, handler_id)
            .map_err(|e| Error::InvalidRoutePattern {
                pattern: path.to_string(),
                reason: e.to_string(),
            })?;

        method_routes.routes.push(route_info);

        Ok(handler_id)
    }

    /// Match a request path against registered routes
    ///
    /// Returns both raw string params and typed params based on the
    /// route definition.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method of the request
    /// * `path` - Request path to match
    ///
    /// # Returns
    ///
    /// A `Match` containing the handler ID and both raw and typed parameters
    ///
    /// # Errors
    ///
    /// Returns `Error::RouteNotFound` if no matching route exists
    pub fn match_route<'a>(&'a self, method: Method, path: &'a str) -> Result<Match<'a>> {
        let method_routes =
            self.method_routes
                .get(&method)
                .ok_or_else(|| Error::RouteNotFound {
                    path: path.to_string(),
                })?;

        let matched = method_routes
            .router
            .at(path)
            .map_err(|_| Error::RouteNotFound {
                path: path.to_string(),
            })?;

        let handler_id = *matched.value;

        let route_info = method_routes
            .routes
            .iter()
            .find(|r| r.handler_id == handler_id)
            .ok_or_else(|| Error::RouteNotFound {
                path: path.to_string(),
            })?;

        let params: HashMap<&str, &str> = matched.params.iter().collect();

        let mut typed_params = HashMap::new();
        for (name, value) in &params {
            let param_type = route_info.get_param_type(name);
            let typed_value = convert_param(value, param_type)
                .unwrap_or_else(|| ParamValue::String((*value).to_string()));
            typed_params.insert((*name).to_string(), typed_value);
        }

        Ok(Match {
            handler_id,
            params,
            typed_params,
        })
    }

    /// Convenience method to add a GET route
    pub fn get(&mut self, path: &str) -> Result<HandlerId> {
        self.add_route(Method::Get, path)
    }

    /// Convenience method to add a POST route
    pub fn post(&mut self, path: &str) -> Result<HandlerId> {
        self.add_route(Method::Post, path)
    }

    /// Convenience method to add a PUT route
    pub fn put(&mut self, path: &str) -> Result<HandlerId> {
        self.add_route(Method::Put, path)
    }

    /// Convenience method to add a DELETE route
    pub fn delete(&mut self, path: &str) -> Result<HandlerId> {
        self.add_route(Method::Delete, path)
    }
}
