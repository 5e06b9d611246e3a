//! # HTTP Request
//!
//! High-performance request wrapper with lazy parsing.
//!
//! ## Design Principles (SOLID)
//!
//! - **S**: Request only handles request data, not response
//! - **O**: Extensible via new methods without breaking changes
//! - **D**: Does not expose hyper body types to handlers

use crate::error::Result;
use crate::router::Method;
use crate::types::ParamValue;
use http_body_util::BodyExt;
use hyper::body::Bytes;
use hyper::Request;
use std::collections::HashMap;

/// HTTP request wrapper handed to route handlers
///
/// Provides lazy access to request components:
/// - Headers are stored but accessed on-demand
/// - Body is collected once and cached
/// - Query string is parsed on construction
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Request path (without query string, trailing slash normalized)
    pub path: String,
    /// Raw query string (e.g., "page=1&limit=10")
    query_string: Option<String>,
    /// Parsed query parameters
    query_params: HashMap<String, String>,
    /// Typed path parameters, filled in after route matching
    pub typed_params: HashMap<String, ParamValue>,
    /// Request headers
    headers: hyper::HeaderMap,
    /// Request body (collected)
    body: Option<Bytes>,
}

impl ApiRequest {
    /// Create a new ApiRequest manually (for testing/internal use)
    pub fn new(
        method: Method,
        path: String,
        headers_map: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> Self {
        let (path, query_string) = if let Some((p, q)) = path.split_once('?') {
            (p.to_string(), Some(q.to_string()))
        } else {
            (path, None)
        };
        let path = normalize_trailing_slash(&path);

        let query_params = parse_query_string(query_string.as_deref());

        let mut headers = hyper::HeaderMap::new();
        for (k, v) in headers_map {
            if let (Ok(n), Ok(v)) = (
                hyper::header::HeaderName::from_bytes(k.as_bytes()),
                hyper::header::HeaderValue::from_str(&v),
            ) {
                headers.insert(n, v);
            }
        }

        Self {
            method,
            path,
            query_string,
            query_params,
            typed_params: HashMap::new(),
            headers,
            body,
        }
    }

    /// Create from hyper request
    ///
    /// # Errors
    ///
    /// Returns an error if the method is not routable or the body
    /// exceeds the size limit (see [`Self::from_hyper_with_limit`]).
    pub async fn from_hyper(req: Request<hyper::body::Incoming>) -> Result<Self> {
        Self::from_hyper_with_limit(req, usize::MAX).await
    }

    /// Create from hyper request with body size limit
    ///
    /// # Errors
    ///
    /// Returns `Error::RouteNotFound` for methods the router does not
    /// route, and `Error::PayloadTooLarge` if either the declared
    /// Content-Length or the collected body exceeds `max_body_size`.
    pub async fn from_hyper_with_limit(
        req: Request<hyper::body::Incoming>,
        max_body_size: usize,
    ) -> Result<Self> {
        let method = Method::from_hyper(req.method()).ok_or_else(|| {
            crate::error::Error::RouteNotFound {
                path: req.uri().path().to_string(),
            }
        })?;

        let uri = req.uri();
        let path = normalize_trailing_slash(uri.path());
        let query_string = uri.query().map(String::from);

        let query_params = parse_query_string(query_string.as_deref());

        let headers = req.headers().clone();
        if let Some(len) = headers.get(hyper::header::CONTENT_LENGTH) {
            if let Ok(len_str) = len.to_str() {
                if let Ok(content_len) = len_str.parse::<usize>() {
                    if content_len > max_body_size {
                        return Err(crate::error::Error::PayloadTooLarge {
                            limit: max_body_size,
                            actual: content_len,
                        });
                    }
                }
            }
        }

        let body = match BodyExt::collect(req.into_body()).await {
            Ok(collected) => {
                let bytes = collected.to_bytes();
                if bytes.len() > max_body_size {
                    return Err(crate::error::Error::PayloadTooLarge {
                        limit: max_body_size,
                        actual: bytes.len(),
                    });
                }
                Some(bytes)
            }
            Err(_) => None,
        };

        Ok(Self {
            method,
            path,
            query_string,
            query_params,
            headers,
            body,
            typed_params: HashMap::new(),
        })
    }

    /// Get a header value by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set or override a header value
    ///
    /// Names and values that are not valid HTTP header tokens are
    /// silently dropped.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let (Ok(n), Ok(v)) = (
            hyper::header::HeaderName::from_bytes(name.as_bytes()),
            hyper::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(n, v);
        }
    }

    /// Get query parameters as a HashMap
    #[must_use]
    pub fn query_map(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Get raw query string
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    /// Get the request body as bytes
    #[must_use]
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_ref().map(|b| b.as_ref())
    }

    /// Get the request body as string (UTF-8)
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        self.body_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// Normalize trailing slashes so `/products/` matches `/products`
///
/// The root path stays `/`.
#[must_use]
pub fn normalize_trailing_slash(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse query string into HashMap
///
/// Handles URL decoding and duplicate keys (last value wins).
fn parse_query_string(query: Option<&str>) -> HashMap<String, String> {
    query
        .map(|q| {
            q.split('&')
                .filter_map(|pair| {
                    let mut parts = pair.splitn(2, '=');
                    let key = parts.next()?;
                    let value = parts.next().unwrap_or("");
                    let key = url_decode(key);
                    let value = url_decode(value);
                    Some((key, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Basic URL decoding
fn url_decode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '+' => result.push(' '),
            '%' => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() == 2 {
                    if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                        result.push(byte as char);
                    } else {
                        result.push('%');
                        result.push_str(&hex);
                    }
                } else {
                    result.push('%');
                    result.push_str(&hex);
                }
            }
            _ => result.push(c),
        }
    }
    result
}
