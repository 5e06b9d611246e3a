//! # HTTP Server
//!
//! High-performance HTTP server built on Hyper and Tokio.
//! Implements graceful shutdown with signal handling.
//!
//! ## Key Features
//!
//! - Async request handling with Tokio runtime
//! - Graceful shutdown on SIGINT/SIGTERM
//! - Connection keep-alive support
//! - Uniform JSON error bodies, `{"error": "<message>"}`

use crate::error::{Error, Result};
use crate::router::{Match, Method, Router};
use http_body_util::Full;
pub use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// HTTP Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub address: SocketAddr,
    /// Enable keep-alive connections
    pub keep_alive: bool,
    /// Shutdown timeout for graceful shutdown (default: 30 seconds)
    pub shutdown_timeout: Duration,
    /// Max request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: ([127, 0, 0, 1], 8000).into(),
            keep_alive: true,
            shutdown_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024,
        }
    }
}

pub use crate::request::ApiRequest;

/// JSON error body, always `{"error": "<message>"}`
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// HTTP response produced by handlers
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
    /// Content type
    pub content_type: String,
    /// Response headers
    pub headers: HashMap<String, String>,
}

impl std::fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiResponse")
            .field("status", &self.status)
            .field("body", &self.body)
            .field("content_type", &self.content_type)
            .field("headers", &self.headers)
            .finish()
    }
}

impl Default for ApiResponse {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
            content_type: "application/json".to_string(),
            headers: HashMap::new(),
        }
    }
}

impl ApiResponse {
    /// Create a JSON response
    #[must_use]
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: "application/json".to_string(),
            headers: HashMap::new(),
        }
    }

    /// Create a text response
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: "text/plain".to_string(),
            headers: HashMap::new(),
        }
    }

    /// Create a JSON error response with the uniform body shape
    ///
    /// The message is serialized, not spliced, so it survives quotes
    /// and control characters in driver error text.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        let body = crate::json::to_json(&ErrorBody { error: message })
            .unwrap_or_else(|_| r#"{"error":"Internal Server Error"}"#.to_string());
        Self::json(body).with_status(status)
    }

    /// Set status code
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set header (simple Content-Type support for now)
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        if key.eq_ignore_ascii_case("content-type") {
            self.content_type = value.to_string();
        } else {
            self.headers.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Set or override a header
    pub fn set_header(&mut self, key: &str, value: &str) {
        if key.eq_ignore_ascii_case("content-type") {
            self.content_type = value.to_string();
        } else {
            self.headers.insert(key.to_string(), value.to_string());
        }
    }

    /// Convert to hyper Response
    fn into_hyper(self) -> Response<Full<Bytes>> {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut builder = Response::builder().status(status);
        builder = builder.header("Content-Type", &self.content_type);
        for (k, v) in &self.headers {
            if !k.eq_ignore_ascii_case("content-type") {
                builder = builder.header(k.as_str(), v.as_str());
            }
        }

        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Full::new(Bytes::from("Internal Server Error")))
                    .unwrap()
            })
    }
}

/// Handler function type (async)
pub type Handler = Arc<
    dyn Fn(
            &ApiRequest,
            &Match<'_>,
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ApiResponse> + Send>>
        + Send
        + Sync,
>;

/// High-performance HTTP server
pub struct Server {
    config: ServerConfig,
    router: Router,
    handlers: Vec<Handler>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    /// Create a new Server instance
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            router: Router::new(),
            handlers: Vec::new(),
        }
    }

    /// Bind the server to an address
    #[must_use]
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.config.address = addr;
        self
    }

    /// Set max request body size
    pub fn set_max_body_size(&mut self, bytes: usize) {
        self.config.max_body_size = bytes;
    }

    /// Add a route and its handler
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRoutePattern` if the pattern is malformed
    /// or conflicts with an existing route.
    pub fn add_route(&mut self, method: Method, path: &str, handler: Handler) -> Result<()> {
        self.router.add_route(method, path)?;
        self.handlers.push(handler);
        Ok(())
    }

    /// Start the server with graceful shutdown
    ///
    /// # Errors
    ///
    /// Returns `Error::Bind` if the listen address is unavailable, or an
    /// IO error from the accept loop.
    pub async fn serve(&self) -> Result<()> {
        let addr = self.config.address;

        let socket = tokio::net::TcpSocket::new_v4()?;
        socket.set_reuseaddr(true)?;
        #[cfg(not(windows))]
        {
            socket.set_reuseport(true)?;
        }
        socket.bind(addr).map_err(|source| Error::Bind {
            address: addr.to_string(),
            source,
        })?;

        let listener = socket.listen(1024).map_err(|source| Error::Bind {
            address: addr.to_string(),
            source,
        })?;

        info!("Server listening on http://{}", addr);

        let router = Arc::new(self.router.clone());
        let handlers = Arc::new(self.handlers.clone());
        let active = Arc::new(AtomicUsize::new(0));
        let max_body_size = self.config.max_body_size;
        let keep_alive = self.config.keep_alive;

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    let (stream, remote_addr) = accept_result?;
                    let io = TokioIo::new(stream);

                    let router = router.clone();
                    let handlers = handlers.clone();
                    let active = active.clone();

                    tokio::task::spawn(async move {
                        active.fetch_add(1, Ordering::Relaxed);

                        if let Err(err) = http1::Builder::new()
                            .keep_alive(keep_alive)
                            .serve_connection(io, service_fn(move |req| {
                                    let router = router.clone();
                                    let handlers = handlers.clone();
                                 async move {
                                     let method = req.method().clone();
                                     let path = req.uri().path().to_string();
                                     let version = format!("{:?}", req.version()); // e.g., HTTP/1.1

                                     let result = handle_request(
                                         req,
                                         &router,
                                         &handlers,
                                         remote_addr,
                                         max_body_size
                                     ).await;

                                     match &result {
                                         Ok(resp) => {
                                             let status_code = resp.status();
                                             info!("    {} - \"{} {} {}\" {}",
                                                 remote_addr,
                                                 method,
                                                 path,
                                                 version,
                                                 status_code
                                             );
                                         },
                                         Err(_) => {
                                             error!("    {} - \"{} {} {}\" ERROR",
                                                 remote_addr,
                                                 method,
                                                 path,
                                                 version
                                             );
                                         }
                                     }
                                     result
                                 }
                            }))
                            .await
                        {
                            error!("Error serving connection: {:?}", err);
                        }
                        active.fetch_sub(1, Ordering::Relaxed);
                    });
                }
                _ = shutdown_signal() => {
                    info!("Shutdown signal received, stopping server...");
                    break;
                }
            }
        }
        let timeout = self.config.shutdown_timeout;
        let drain = async {
            loop {
                if active.load(Ordering::Relaxed) == 0 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        };
        let _ = tokio::time::timeout(timeout, drain).await;
        Ok(())
    }

    /// Execute a test request directly without network stack
    pub async fn test_request(
        &self,
        method: Method,
        path: String,
        headers: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> ApiResponse {
        if let Some(b) = body.as_ref() {
            if b.len() > self.config.max_body_size {
                return ApiResponse::error(413, "Payload too large");
            }
        }
        let mut req = ApiRequest::new(method, path, headers, body);
        req.set_header("x-client-ip", "test");

        process_request(&mut req, &self.router, &self.handlers).await
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}

/// Core request processing logic (network agnostic)
async fn process_request(
    req: &mut ApiRequest,
    router: &Router,
    handlers: &[Handler],
) -> ApiResponse {
    if req.header("x-request-id").is_none() {
        let request_id = generate_request_id();
        req.set_header("x-request-id", &request_id);
    }

    let matched = match router.match_route(req.method, &req.path) {
        Ok(m) => m,
        Err(_) => {
            return ApiResponse::error(404, "Not Found");
        }
    };

    req.typed_params = matched.typed_params.clone();

    let handler = &handlers[matched.handler_id];
    let mut response = handler(req, &matched).await;

    if let Some(request_id) = req.header("x-request-id") {
        response.set_header("x-request-id", request_id);
    }
    response
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    router: &Router,
    handlers: &[Handler],
    remote_addr: std::net::SocketAddr,
    max_body_size: usize,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let mut api_request = match ApiRequest::from_hyper_with_limit(req, max_body_size).await {
        Ok(r) => r,
        Err(e) => match e {
            Error::PayloadTooLarge { .. } => {
                return Ok(ApiResponse::error(413, "Payload too large").into_hyper());
            }
            Error::RouteNotFound { .. } => {
                return Ok(ApiResponse::error(404, "Not Found").into_hyper());
            }
            _ => {
                error!("Failed to parse request: {}", e);
                return Ok(ApiResponse::error(400, "Bad request").into_hyper());
            }
        },
    };

    api_request.set_header("x-client-ip", &remote_addr.ip().to_string());
    let response = process_request(&mut api_request, router, handlers).await;
    Ok(response.into_hyper())
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{:x}", now.as_nanos(), counter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_json() {
        let resp = ApiResponse::json(r#"{"status": "ok"}"#);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, "application/json");
    }

    #[test]
    fn test_api_response_with_status() {
        let resp = ApiResponse::text("Not Found").with_status(404);
        assert_eq!(resp.status, 404);
    }

    #[test]
    fn test_api_response_error_shape() {
        let resp = ApiResponse::error(404, "Product not found");
        assert_eq!(resp.status, 404);
        assert_eq!(resp.content_type, "application/json");
        assert_eq!(resp.body, r#"{"error":"Product not found"}"#);
    }

    #[test]
    fn test_api_response_error_escapes_message() {
        let resp = ApiResponse::error(500, r#"near "SELEC": syntax error"#);
        let parsed: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(
            parsed.get("error").and_then(|v| v.as_str()),
            Some(r#"near "SELEC": syntax error"#)
        );
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.address.port(), 8000);
        assert!(config.keep_alive);
        assert_eq!(config.max_body_size, 1024 * 1024);
    }

    #[tokio::test]
    async fn test_unmatched_route_is_json_404() {
        let server = Server::new();
        let resp = server
            .test_request(Method::Get, "/nope".to_string(), HashMap::new(), None)
            .await;
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body, r#"{"error":"Not Found"}"#);
    }

    #[tokio::test]
    async fn test_oversized_test_request_is_413() {
        let mut server = Server::new();
        server.set_max_body_size(8);
        let resp = server
            .test_request(
                Method::Post,
                "/product".to_string(),
                HashMap::new(),
                Some(Bytes::from_static(b"way past eight bytes")),
            )
            .await;
        assert_eq!(resp.status, 413);
        assert_eq!(resp.body, r#"{"error":"Payload too large"}"#);
    }
}
