//! # Product Handlers
//!
//! The HTTP operations over the products table. Each handler validates
//! its inputs, delegates to [`ProductStore`], and shapes the response;
//! no SQL and no hyper types appear here.
//!
//! Validation order on id-carrying routes is fixed: path id first, body
//! second. A request with both a bad id and a bad body reports the id
//! error.

use crate::error::{Error, Result};
use crate::json::parse_json;
use crate::model::ProductDraft;
use crate::router::Method;
use crate::server::{ApiResponse, Handler, Server};
use crate::store::ProductStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

const INVALID_ID: &str = "Invalid product ID";
const INVALID_PAYLOAD: &str = "Invalid request payload";
const NOT_FOUND: &str = "Product not found";

/// Body of a successful delete, `{"result": "successfully deleted"}`
#[derive(Serialize)]
struct DeleteResult<'a> {
    result: &'a str,
}

/// GET /products
async fn list_products(store: &ProductStore) -> ApiResponse {
    match store.list().await {
        Ok(products) => respond(200, &products),
        Err(e) => store_failure(&e),
    }
}

/// GET /product/{id}
async fn get_product(store: &ProductStore, id: Option<i64>) -> ApiResponse {
    let id = match id {
        Some(id) => id,
        None => return ApiResponse::error(400, INVALID_ID),
    };

    match store.get(id).await {
        Ok(Some(product)) => respond(200, &product),
        Ok(None) => ApiResponse::error(404, NOT_FOUND),
        Err(e) => store_failure(&e),
    }
}

/// POST /product
async fn create_product(store: &ProductStore, body: Option<String>) -> ApiResponse {
    let draft = match parse_draft(body.as_deref()) {
        Some(draft) => draft,
        None => return ApiResponse::error(400, INVALID_PAYLOAD),
    };

    match store.create(draft).await {
        Ok(product) => respond(201, &product),
        Err(e) => store_failure(&e),
    }
}

/// PUT /product/{id}
async fn update_product(store: &ProductStore, id: Option<i64>, body: Option<String>) -> ApiResponse {
    let id = match id {
        Some(id) => id,
        None => return ApiResponse::error(400, INVALID_ID),
    };
    let draft = match parse_draft(body.as_deref()) {
        Some(draft) => draft,
        None => return ApiResponse::error(400, INVALID_PAYLOAD),
    };

    match store.update(id, draft).await {
        Ok(product) => respond(200, &product),
        Err(e) => store_failure(&e),
    }
}

/// DELETE /product/{id}
async fn delete_product(store: &ProductStore, id: Option<i64>) -> ApiResponse {
    let id = match id {
        Some(id) => id,
        None => return ApiResponse::error(400, INVALID_ID),
    };

    match store.delete(id).await {
        Ok(()) => respond(
            200,
            &DeleteResult {
                result: "successfully deleted",
            },
        ),
        Err(e) => store_failure(&e),
    }
}

/// Serialize a success body with the given status
fn respond<T: Serialize>(status: u16, value: &T) -> ApiResponse {
    match crate::json::to_json(value) {
        Ok(body) => ApiResponse::json(body).with_status(status),
        Err(e) => store_failure(&e),
    }
}

/// Log a failed store operation and map it to a 500
///
/// The response body carries the error text, matching the rest of the
/// API's `{"error": ...}` shape.
fn store_failure(e: &Error) -> ApiResponse {
    error!("Store operation failed: {}", e);
    ApiResponse::error(500, &e.to_string())
}

/// Parse and validate a create/update payload
///
/// `None` covers every 400 case: absent body, malformed JSON, wrong
/// shape, empty name.
fn parse_draft(body: Option<&str>) -> Option<ProductDraft> {
    let draft: ProductDraft = parse_json(body?).ok()?;
    if draft.is_valid() {
        Some(draft)
    } else {
        None
    }
}

/// Register the product routes on a server
///
/// Handlers capture the store; the `{id:int}` parameter converts in the
/// router, so a non-numeric id reaches the handler as `None` and maps
/// to 400 without touching the store.
///
/// # Errors
///
/// Returns `Error::InvalidRoutePattern` if a route fails to register.
pub fn register(server: &mut Server, store: Arc<ProductStore>) -> Result<()> {
    let s = store.clone();
    let handler: Handler = Arc::new(move |_req, _m| {
        let store = s.clone();
        Box::pin(async move { list_products(&store).await })
    });
    server.add_route(Method::Get, "/products", handler)?;

    let s = store.clone();
    let handler: Handler = Arc::new(move |_req, m| {
        let store = s.clone();
        let id = m.get_int("id");
        Box::pin(async move { get_product(&store, id).await })
    });
    server.add_route(Method::Get, "/product/{id:int}", handler)?;

    let s = store.clone();
    let handler: Handler = Arc::new(move |req, _m| {
        let store = s.clone();
        let body = req.body_str().map(str::to_owned);
        Box::pin(async move { create_product(&store, body).await })
    });
    server.add_route(Method::Post, "/product", handler)?;

    let s = store.clone();
    let handler: Handler = Arc::new(move |req, m| {
        let store = s.clone();
        let id = m.get_int("id");
        let body = req.body_str().map(str::to_owned);
        Box::pin(async move { update_product(&store, id, body).await })
    });
    server.add_route(Method::Put, "/product/{id:int}", handler)?;

    let s = store;
    let handler: Handler = Arc::new(move |_req, m| {
        let store = s.clone();
        let id = m.get_int("id");
        Box::pin(async move { delete_product(&store, id).await })
    });
    server.add_route(Method::Delete, "/product/{id:int}", handler)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabasePool;
    use hyper::body::Bytes;
    use std::collections::HashMap;

    const PRODUCTS_DDL: &str = "CREATE TABLE IF NOT EXISTS products (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, quantity INTEGER, price REAL)";

    async fn test_server() -> Server {
        let pool = DatabasePool::connect_sqlite("sqlite::memory:", Some(1))
            .await
            .unwrap();
        pool.execute(PRODUCTS_DDL, &[]).await.unwrap();

        let store = Arc::new(ProductStore::new(pool));
        let mut server = Server::new();
        register(&mut server, store).unwrap();
        server
    }

    async fn send(server: &Server, method: Method, path: &str, body: Option<&str>) -> ApiResponse {
        server
            .test_request(
                method,
                path.to_string(),
                HashMap::new(),
                body.map(|b| Bytes::from(b.to_owned())),
            )
            .await
    }

    fn json_body(resp: &ApiResponse) -> serde_json::Value {
        serde_json::from_str(&resp.body).unwrap()
    }

    #[tokio::test]
    async fn test_empty_table_lists_empty_array() {
        let server = test_server().await;

        let resp = send(&server, Method::Get, "/products", None).await;

        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, "application/json");
        assert_eq!(resp.body, "[]");
    }

    #[tokio::test]
    async fn test_get_missing_product_is_404() {
        let server = test_server().await;

        let resp = send(&server, Method::Get, "/product/11", None).await;

        assert_eq!(resp.status, 404);
        assert_eq!(json_body(&resp)["error"], "Product not found");
    }

    #[tokio::test]
    async fn test_get_non_numeric_id_is_400() {
        let server = test_server().await;

        let resp = send(&server, Method::Get, "/product/abc", None).await;

        assert_eq!(resp.status, 400);
        assert_eq!(json_body(&resp)["error"], "Invalid product ID");
    }

    #[tokio::test]
    async fn test_create_product() {
        let server = test_server().await;

        let resp = send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "keyboard", "quantity": 100, "price": 140.0}"#),
        )
        .await;

        assert_eq!(resp.status, 201);
        let body = json_body(&resp);
        assert_eq!(body["id"].as_i64(), Some(1));
        assert_eq!(body["name"], "keyboard");
        assert_eq!(body["quantity"].as_i64(), Some(100));
        assert_eq!(body["price"].as_f64(), Some(140.0));
    }

    #[tokio::test]
    async fn test_create_malformed_body_is_400() {
        let server = test_server().await;

        let resp = send(&server, Method::Post, "/product", Some("this is not json")).await;

        assert_eq!(resp.status, 400);
        assert_eq!(json_body(&resp)["error"], "Invalid request payload");
    }

    #[tokio::test]
    async fn test_create_without_body_is_400() {
        let server = test_server().await;

        let resp = send(&server, Method::Post, "/product", None).await;

        assert_eq!(resp.status, 400);
        assert_eq!(json_body(&resp)["error"], "Invalid request payload");
    }

    #[tokio::test]
    async fn test_create_empty_name_is_400() {
        let server = test_server().await;

        let resp = send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "", "quantity": 1, "price": 2.0}"#),
        )
        .await;

        assert_eq!(resp.status, 400);
        assert_eq!(json_body(&resp)["error"], "Invalid request payload");
    }

    #[tokio::test]
    async fn test_create_ignores_client_supplied_id() {
        let server = test_server().await;

        let resp = send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"id": 999, "name": "keyboard", "quantity": 1, "price": 2.0}"#),
        )
        .await;

        assert_eq!(resp.status, 201);
        assert_eq!(json_body(&resp)["id"].as_i64(), Some(1));
    }

    #[tokio::test]
    async fn test_create_missing_quantity_defaults_to_zero() {
        let server = test_server().await;

        let resp = send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "mouse", "price": 19.99}"#),
        )
        .await;

        assert_eq!(resp.status, 201);
        assert_eq!(json_body(&resp)["quantity"].as_i64(), Some(0));
    }

    #[tokio::test]
    async fn test_get_product_roundtrip() {
        let server = test_server().await;

        send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "keyboard", "quantity": 100, "price": 140.0}"#),
        )
        .await;

        let resp = send(&server, Method::Get, "/product/1", None).await;

        assert_eq!(resp.status, 200);
        let body = json_body(&resp);
        assert_eq!(body["id"].as_i64(), Some(1));
        assert_eq!(body["name"], "keyboard");
        assert_eq!(body["quantity"].as_i64(), Some(100));
        assert_eq!(body["price"].as_f64(), Some(140.0));
    }

    #[tokio::test]
    async fn test_update_product() {
        let server = test_server().await;

        send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "keyboard", "quantity": 100, "price": 140.0}"#),
        )
        .await;

        let resp = send(
            &server,
            Method::Put,
            "/product/1",
            Some(r#"{"name": "keyboard pro", "quantity": 90, "price": 160.0}"#),
        )
        .await;

        assert_eq!(resp.status, 200);
        let body = json_body(&resp);
        assert_eq!(body["id"].as_i64(), Some(1));
        assert_eq!(body["name"], "keyboard pro");

        let fetched = send(&server, Method::Get, "/product/1", None).await;
        let body = json_body(&fetched);
        assert_eq!(body["name"], "keyboard pro");
        assert_eq!(body["quantity"].as_i64(), Some(90));
        assert_eq!(body["price"].as_f64(), Some(160.0));
    }

    #[tokio::test]
    async fn test_update_path_id_wins_over_body_id() {
        let server = test_server().await;

        send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "keyboard", "quantity": 100, "price": 140.0}"#),
        )
        .await;

        let resp = send(
            &server,
            Method::Put,
            "/product/1",
            Some(r#"{"id": 999, "name": "renamed", "quantity": 1, "price": 1.0}"#),
        )
        .await;

        assert_eq!(resp.status, 200);
        assert_eq!(json_body(&resp)["id"].as_i64(), Some(1));

        let fetched = send(&server, Method::Get, "/product/1", None).await;
        assert_eq!(json_body(&fetched)["name"], "renamed");
    }

    #[tokio::test]
    async fn test_update_non_numeric_id_is_400() {
        let server = test_server().await;

        let resp = send(
            &server,
            Method::Put,
            "/product/abc",
            Some(r#"{"name": "keyboard", "quantity": 1, "price": 2.0}"#),
        )
        .await;

        assert_eq!(resp.status, 400);
        assert_eq!(json_body(&resp)["error"], "Invalid product ID");
    }

    #[tokio::test]
    async fn test_update_checks_id_before_body() {
        let server = test_server().await;

        let resp = send(&server, Method::Put, "/product/abc", Some("not json")).await;

        assert_eq!(resp.status, 400);
        assert_eq!(json_body(&resp)["error"], "Invalid product ID");
    }

    #[tokio::test]
    async fn test_update_malformed_body_is_400() {
        let server = test_server().await;

        let resp = send(&server, Method::Put, "/product/1", Some("not json")).await;

        assert_eq!(resp.status, 400);
        assert_eq!(json_body(&resp)["error"], "Invalid request payload");
    }

    #[tokio::test]
    async fn test_update_missing_product_reports_success() {
        let server = test_server().await;

        let resp = send(
            &server,
            Method::Put,
            "/product/42",
            Some(r#"{"name": "ghost", "quantity": 1, "price": 1.0}"#),
        )
        .await;

        assert_eq!(resp.status, 200);
        assert_eq!(json_body(&resp)["id"].as_i64(), Some(42));

        let fetched = send(&server, Method::Get, "/product/42", None).await;
        assert_eq!(fetched.status, 404);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let server = test_server().await;

        send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "keyboard", "quantity": 100, "price": 140.0}"#),
        )
        .await;

        let resp = send(&server, Method::Delete, "/product/1", None).await;

        assert_eq!(resp.status, 200);
        assert_eq!(json_body(&resp)["result"], "successfully deleted");

        let fetched = send(&server, Method::Get, "/product/1", None).await;
        assert_eq!(fetched.status, 404);
    }

    #[tokio::test]
    async fn test_delete_twice_reports_success_both_times() {
        let server = test_server().await;

        send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "keyboard", "quantity": 100, "price": 140.0}"#),
        )
        .await;

        let first = send(&server, Method::Delete, "/product/1", None).await;
        let second = send(&server, Method::Delete, "/product/1", None).await;

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 200);
        assert_eq!(json_body(&second)["result"], "successfully deleted");
    }

    #[tokio::test]
    async fn test_delete_non_numeric_id_is_400() {
        let server = test_server().await;

        let resp = send(&server, Method::Delete, "/product/abc", None).await;

        assert_eq!(resp.status, 400);
        assert_eq!(json_body(&resp)["error"], "Invalid product ID");
    }

    #[tokio::test]
    async fn test_trailing_slash_matches() {
        let server = test_server().await;

        send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "keyboard", "quantity": 100, "price": 140.0}"#),
        )
        .await;

        let list = send(&server, Method::Get, "/products/", None).await;
        assert_eq!(list.status, 200);

        let one = send(&server, Method::Get, "/product/1/", None).await;
        assert_eq!(one.status, 200);
        assert_eq!(json_body(&one)["name"], "keyboard");
    }

    #[tokio::test]
    async fn test_list_reflects_all_rows() {
        let server = test_server().await;

        for body in [
            r#"{"name": "keyboard", "quantity": 100, "price": 140.0}"#,
            r#"{"name": "mouse", "quantity": 5, "price": 19.99}"#,
        ] {
            send(&server, Method::Post, "/product", Some(body)).await;
        }

        let resp = send(&server, Method::Get, "/products", None).await;

        assert_eq!(resp.status, 200);
        let body = json_body(&resp);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "keyboard");
        assert_eq!(items[1]["name"], "mouse");
    }

    #[tokio::test]
    async fn test_crud_sequence() {
        let server = test_server().await;

        let created = send(
            &server,
            Method::Post,
            "/product",
            Some(r#"{"name": "keyboard", "quantity": 100, "price": 140.0}"#),
        )
        .await;
        assert_eq!(created.status, 201);

        let updated = send(
            &server,
            Method::Put,
            "/product/1",
            Some(r#"{"name": "keyboard", "quantity": 99, "price": 140.0}"#),
        )
        .await;
        assert_eq!(updated.status, 200);
        assert_eq!(json_body(&updated)["quantity"].as_i64(), Some(99));

        let deleted = send(&server, Method::Delete, "/product/1", None).await;
        assert_eq!(deleted.status, 200);

        let listed = send(&server, Method::Get, "/products", None).await;
        assert_eq!(listed.body, "[]");
    }
}
