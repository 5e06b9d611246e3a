//! # Product Store
//!
//! Data access for the products table. One logical operation maps to
//! exactly one parameterized SQL statement; values are always bound,
//! never interpolated into the statement text.
//!
//! ## Design Principles (SOLID)
//!
//! - **S**: Only product persistence, no HTTP concerns
//! - **D**: Depends on `DatabasePool`, not a concrete driver

use crate::database::{Backend, DatabasePool, DbValue};
use crate::error::Result;
use crate::model::{Product, ProductDraft};
use std::collections::HashMap;

const LIST_SQL: &str = "SELECT id, name, quantity, price FROM products";

const GET_SQLITE: &str = "SELECT name, quantity, price FROM products WHERE id = ?";
const GET_PG: &str = "SELECT name, quantity, price FROM products WHERE id = $1";

const INSERT_SQLITE: &str = "INSERT INTO products (name, quantity, price) VALUES (?, ?, ?)";
const INSERT_PG: &str =
    "INSERT INTO products (name, quantity, price) VALUES ($1, $2, $3) RETURNING id";

const UPDATE_SQLITE: &str =
    "UPDATE products SET name = ?, quantity = ?, price = ? WHERE id = ?";
const UPDATE_PG: &str =
    "UPDATE products SET name = $1, quantity = $2, price = $3 WHERE id = $4";

const DELETE_SQLITE: &str = "DELETE FROM products WHERE id = ?";
const DELETE_PG: &str = "DELETE FROM products WHERE id = $1";

/// SQL-backed store for product rows
///
/// Cheap to clone; the inner pool is shared.
#[derive(Clone)]
pub struct ProductStore {
    pool: DatabasePool,
}

impl ProductStore {
    /// Create a store over an existing pool
    #[must_use]
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Fetch all products, in store order
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>> {
        let rows = self.pool.fetch_all(LIST_SQL, &[]).await?;
        Ok(rows
            .iter()
            .map(|row| {
                let id = row.get("id").and_then(DbValue::as_i64).unwrap_or(0);
                row_to_product(id, row)
            })
            .collect())
    }

    /// Fetch one product by id
    ///
    /// Returns `Ok(None)` when no row has this id; that case is distinct
    /// from a database failure.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the query fails.
    pub async fn get(&self, id: i64) -> Result<Option<Product>> {
        let sql = self.dialect(GET_SQLITE, GET_PG);
        let row = self.pool.fetch_optional(sql, &[DbValue::Int(id)]).await?;
        Ok(row.map(|r| row_to_product(id, &r)))
    }

    /// Insert a new product and return it with the store-assigned id
    ///
    /// SQLite reports the id via `last_insert_rowid`; PostgreSQL via
    /// `RETURNING id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the insert fails.
    pub async fn create(&self, draft: ProductDraft) -> Result<Product> {
        let params = [
            DbValue::String(draft.name.clone()),
            DbValue::Int(draft.quantity),
            DbValue::Float(draft.price),
        ];

        let id = match self.pool.backend() {
            Backend::Sqlite => {
                let result = self.pool.execute(INSERT_SQLITE, &params).await?;
                result.last_insert_id.unwrap_or(0)
            }
            Backend::Postgres => {
                let row = self.pool.fetch_one(INSERT_PG, &params).await?;
                row.get("id").and_then(DbValue::as_i64).unwrap_or(0)
            }
        };

        Ok(draft.into_product(id))
    }

    /// Overwrite all mutable fields of the product with this id
    ///
    /// An id that matches no row is not an error: the statement affects
    /// zero rows and the returned Product echoes the input.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the statement fails.
    pub async fn update(&self, id: i64, draft: ProductDraft) -> Result<Product> {
        let params = [
            DbValue::String(draft.name.clone()),
            DbValue::Int(draft.quantity),
            DbValue::Float(draft.price),
            DbValue::Int(id),
        ];
        let sql = self.dialect(UPDATE_SQLITE, UPDATE_PG);
        self.pool.execute(sql, &params).await?;
        Ok(draft.into_product(id))
    }

    /// Delete the product with this id
    ///
    /// Same contract as [`Self::update`]: an id that matches no row still
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the statement fails.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let sql = self.dialect(DELETE_SQLITE, DELETE_PG);
        self.pool.execute(sql, &[DbValue::Int(id)]).await?;
        Ok(())
    }

    /// Pick the statement text for this pool's dialect
    fn dialect<'a>(&self, sqlite: &'a str, postgres: &'a str) -> &'a str {
        match self.pool.backend() {
            Backend::Sqlite => sqlite,
            Backend::Postgres => postgres,
        }
    }
}

/// Build a Product from a fetched row, id supplied by the caller
///
/// Column values coerce at this boundary: integer-affine `price` becomes
/// f64, NULL `quantity` becomes 0.
fn row_to_product(id: i64, row: &HashMap<String, DbValue>) -> Product {
    Product {
        id,
        name: row
            .get("name")
            .and_then(DbValue::as_str)
            .unwrap_or_default()
            .to_string(),
        quantity: row.get("quantity").and_then(DbValue::as_i64).unwrap_or(0),
        price: row.get("price").and_then(DbValue::as_f64).unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCTS_DDL: &str = "CREATE TABLE IF NOT EXISTS products (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, quantity INTEGER, price REAL)";

    async fn test_store() -> ProductStore {
        let pool = DatabasePool::connect_sqlite("sqlite::memory:", Some(1))
            .await
            .unwrap();
        pool.execute(PRODUCTS_DDL, &[]).await.unwrap();
        ProductStore::new(pool)
    }

    fn draft(name: &str, quantity: i64, price: f64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            quantity,
            price,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = test_store().await;

        let first = store.create(draft("keyboard", 100, 140.0)).await.unwrap();
        let second = store.create(draft("mouse", 5, 19.99)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.name, "keyboard");
        assert_eq!(first.quantity, 100);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = test_store().await;

        let result = store.get(11).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_roundtrip() {
        let store = test_store().await;

        let created = store.create(draft("keyboard", 100, 140.0)).await.unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_list_empty_then_populated() {
        let store = test_store().await;

        assert!(store.list().await.unwrap().is_empty());

        store.create(draft("keyboard", 100, 140.0)).await.unwrap();
        store.create(draft("mouse", 5, 19.99)).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "keyboard");
        assert_eq!(all[1].name, "mouse");
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let store = test_store().await;

        let created = store.create(draft("keyboard", 100, 140.0)).await.unwrap();
        let updated = store
            .update(created.id, draft("keyboard pro", 90, 160.0))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "keyboard pro");

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "keyboard pro");
        assert_eq!(fetched.quantity, 90);
        assert!((fetched.price - 160.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_update_missing_id_reports_success() {
        let store = test_store().await;

        let result = store.update(11, draft("ghost", 1, 1.0)).await;
        assert!(result.is_ok());
        assert!(store.get(11).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let store = test_store().await;

        let created = store.create(draft("keyboard", 100, 140.0)).await.unwrap();
        store.delete(created.id).await.unwrap();

        assert!(store.get(created.id).await.unwrap().is_none());

        // Deleting again is still success
        assert!(store.delete(created.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_integer_price_widens_to_float() {
        let store = test_store().await;

        let created = store.create(draft("cable", 3, 5.0)).await.unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();

        assert!((fetched.price - 5.0).abs() < f64::EPSILON);
    }
}
