//! # Snapshot Repository
//!
//! Keyed JSON documents, one per persisted store.
//!
//! ## Table Layout
//! ```text
//! ┌────────────────┬────────────────────────────────────────┬──────────────────────────┐
//! │ key (PK)       │ payload                                │ updated_at               │
//! ├────────────────┼────────────────────────────────────────┼──────────────────────────┤
//! │ cart-storage   │ {"items":[..],"totalItems":2,..}       │ 2024-01-15T10:30:00Z     │
//! │ auth-storage   │ {"user":{..},"isAuthenticated":true}   │ 2024-01-15T10:29:12Z     │
//! └────────────────┴────────────────────────────────────────┴──────────────────────────┘
//! ```
//!
//! Writes are whole-document upserts. The repository does not interpret
//! payloads; the typed helpers only run them through serde.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Storage keys of the persisted stores.
pub mod keys {
    /// The cart ledger.
    pub const CART: &str = "cart-storage";
    /// The session.
    pub const AUTH: &str = "auth-storage";
}

/// Repository for the `snapshots` table.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Raw payload stored under `key`, if any.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM snapshots WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(payload)
    }

    /// Stores `payload` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, payload: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO snapshots (key, payload, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = payload.len(), "Snapshot written");
        Ok(())
    }

    /// Removes the snapshot under `key`. Returns whether one existed.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM snapshots WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of stored snapshots.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snapshots")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Decodes the snapshot under `key`.
    ///
    /// ## Returns
    /// * `Ok(None)` - Nothing stored yet
    /// * `Err(DbError::Serialization)` - Stored payload doesn't decode as `T`
    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get(key).await? {
            Some(payload) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|e| DbError::serialization(key, e)),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it under `key`.
    pub async fn save_json<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let payload = serde_json::to_string(value).map_err(|e| DbError::serialization(key, e))?;
        self.put(key, &payload).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use storefront_core::{CartLedger, Identity, Money, ProductCandidate, Session};

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.snapshots().get(keys::CART).await.unwrap(), None);

        let cart: Option<CartLedger> = db.snapshots().load_json(keys::CART).await.unwrap();
        assert!(cart.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_previous_payload() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.snapshots();

        repo.put("k", "1").await.unwrap();
        repo.put("k", "2").await.unwrap();

        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.snapshots();

        repo.put(keys::AUTH, "{}").await.unwrap();
        assert!(repo.delete(keys::AUTH).await.unwrap());
        assert!(!repo.delete(keys::AUTH).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cart_round_trip() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.snapshots();

        let mut cart = CartLedger::new();
        cart.add_item(ProductCandidate::new("1", "Wireless Headphones", Money::from_cents(9999)));
        cart.add_item(ProductCandidate::new("1", "Wireless Headphones", Money::from_cents(9999)));
        repo.save_json(keys::CART, &cart).await.unwrap();

        let raw = repo.get(keys::CART).await.unwrap().unwrap();
        assert!(raw.contains("\"totalItems\":2"));

        let restored: CartLedger = repo.load_json(keys::CART).await.unwrap().unwrap();
        assert_eq!(restored, cart);
        assert_eq!(restored.total_price(), Money::from_cents(19998));
    }

    #[tokio::test]
    async fn test_tampered_cart_totals_are_rederived() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.snapshots();

        repo.put(
            keys::CART,
            r#"{"items":[{"id":"4","name":"Coffee Mug","price":1999,"quantity":3}],
                "totalItems":99,"totalPrice":1}"#,
        )
        .await
        .unwrap();

        let cart: CartLedger = repo.load_json(keys::CART).await.unwrap().unwrap();
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.total_price(), Money::from_cents(5997));
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.snapshots();

        let mut session = Session::new();
        session.set_identity(Identity::new("1", "admin@example.com", "Admin User"));
        repo.save_json(keys::AUTH, &session).await.unwrap();

        let restored: Session = repo.load_json(keys::AUTH).await.unwrap().unwrap();
        assert!(restored.is_authenticated());
        assert_eq!(restored, session);
    }

    #[tokio::test]
    async fn test_garbage_payload_is_serialization_error() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.snapshots();
        repo.put(keys::AUTH, "not json").await.unwrap();

        let result: DbResult<Option<Session>> = repo.load_json(keys::AUTH).await;
        assert!(matches!(result, Err(DbError::Serialization { .. })));
    }
}
