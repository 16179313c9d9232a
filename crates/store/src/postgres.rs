//! Postgres-backed scoped store.
//!
//! Records are stored as JSONB documents in per-resource tables (see
//! `schema.sql`), keyed `(business_id, id)`. Every operation runs inside a
//! transaction that first applies `set_config('app.business_id', $1, true)`:
//! the database's row-level security policies read that setting to decide row
//! visibility, and because the setting is transaction-local it is released
//! automatically when the transaction commits or rolls back. Tenant isolation
//! is therefore enforced both structurally, by the `business_id` column in
//! every statement, and by RLS in the engine itself.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use bizgrid_core::BusinessId;

use crate::scoped::{ScopedStore, StoreError};

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Postgres document store for one resource table.
pub struct PgScopedStore<K, V> {
    pool: Arc<PgPool>,
    table: &'static str,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> PgScopedStore<K, V> {
    /// `table` must be a statically-known resource table name; it is spliced
    /// into SQL text (identifiers cannot be bound).
    pub fn new(pool: Arc<PgPool>, table: &'static str) -> Self {
        Self {
            pool,
            table,
            _marker: PhantomData,
        }
    }

    /// Open a transaction with the RLS tenant context applied.
    async fn begin_scoped(
        &self,
        business_id: BusinessId,
    ) -> Result<Transaction<'_, Postgres>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        sqlx::query("SELECT set_config('app.business_id', $1, true)")
            .bind(business_id.as_uuid().to_string())
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        Ok(tx)
    }
}

#[async_trait]
impl<K, V> ScopedStore<K, V> for PgScopedStore<K, V>
where
    K: Copy + Into<Uuid> + Send + Sync + 'static,
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, StoreError> {
        let mut tx = self.begin_scoped(business_id).await?;
        let key_uuid: Uuid = (*key).into();

        let row = sqlx::query(&format!(
            "SELECT doc FROM {} WHERE business_id = $1 AND id = $2",
            self.table
        ))
        .bind(business_id.as_uuid())
        .bind(key_uuid)
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;

        row.map(|row| {
            let doc: serde_json::Value = row.try_get("doc").map_err(backend)?;
            serde_json::from_value(doc).map_err(|e| StoreError::Decode(e.to_string()))
        })
        .transpose()
    }

    async fn upsert(&self, business_id: BusinessId, key: K, value: V) -> Result<(), StoreError> {
        let mut tx = self.begin_scoped(business_id).await?;
        let key_uuid: Uuid = key.into();
        let doc = serde_json::to_value(&value).map_err(|e| StoreError::Decode(e.to_string()))?;

        sqlx::query(&format!(
            "INSERT INTO {} (business_id, id, doc) VALUES ($1, $2, $3) \
             ON CONFLICT (business_id, id) DO UPDATE SET doc = EXCLUDED.doc",
            self.table
        ))
        .bind(business_id.as_uuid())
        .bind(key_uuid)
        .bind(doc)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)
    }

    async fn remove(&self, business_id: BusinessId, key: &K) -> Result<bool, StoreError> {
        let mut tx = self.begin_scoped(business_id).await?;
        let key_uuid: Uuid = (*key).into();

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE business_id = $1 AND id = $2",
            self.table
        ))
        .bind(business_id.as_uuid())
        .bind(key_uuid)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, business_id: BusinessId) -> Result<Vec<V>, StoreError> {
        let mut tx = self.begin_scoped(business_id).await?;

        let rows = sqlx::query(&format!(
            "SELECT doc FROM {} WHERE business_id = $1 ORDER BY id",
            self.table
        ))
        .bind(business_id.as_uuid())
        .fetch_all(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;

        rows.into_iter()
            .map(|row| {
                let doc: serde_json::Value = row.try_get("doc").map_err(backend)?;
                serde_json::from_value(doc).map_err(|e| StoreError::Decode(e.to_string()))
            })
            .collect()
    }
}
