use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use bizgrid_core::BusinessId;

/// Storage-layer error. Domain failures never originate here; this is
/// infrastructure only (backend IO, serialization).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored record could not be decoded: {0}")]
    Decode(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Tenant-scoped key/value store for business records.
///
/// There is deliberately no unscoped access: the business id is part of every
/// call, which makes cross-tenant reads a type-level impossibility for
/// callers of this trait.
#[async_trait]
pub trait ScopedStore<K, V>: Send + Sync {
    async fn get(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, StoreError>;

    async fn upsert(&self, business_id: BusinessId, key: K, value: V) -> Result<(), StoreError>;

    /// Remove a record; returns whether it existed.
    async fn remove(&self, business_id: BusinessId, key: &K) -> Result<bool, StoreError>;

    async fn list(&self, business_id: BusinessId) -> Result<Vec<V>, StoreError>;
}

#[async_trait]
impl<K, V, S> ScopedStore<K, V> for Arc<S>
where
    S: ScopedStore<K, V> + ?Sized,
    K: Send + Sync + 'static,
    V: Send + 'static,
{
    async fn get(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, StoreError> {
        (**self).get(business_id, key).await
    }

    async fn upsert(&self, business_id: BusinessId, key: K, value: V) -> Result<(), StoreError> {
        (**self).upsert(business_id, key, value).await
    }

    async fn remove(&self, business_id: BusinessId, key: &K) -> Result<bool, StoreError> {
        (**self).remove(business_id, key).await
    }

    async fn list(&self, business_id: BusinessId) -> Result<Vec<V>, StoreError> {
        (**self).list(business_id).await
    }
}

/// In-memory store for dev and tests, keyed `(BusinessId, K)`.
#[derive(Debug)]
pub struct InMemoryScopedStore<K, V> {
    inner: RwLock<HashMap<(BusinessId, K), V>>,
}

impl<K, V> InMemoryScopedStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryScopedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> ScopedStore<K, V> for InMemoryScopedStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&(business_id, key.clone())).cloned())
    }

    async fn upsert(&self, business_id: BusinessId, key: K, value: V) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert((business_id, key), value);
        Ok(())
    }

    async fn remove(&self, business_id: BusinessId, key: &K) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(map.remove(&(business_id, key.clone())).is_some())
    }

    async fn list(&self, business_id: BusinessId) -> Result<Vec<V>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .iter()
            .filter_map(|((b, _k), v)| (*b == business_id).then(|| v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_are_isolated_per_business() {
        let store: InMemoryScopedStore<u32, String> = InMemoryScopedStore::new();
        let biz_a = BusinessId::new();
        let biz_b = BusinessId::new();

        store.upsert(biz_a, 1, "alpha".to_string()).await.unwrap();
        store.upsert(biz_b, 1, "beta".to_string()).await.unwrap();

        assert_eq!(
            store.get(biz_a, &1).await.unwrap(),
            Some("alpha".to_string())
        );
        assert_eq!(
            store.get(biz_b, &1).await.unwrap(),
            Some("beta".to_string())
        );
        assert_eq!(store.list(biz_a).await.unwrap(), vec!["alpha".to_string()]);
    }

    #[tokio::test]
    async fn remove_reports_existence() {
        let store: InMemoryScopedStore<u32, String> = InMemoryScopedStore::new();
        let biz = BusinessId::new();

        store.upsert(biz, 7, "x".to_string()).await.unwrap();
        assert!(store.remove(biz, &7).await.unwrap());
        assert!(!store.remove(biz, &7).await.unwrap());
        assert_eq!(store.get(biz, &7).await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_in_one_business_does_not_touch_another() {
        let store: InMemoryScopedStore<u32, String> = InMemoryScopedStore::new();
        let biz_a = BusinessId::new();
        let biz_b = BusinessId::new();

        store.upsert(biz_a, 1, "keep".to_string()).await.unwrap();
        store.upsert(biz_b, 1, "gone".to_string()).await.unwrap();

        assert!(store.remove(biz_b, &1).await.unwrap());
        assert_eq!(
            store.get(biz_a, &1).await.unwrap(),
            Some("keep".to_string())
        );
    }
}
