use std::collections::HashMap;
use std::hash::Hash;

use tokio::sync::RwLock;

/// A `HashMap` behind an async read-write lock.
pub struct GenericMemoryStore<K, V>
where
    K: Eq + Hash + Send,
    V: Clone + Send,
{
    store: RwLock<HashMap<K, V>>,
}

impl<K, V> GenericMemoryStore<K, V>
where
    K: Eq + Hash + Send + Clone + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.store.read().await.get(key).cloned()
    }

    pub async fn put(&self, key: K, value: V) {
        self.store.write().await.insert(key, value);
    }

    pub async fn remove(&self, key: &K) -> Option<V> {
        self.store.write().await.remove(key)
    }

    pub async fn keys(&self) -> Vec<K> {
        self.store.read().await.keys().cloned().collect()
    }
}

impl<K, V> Default for GenericMemoryStore<K, V>
where
    K: Eq + Hash + Send + Clone + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}
