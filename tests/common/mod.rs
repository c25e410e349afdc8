#![allow(dead_code)]

use std::sync::Arc;

use prekey_manager::{GenerationLock, KeyStore, PreKeyManager, bootstrap_identity};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A manager over `store` with an identity already bootstrapped.
pub async fn manager_with_identity<S: KeyStore + GenerationLock>(store: Arc<S>) -> PreKeyManager<S> {
    init_logging();
    bootstrap_identity(store.as_ref())
        .await
        .expect("bootstrap identity");
    PreKeyManager::new(store)
}

pub fn ids<T: Into<u32> + Copy>(ids: impl IntoIterator<Item = T>) -> Vec<u32> {
    ids.into_iter().map(Into::into).collect()
}
