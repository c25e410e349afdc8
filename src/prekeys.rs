use std::sync::Arc;

use keycore::{
    BundleAssembler, Clock, CryptoProvider, Curve25519Provider, KeyBundle, KeyStore, PreKeyError,
    SystemClock,
};
use log::debug;

use crate::config::PreKeyManagerConfig;
use crate::store::GenerationLock;

/// Entry point for prekey generation against one key store.
///
/// Cycles are serialized on the store's [`GenerationLock`]: at most one
/// `generate*` call runs against a store at a time, across every manager built
/// on it. Readers of already persisted prekeys may use the store concurrently.
pub struct PreKeyManager<S, C = Curve25519Provider, K = SystemClock> {
    store: Arc<S>,
    assembler: Arc<BundleAssembler<C, K>>,
    config: PreKeyManagerConfig,
}

impl<S, C, K> Clone for PreKeyManager<S, C, K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            assembler: Arc::clone(&self.assembler),
            config: self.config.clone(),
        }
    }
}

impl<S: KeyStore + GenerationLock> PreKeyManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_assembler(store, BundleAssembler::new(Curve25519Provider, SystemClock))
    }
}

impl<S, C, K> PreKeyManager<S, C, K>
where
    S: KeyStore + GenerationLock,
    C: CryptoProvider,
    K: Clock,
{
    pub fn with_assembler(store: Arc<S>, assembler: BundleAssembler<C, K>) -> Self {
        Self {
            store,
            assembler: Arc::new(assembler),
            config: PreKeyManagerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PreKeyManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &PreKeyManagerConfig {
        &self.config
    }

    /// Mints `count` one-time prekeys and a new signed prekey, retires stale
    /// signed prekeys and returns the public bundle.
    pub async fn generate(&self, count: u32) -> Result<KeyBundle, PreKeyError> {
        self.generate_with_progress(count, |_, _| {}).await
    }

    /// Like [`Self::generate`], calling `progress(done, total)` after each
    /// one-time prekey is persisted.
    pub async fn generate_with_progress<P>(
        &self,
        count: u32,
        progress: P,
    ) -> Result<KeyBundle, PreKeyError>
    where
        P: Fn(u32, u32) + Send + Sync,
    {
        let _guard = self.store.generation_lock().lock().await;
        debug!(target: "PreKeys", "Acquired generation lock for {count} prekeys");
        self.assembler
            .generate_with_progress(self.store.as_ref(), count, &progress)
            .await
    }

    /// Runs a cycle with the configured batch size.
    pub async fn generate_batch(&self) -> Result<KeyBundle, PreKeyError> {
        self.generate(self.config.batch_size).await
    }
}
