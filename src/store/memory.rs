use async_trait::async_trait;
use keycore::KeyPairStructure;
use keycore::store::error::Result;
use keycore::store::{
    IdentityKeyStore, PreKeyRecordStructure, PreKeyStore, SignedPreKeyRecordStructure,
    SignedPreKeyStore,
};
use tokio::sync::{Mutex, RwLock};

use crate::store::GenerationLock;
use crate::store::generic::GenericMemoryStore;

type PreKeyMap = GenericMemoryStore<u32, PreKeyRecordStructure>;
type SignedPreKeyMap = GenericMemoryStore<u32, SignedPreKeyRecordStructure>;

/// Volatile key store, for tests and for embedding behind another persistence
/// layer.
#[derive(Default)]
pub struct MemoryStore {
    identity: RwLock<Option<KeyPairStructure>>,
    prekeys: PreKeyMap,
    signed_prekeys: SignedPreKeyMap,
    generation_lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GenerationLock for MemoryStore {
    fn generation_lock(&self) -> &Mutex<()> {
        &self.generation_lock
    }
}

#[async_trait]
impl IdentityKeyStore for MemoryStore {
    async fn load_identity_key_pair(&self) -> Result<Option<KeyPairStructure>> {
        Ok(self.identity.read().await.clone())
    }

    async fn store_identity_key_pair(&self, record: KeyPairStructure) -> Result<()> {
        *self.identity.write().await = Some(record);
        Ok(())
    }
}

#[async_trait]
impl PreKeyStore for MemoryStore {
    async fn load_prekey(&self, prekey_id: u32) -> Result<Option<PreKeyRecordStructure>> {
        Ok(self.prekeys.get(&prekey_id).await)
    }

    async fn store_prekey(&self, prekey_id: u32, record: PreKeyRecordStructure) -> Result<()> {
        self.prekeys.put(prekey_id, record).await;
        Ok(())
    }

    async fn remove_prekey(&self, prekey_id: u32) -> Result<()> {
        self.prekeys.remove(&prekey_id).await;
        Ok(())
    }

    async fn prekey_ids(&self) -> Result<Vec<u32>> {
        Ok(self.prekeys.keys().await)
    }
}

#[async_trait]
impl SignedPreKeyStore for MemoryStore {
    async fn load_signed_prekey(
        &self,
        signed_prekey_id: u32,
    ) -> Result<Option<SignedPreKeyRecordStructure>> {
        Ok(self.signed_prekeys.get(&signed_prekey_id).await)
    }

    async fn store_signed_prekey(
        &self,
        signed_prekey_id: u32,
        record: SignedPreKeyRecordStructure,
    ) -> Result<()> {
        self.signed_prekeys.put(signed_prekey_id, record).await;
        Ok(())
    }

    async fn remove_signed_prekey(&self, signed_prekey_id: u32) -> Result<()> {
        self.signed_prekeys.remove(&signed_prekey_id).await;
        Ok(())
    }

    async fn signed_prekey_ids(&self) -> Result<Vec<u32>> {
        Ok(self.signed_prekeys.keys().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keycore::{KeyPair, KeyStoreExt, PreKeyId, PreKeyRecord};

    #[tokio::test]
    async fn prekey_round_trip_and_removal() {
        let store = MemoryStore::new();
        let record = PreKeyRecord::new(PreKeyId::from(4), KeyPair::generate(&mut rand::rng()));

        store.store_pre_key_record(&record).await.unwrap();
        assert_eq!(store.prekey_ids().await.unwrap(), vec![4]);
        assert_eq!(
            store.load_pre_key_record(PreKeyId::from(4)).await.unwrap(),
            Some(record)
        );

        store.remove_prekey(4).await.unwrap();
        assert!(store.load_prekey(4).await.unwrap().is_none());
        assert!(store.prekey_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn removing_a_missing_record_is_not_an_error() {
        let store = MemoryStore::new();
        store.remove_prekey(1).await.unwrap();
        store.remove_signed_prekey(1).await.unwrap();
    }
}
