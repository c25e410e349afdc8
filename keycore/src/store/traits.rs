use std::fmt;

use async_trait::async_trait;

use crate::codec::KeyPairStructure;
use crate::store::error::Result;
use crate::store::structures::{PreKeyRecordStructure, SignedPreKeyRecordStructure};

/// The three kinds of record a key store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Identity,
    PreKey,
    SignedPreKey,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Identity => f.write_str("identity key"),
            KeyKind::PreKey => f.write_str("one-time prekey"),
            KeyKind::SignedPreKey => f.write_str("signed prekey"),
        }
    }
}

/// Singleton identity key storage.
#[async_trait]
pub trait IdentityKeyStore: Send + Sync {
    async fn load_identity_key_pair(&self) -> Result<Option<KeyPairStructure>>;
    async fn store_identity_key_pair(&self, record: KeyPairStructure) -> Result<()>;
}

#[async_trait]
pub trait PreKeyStore: Send + Sync {
    async fn load_prekey(&self, prekey_id: u32) -> Result<Option<PreKeyRecordStructure>>;
    async fn store_prekey(&self, prekey_id: u32, record: PreKeyRecordStructure) -> Result<()>;
    async fn remove_prekey(&self, prekey_id: u32) -> Result<()>;
    /// Every persisted prekey id, in no particular order.
    async fn prekey_ids(&self) -> Result<Vec<u32>>;
}

#[async_trait]
pub trait SignedPreKeyStore: Send + Sync {
    async fn load_signed_prekey(
        &self,
        signed_prekey_id: u32,
    ) -> Result<Option<SignedPreKeyRecordStructure>>;
    async fn store_signed_prekey(
        &self,
        signed_prekey_id: u32,
        record: SignedPreKeyRecordStructure,
    ) -> Result<()>;
    async fn remove_signed_prekey(&self, signed_prekey_id: u32) -> Result<()>;
    /// Every persisted signed prekey id, in no particular order.
    async fn signed_prekey_ids(&self) -> Result<Vec<u32>>;
}

pub trait KeyStore: IdentityKeyStore + PreKeyStore + SignedPreKeyStore {}

impl<T: IdentityKeyStore + PreKeyStore + SignedPreKeyStore> KeyStore for T {}
