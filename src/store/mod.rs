pub mod filestore;
pub mod generic;
pub mod memory;

pub use filestore::FileStore;
pub use memory::MemoryStore;

use keycore::{
    IdentityKey, IdentityKeyPair, KeyPair, KeyPairStructure, KeyStore, KeyStoreExt, PreKeyError,
};
use log::info;
use tokio::sync::Mutex;

/// A key store that carries the lock serializing generation cycles against it.
///
/// Every manager over the same store contends for this one lock, however
/// many managers are built around it.
pub trait GenerationLock {
    fn generation_lock(&self) -> &Mutex<()>;
}

/// Creates the store's identity key pair if it has none, and returns the
/// public identity either way. An existing identity is never replaced.
pub async fn bootstrap_identity<S: KeyStore>(store: &S) -> Result<IdentityKey, PreKeyError> {
    if let Some(identity) = store.load_identity().await? {
        return Ok(*identity.identity_key());
    }

    let identity = IdentityKeyPair::generate(&mut rand::rng());
    store
        .store_identity_key_pair(KeyPairStructure::from(&KeyPair::from(&identity)))
        .await?;
    info!(
        target: "PreKeys",
        "Bootstrapped new identity key {}",
        hex::encode(identity.identity_key().serialize())
    );
    Ok(*identity.identity_key())
}
