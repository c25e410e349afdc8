// Re-export the runtime-agnostic core
pub use keycore::{
    Clock, CryptoProvider, Curve25519Provider, IdentityKey, IdentityKeyPair, KeyBundle, KeyKind,
    KeyPair, KeyStore, KeyStoreExt, PreKeyError, PreKeyId, PreKeyRecord, PublicKey,
    SignedPreKeyId, SignedPreKeyRecord, StoreError, SystemClock, ValidationError,
};

pub mod config;
pub mod prekeys;
pub mod store;

pub use config::PreKeyManagerConfig;
pub use prekeys::PreKeyManager;
pub use store::{FileStore, GenerationLock, MemoryStore, bootstrap_identity};
