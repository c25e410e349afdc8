//! Prekey lifecycle core: key encoding, identifier allocation, signed prekey
//! retention and bundle assembly over an abstract async key store.
//!
//! This crate has no runtime dependency; serialization of generation cycles
//! and concrete stores live in the `prekey-manager` crate.

pub mod allocator;
pub mod assembler;
pub mod bundle;
pub mod codec;
pub mod curve;
pub mod error;
pub mod identity;
pub mod primitive;
pub mod records;
pub mod rotation;
pub mod store;

pub use assembler::BundleAssembler;
pub use bundle::{KeyBundle, PublicPreKey, PublicSignedPreKey};
pub use codec::{KeyPairStructure, ValidationError};
pub use curve::{KeyPair, PrivateKey, PublicKey};
pub use error::PreKeyError;
pub use identity::{IdentityKey, IdentityKeyPair};
pub use primitive::{Clock, CryptoProvider, Curve25519Provider, SignatureError, SystemClock};
pub use records::{PreKeyId, PreKeyRecord, SignedPreKeyId, SignedPreKeyRecord};
pub use rotation::{RotationOutcome, SIGNED_PRE_KEY_RETENTION};
pub use store::{KeyKind, KeyStore, KeyStoreExt, StoreError};
