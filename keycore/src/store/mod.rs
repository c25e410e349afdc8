pub mod error;
pub mod record_helpers;
pub mod structures;
pub mod traits;

pub use error::StoreError;
pub use record_helpers::KeyStoreExt;
pub use structures::{PreKeyRecordStructure, SignedPreKeyRecordStructure};
pub use traits::{IdentityKeyStore, KeyKind, KeyStore, PreKeyStore, SignedPreKeyStore};
