use thiserror::Error;

use crate::codec::ValidationError;
use crate::primitive::SignatureError;
use crate::records::SignedPreKeyId;
use crate::store::{KeyKind, StoreError};

/// Errors surfaced by a prekey generation cycle.
#[derive(Debug, Error)]
pub enum PreKeyError {
    #[error("identity key is missing; the store has not been bootstrapped")]
    MissingIdentityKey,

    #[error("invalid prekey count {0}: at least one prekey must be generated")]
    InvalidCount(u32),

    #[error("{0} identifier space exhausted")]
    IdSpaceExhausted(KeyKind),

    #[error("key validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("key storage error: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("failed to purge {} stale signed prekey(s); retained {retained:?}", .failed.len())]
    RotationIncomplete {
        retained: Vec<SignedPreKeyId>,
        failed: Vec<(SignedPreKeyId, StoreError)>,
    },
}

pub type Result<T> = std::result::Result<T, PreKeyError>;
