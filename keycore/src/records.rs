//! Typed prekey records, as held in memory after validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::curve::{KeyPair, PublicKey, SIGNATURE_LENGTH};

macro_rules! key_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

key_id!(
    /// Identifier of a one-time prekey.
    PreKeyId
);
key_id!(
    /// Identifier of a signed prekey.
    SignedPreKeyId
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreKeyRecord {
    id: PreKeyId,
    key_pair: KeyPair,
}

impl PreKeyRecord {
    pub fn new(id: PreKeyId, key_pair: KeyPair) -> Self {
        Self { id, key_pair }
    }

    pub fn id(&self) -> PreKeyId {
        self.id
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.key_pair.public_key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPreKeyRecord {
    id: SignedPreKeyId,
    key_pair: KeyPair,
    signature: [u8; SIGNATURE_LENGTH],
    timestamp: DateTime<Utc>,
}

impl SignedPreKeyRecord {
    pub fn new(
        id: SignedPreKeyId,
        key_pair: KeyPair,
        signature: [u8; SIGNATURE_LENGTH],
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            key_pair,
            signature,
            timestamp,
        }
    }

    pub fn id(&self) -> SignedPreKeyId {
        self.id
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.key_pair.public_key
    }

    pub fn signature(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.signature
    }

    /// Creation time. Informational only; retention never looks at it.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
