//! Serialized record layouts, as persisted by a store.
//!
//! Stores keep raw bytes; nothing here is trusted until it has been through
//! [`crate::codec`] on the way back out.

use serde::{Deserialize, Serialize};

use crate::codec::KeyPairStructure;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreKeyRecordStructure {
    pub id: u32,
    pub key_pair: KeyPairStructure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPreKeyRecordStructure {
    pub id: u32,
    pub key_pair: KeyPairStructure,
    pub signature: Vec<u8>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}
