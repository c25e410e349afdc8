//! The publishable key bundle.
//!
//! A bundle carries public material only. It serializes to JSON with keys and
//! signatures base64-encoded; deserializing re-validates every key.

use serde::{Deserialize, Serialize};

use crate::curve::{PublicKey, SIGNATURE_LENGTH};
use crate::identity::IdentityKey;
use crate::records::{PreKeyId, PreKeyRecord, SignedPreKeyId, SignedPreKeyRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPreKey {
    pub key_id: PreKeyId,
    #[serde(with = "serde_public_key")]
    pub public_key: PublicKey,
}

impl From<&PreKeyRecord> for PublicPreKey {
    fn from(record: &PreKeyRecord) -> Self {
        Self {
            key_id: record.id(),
            public_key: *record.public_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSignedPreKey {
    pub key_id: SignedPreKeyId,
    #[serde(with = "serde_public_key")]
    pub public_key: PublicKey,
    #[serde(with = "serde_signature")]
    pub signature: [u8; SIGNATURE_LENGTH],
}

impl From<&SignedPreKeyRecord> for PublicSignedPreKey {
    fn from(record: &SignedPreKeyRecord) -> Self {
        Self {
            key_id: record.id(),
            public_key: *record.public_key(),
            signature: *record.signature(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBundle {
    /// Newly minted one-time prekeys, ascending by id.
    pub pre_keys: Vec<PublicPreKey>,
    pub signed_pre_key: PublicSignedPreKey,
    #[serde(with = "serde_identity_key")]
    pub identity_key: IdentityKey,
}

impl KeyBundle {
    /// Checks the signed prekey's signature against the bundle's identity key.
    pub fn verify_signature(&self) -> bool {
        self.identity_key.public_key().verify_signature(
            &self.signed_pre_key.public_key.serialize(),
            &self.signed_pre_key.signature,
        )
    }
}

mod serde_public_key {
    use base64::Engine;
    use base64::prelude::BASE64_STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::codec;
    use crate::curve::PublicKey;

    pub fn serialize<S: Serializer>(key: &PublicKey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(key.serialize()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PublicKey, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = BASE64_STANDARD.decode(encoded).map_err(D::Error::custom)?;
        codec::validate_public_key(&bytes).map_err(D::Error::custom)
    }
}

mod serde_identity_key {
    use serde::{Deserializer, Serializer};

    use crate::identity::IdentityKey;

    pub fn serialize<S: Serializer>(key: &IdentityKey, serializer: S) -> Result<S::Ok, S::Error> {
        super::serde_public_key::serialize(key.public_key(), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IdentityKey, D::Error> {
        super::serde_public_key::deserialize(deserializer).map(IdentityKey::new)
    }
}

mod serde_signature {
    use base64::Engine;
    use base64::prelude::BASE64_STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::codec;
    use crate::curve::SIGNATURE_LENGTH;

    pub fn serialize<S: Serializer>(
        signature: &[u8; SIGNATURE_LENGTH],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(signature))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; SIGNATURE_LENGTH], D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = BASE64_STANDARD.decode(encoded).map_err(D::Error::custom)?;
        codec::validate_signature(&bytes).map_err(D::Error::custom)
    }
}
