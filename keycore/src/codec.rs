//! Validation of key pairs in their fixed wire encoding.
//!
//! A serialized key pair is a 33-byte public key whose first byte is the
//! [`KeyType::Djb`] tag, and a 32-byte private key. Anything else is rejected;
//! input is never truncated or padded to fit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curve::{
    KeyPair, KeyType, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, PrivateKey, PublicKey,
    SERIALIZED_PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
};

#[derive(Debug, Clone, PartialEq, Eq, displaydoc::Display)]
pub enum ValidationError {
    /// bad public key length <{0}>, expected 33
    BadPublicKeyLength(usize),
    /// bad key type <{0}>
    BadKeyType(u8),
    /// bad private key length <{0}>, expected 32
    BadPrivateKeyLength(usize),
    /// bad signature length <{0}>, expected 64
    BadSignatureLength(usize),
    /// timestamp <{0}> is out of range
    BadTimestamp(i64),
}

impl std::error::Error for ValidationError {}

/// A key pair as raw bytes, before validation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPairStructure {
    pub public_key: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl fmt::Debug for KeyPairStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairStructure")
            .field("public_key", &hex::encode(&self.public_key))
            .field("private_key", &format_args!("<{} bytes>", self.private_key.len()))
            .finish()
    }
}

impl From<&KeyPair> for KeyPairStructure {
    fn from(key_pair: &KeyPair) -> Self {
        Self {
            public_key: key_pair.public_key.serialize().to_vec(),
            private_key: key_pair.private_key.serialize().to_vec(),
        }
    }
}

pub fn validate_public_key(value: &[u8]) -> Result<PublicKey, ValidationError> {
    if value.len() != SERIALIZED_PUBLIC_KEY_LENGTH {
        return Err(ValidationError::BadPublicKeyLength(value.len()));
    }
    match KeyType::try_from(value[0])? {
        KeyType::Djb => {
            let mut key = [0u8; PUBLIC_KEY_LENGTH];
            key.copy_from_slice(&value[1..]);
            Ok(PublicKey::from_djb_public_key_bytes(key))
        }
    }
}

pub fn validate_private_key(value: &[u8]) -> Result<PrivateKey, ValidationError> {
    let key: [u8; PRIVATE_KEY_LENGTH] = value
        .try_into()
        .map_err(|_| ValidationError::BadPrivateKeyLength(value.len()))?;
    Ok(PrivateKey::from_bytes(key))
}

pub fn validate_signature(value: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], ValidationError> {
    value
        .try_into()
        .map_err(|_| ValidationError::BadSignatureLength(value.len()))
}

/// Checks both halves of `candidate` against the wire encoding.
///
/// No cryptographic check is made that the halves belong together.
pub fn validate(candidate: &KeyPairStructure) -> Result<KeyPair, ValidationError> {
    let public_key = validate_public_key(&candidate.public_key)?;
    let private_key = validate_private_key(&candidate.private_key)?;
    Ok(KeyPair::new(public_key, private_key))
}
