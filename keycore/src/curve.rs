//
// Copyright 2020-2021 Signal Messenger, LLC.
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Curve25519 keys in the Signal "DJB" encoding.
//!
//! Public keys serialize to 33 bytes: a one-byte [`KeyType`] tag followed by
//! the 32-byte Montgomery u-coordinate. Private keys are the raw 32-byte
//! scalar. Parsing untrusted bytes goes through [`crate::codec`].

mod curve25519;

use std::fmt;

use rand::{CryptoRng, Rng};
use subtle::ConstantTimeEq;

use crate::codec::ValidationError;

pub use curve25519::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Length of a serialized public key, type tag included.
pub const SERIALIZED_PUBLIC_KEY_LENGTH: usize = PUBLIC_KEY_LENGTH + 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyType {
    Djb,
}

impl KeyType {
    pub const fn value(&self) -> u8 {
        match self {
            KeyType::Djb => 0x05u8,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl TryFrom<u8> for KeyType {
    type Error = ValidationError;

    fn try_from(x: u8) -> Result<Self, ValidationError> {
        match x {
            0x05u8 => Ok(KeyType::Djb),
            t => Err(ValidationError::BadKeyType(t)),
        }
    }
}

#[derive(Clone, Copy, Eq)]
pub struct PublicKey {
    key: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    pub fn from_djb_public_key_bytes(key: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { key }
    }

    pub fn public_key_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.key
    }

    pub fn key_type(&self) -> KeyType {
        KeyType::Djb
    }

    /// Serialize to the 33-byte wire form (type tag + key bytes).
    pub fn serialize(&self) -> [u8; SERIALIZED_PUBLIC_KEY_LENGTH] {
        let mut result = [0u8; SERIALIZED_PUBLIC_KEY_LENGTH];
        result[0] = self.key_type().value();
        result[1..].copy_from_slice(&self.key);
        result
    }

    pub fn verify_signature(&self, message: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool {
        curve25519::PrivateKey::verify_signature(&self.key, &[message], signature)
    }
}

impl subtle::ConstantTimeEq for PublicKey {
    fn ct_eq(&self, other: &PublicKey) -> subtle::Choice {
        self.key.ct_eq(&other.key)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &PublicKey) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PublicKey {{ key_type={}, key={} }}",
            self.key_type(),
            hex::encode(self.key)
        )
    }
}

#[derive(Clone)]
pub struct PrivateKey {
    key: curve25519::PrivateKey,
}

impl PrivateKey {
    pub fn from_bytes(key: [u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self {
            key: curve25519::PrivateKey::from(key),
        }
    }

    pub fn serialize(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.key.private_key_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_djb_public_key_bytes(self.key.derive_public_key_bytes())
    }

    pub fn calculate_signature<R: CryptoRng + Rng>(
        &self,
        message: &[u8],
        csprng: &mut R,
    ) -> [u8; SIGNATURE_LENGTH] {
        self.key.calculate_signature(csprng, &[message])
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &PrivateKey) -> bool {
        bool::from(self.serialize().ct_eq(&other.serialize()))
    }
}

impl Eq for PrivateKey {}

// Never print private key material.
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PrivateKey { .. }")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl KeyPair {
    pub fn generate<R: Rng + CryptoRng>(csprng: &mut R) -> Self {
        let key = curve25519::PrivateKey::generate(csprng);
        let public_key = PublicKey::from_djb_public_key_bytes(key.derive_public_key_bytes());
        Self {
            public_key,
            private_key: PrivateKey { key },
        }
    }

    pub fn new(public_key: PublicKey, private_key: PrivateKey) -> Self {
        Self {
            public_key,
            private_key,
        }
    }

    pub fn calculate_signature<R: CryptoRng + Rng>(
        &self,
        message: &[u8],
        csprng: &mut R,
    ) -> [u8; SIGNATURE_LENGTH] {
        self.private_key.calculate_signature(message, csprng)
    }
}

impl From<PrivateKey> for KeyPair {
    fn from(private_key: PrivateKey) -> Self {
        Self::new(private_key.public_key(), private_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_public_key_carries_djb_tag() {
        let key_pair = KeyPair::generate(&mut rand::rng());
        let serialized = key_pair.public_key.serialize();

        assert_eq!(serialized.len(), 33);
        assert_eq!(serialized[0], 0x05);
        assert_eq!(&serialized[1..], key_pair.public_key.public_key_bytes());
    }

    #[test]
    fn signature_verifies_against_signer_public_key() {
        let mut rng = rand::rng();
        let signer = KeyPair::generate(&mut rng);
        let message = KeyPair::generate(&mut rng).public_key.serialize();

        let signature = signer.calculate_signature(&message, &mut rng);

        assert!(signer.public_key.verify_signature(&message, &signature));
    }

    #[test]
    fn signature_rejects_tampered_message_and_foreign_key() {
        let mut rng = rand::rng();
        let signer = KeyPair::generate(&mut rng);
        let other = KeyPair::generate(&mut rng);
        let message = b"signed prekey public material";

        let signature = signer.calculate_signature(message, &mut rng);

        assert!(!signer.public_key.verify_signature(b"something else", &signature));
        assert!(!other.public_key.verify_signature(message, &signature));
    }

    #[test]
    fn private_key_round_trips_exact_bytes() {
        let key_pair = KeyPair::generate(&mut rand::rng());
        let bytes = key_pair.private_key.serialize();
        let restored = PrivateKey::from_bytes(bytes);

        assert_eq!(restored.serialize(), bytes);
        assert_eq!(restored.public_key(), key_pair.public_key);
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let key_pair = KeyPair::generate(&mut rand::rng());
        let rendered = format!("{:?}", key_pair.private_key);
        assert_eq!(rendered, "PrivateKey { .. }");
    }
}
