//! The cryptographic and clock capabilities a generation cycle consumes.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::codec::KeyPairStructure;
use crate::curve::{KeyPair, PrivateKey, SIGNATURE_LENGTH};

#[derive(Debug, Error)]
#[error("signature calculation failed: {0}")]
pub struct SignatureError(pub String);

/// Key pair generation and signing.
///
/// Generated pairs are returned in wire form and validated by the caller, so
/// a faulty implementation cannot smuggle a malformed key into the store.
pub trait CryptoProvider: Send + Sync {
    fn generate_key_pair(&self) -> KeyPairStructure;

    fn sign(
        &self,
        private_key: &PrivateKey,
        message: &[u8],
    ) -> Result<[u8; SIGNATURE_LENGTH], SignatureError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Curve25519 keys with XEdDSA signatures, seeded from the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct Curve25519Provider;

impl CryptoProvider for Curve25519Provider {
    fn generate_key_pair(&self) -> KeyPairStructure {
        KeyPairStructure::from(&KeyPair::generate(&mut rand::rng()))
    }

    fn sign(
        &self,
        private_key: &PrivateKey,
        message: &[u8],
    ) -> Result<[u8; SIGNATURE_LENGTH], SignatureError> {
        Ok(private_key.calculate_signature(message, &mut rand::rng()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
