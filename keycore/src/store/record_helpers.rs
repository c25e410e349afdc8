use async_trait::async_trait;
use chrono::DateTime;

use crate::codec::{self, KeyPairStructure, ValidationError};
use crate::error::PreKeyError;
use crate::identity::IdentityKeyPair;
use crate::records::{PreKeyId, PreKeyRecord, SignedPreKeyId, SignedPreKeyRecord};
use crate::store::error::StoreError;
use crate::store::structures::{PreKeyRecordStructure, SignedPreKeyRecordStructure};
use crate::store::traits::KeyStore;

pub fn pre_key_record_to_structure(record: &PreKeyRecord) -> PreKeyRecordStructure {
    PreKeyRecordStructure {
        id: record.id().into(),
        key_pair: KeyPairStructure::from(record.key_pair()),
    }
}

pub fn pre_key_structure_to_record(
    structure: &PreKeyRecordStructure,
) -> Result<PreKeyRecord, ValidationError> {
    let key_pair = codec::validate(&structure.key_pair)?;
    Ok(PreKeyRecord::new(structure.id.into(), key_pair))
}

pub fn signed_pre_key_record_to_structure(
    record: &SignedPreKeyRecord,
) -> SignedPreKeyRecordStructure {
    SignedPreKeyRecordStructure {
        id: record.id().into(),
        key_pair: KeyPairStructure::from(record.key_pair()),
        signature: record.signature().to_vec(),
        timestamp: record.timestamp().timestamp_millis(),
    }
}

pub fn signed_pre_key_structure_to_record(
    structure: &SignedPreKeyRecordStructure,
) -> Result<SignedPreKeyRecord, ValidationError> {
    let key_pair = codec::validate(&structure.key_pair)?;
    let signature = codec::validate_signature(&structure.signature)?;
    let timestamp = DateTime::from_timestamp_millis(structure.timestamp)
        .ok_or(ValidationError::BadTimestamp(structure.timestamp))?;
    Ok(SignedPreKeyRecord::new(
        structure.id.into(),
        key_pair,
        signature,
        timestamp,
    ))
}

/// Typed access to a [`KeyStore`]. Every record read back is re-validated.
#[async_trait]
pub trait KeyStoreExt: KeyStore {
    async fn load_identity(&self) -> Result<Option<IdentityKeyPair>, PreKeyError>;
    async fn load_pre_key_record(&self, id: PreKeyId)
    -> Result<Option<PreKeyRecord>, PreKeyError>;
    async fn load_signed_pre_key_record(
        &self,
        id: SignedPreKeyId,
    ) -> Result<Option<SignedPreKeyRecord>, PreKeyError>;
    async fn store_pre_key_record(&self, record: &PreKeyRecord) -> Result<(), StoreError>;
    async fn store_signed_pre_key_record(
        &self,
        record: &SignedPreKeyRecord,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: KeyStore> KeyStoreExt for T {
    async fn load_identity(&self) -> Result<Option<IdentityKeyPair>, PreKeyError> {
        match self.load_identity_key_pair().await? {
            Some(structure) => Ok(Some(codec::validate(&structure)?.into())),
            None => Ok(None),
        }
    }

    async fn load_pre_key_record(
        &self,
        id: PreKeyId,
    ) -> Result<Option<PreKeyRecord>, PreKeyError> {
        match self.load_prekey(id.into()).await? {
            Some(structure) => Ok(Some(pre_key_structure_to_record(&structure)?)),
            None => Ok(None),
        }
    }

    async fn load_signed_pre_key_record(
        &self,
        id: SignedPreKeyId,
    ) -> Result<Option<SignedPreKeyRecord>, PreKeyError> {
        match self.load_signed_prekey(id.into()).await? {
            Some(structure) => Ok(Some(signed_pre_key_structure_to_record(&structure)?)),
            None => Ok(None),
        }
    }

    async fn store_pre_key_record(&self, record: &PreKeyRecord) -> Result<(), StoreError> {
        self.store_prekey(record.id().into(), pre_key_record_to_structure(record))
            .await
    }

    async fn store_signed_pre_key_record(
        &self,
        record: &SignedPreKeyRecord,
    ) -> Result<(), StoreError> {
        self.store_signed_prekey(
            record.id().into(),
            signed_pre_key_record_to_structure(record),
        )
        .await
    }
}
