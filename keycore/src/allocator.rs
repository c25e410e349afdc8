//! Identifier allocation for one-time and signed prekeys.
//!
//! The next id is always derived from what the store actually holds, never
//! from an in-memory counter, so allocation stays correct across restarts and
//! after a cycle that failed half way.

use crate::error::{PreKeyError, Result};
use crate::records::{PreKeyId, SignedPreKeyId};
use crate::store::{KeyKind, PreKeyStore, SignedPreKeyStore};

/// `max(ids) + 1`, with an empty set counting as 0. `None` on overflow.
pub(crate) fn next_after(ids: &[u32]) -> Option<u32> {
    ids.iter().copied().max().unwrap_or(0).checked_add(1)
}

pub async fn next_pre_key_id<S: PreKeyStore>(store: &S) -> Result<PreKeyId> {
    let ids = store.prekey_ids().await?;
    next_after(&ids)
        .map(PreKeyId::from)
        .ok_or(PreKeyError::IdSpaceExhausted(KeyKind::PreKey))
}

pub async fn next_signed_pre_key_id<S: SignedPreKeyStore>(store: &S) -> Result<SignedPreKeyId> {
    let ids = store.signed_prekey_ids().await?;
    next_after(&ids)
        .map(SignedPreKeyId::from)
        .ok_or(PreKeyError::IdSpaceExhausted(KeyKind::SignedPreKey))
}
