//! Signed prekey retention.
//!
//! After each generation cycle only the newest two signed prekeys survive: the
//! one just created (active) and its predecessor (standby). Everything ranked
//! below them is retired. Ranking is by id over the full persisted set, so a
//! skipped or partially failed rotation converges on the next run.

use log::{debug, warn};

use crate::records::SignedPreKeyId;
use crate::store::{SignedPreKeyStore, StoreError};

/// Number of signed prekeys kept after a rotation.
pub const SIGNED_PRE_KEY_RETENTION: usize = 2;

#[derive(Debug, Default)]
pub struct RotationOutcome {
    /// Surviving ids, newest first.
    pub retained: Vec<SignedPreKeyId>,
    pub removed: Vec<SignedPreKeyId>,
    pub failed: Vec<(SignedPreKeyId, StoreError)>,
}

impl RotationOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Splits `ids` into (retained, stale), both sorted newest first.
pub(crate) fn partition_by_rank(ids: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let mut ranked = ids.to_vec();
    ranked.sort_unstable_by(|a, b| b.cmp(a));
    ranked.dedup();
    let stale = ranked.split_off(ranked.len().min(SIGNED_PRE_KEY_RETENTION));
    (ranked, stale)
}

/// Deletes every signed prekey ranked below the newest two.
///
/// Deletions are attempted independently; a failed one is recorded in the
/// outcome and does not stop the rest. Only a failure to list the ids is
/// returned as an error.
///
/// `just_created` is advisory: ranking alone decides what survives, and a
/// mismatch with the newest persisted id is only logged.
pub async fn retain<S: SignedPreKeyStore>(
    store: &S,
    just_created: SignedPreKeyId,
) -> Result<RotationOutcome, StoreError> {
    let ids = store.signed_prekey_ids().await?;
    let (retained, stale) = partition_by_rank(&ids);

    if retained.first() != Some(&u32::from(just_created)) {
        warn!(
            target: "PreKeys",
            "Signed prekey {just_created} is not the newest persisted id (newest: {:?})",
            retained.first()
        );
    }

    let mut outcome = RotationOutcome {
        retained: retained.into_iter().map(SignedPreKeyId::from).collect(),
        ..Default::default()
    };

    for id in stale {
        match store.remove_signed_prekey(id).await {
            Ok(()) => {
                debug!(target: "PreKeys", "Retired signed prekey {id}");
                outcome.removed.push(id.into());
            }
            Err(e) => {
                warn!(target: "PreKeys", "Failed to retire signed prekey {id}: {e}");
                outcome.failed.push((id.into(), e));
            }
        }
    }

    Ok(outcome)
}
