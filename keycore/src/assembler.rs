//! One prekey generation cycle.
//!
//! The assembler does not serialize cycles itself; callers must ensure only
//! one cycle runs against a given store at a time, otherwise two cycles can
//! read the same maximum id and collide.

use log::{debug, info};

use crate::allocator;
use crate::bundle::{KeyBundle, PublicPreKey, PublicSignedPreKey};
use crate::codec;
use crate::error::{PreKeyError, Result};
use crate::primitive::{Clock, CryptoProvider, Curve25519Provider, SystemClock};
use crate::records::{PreKeyId, PreKeyRecord, SignedPreKeyRecord};
use crate::rotation;
use crate::store::{KeyKind, KeyStore, KeyStoreExt};

#[derive(Debug, Clone, Default)]
pub struct BundleAssembler<C = Curve25519Provider, K = SystemClock> {
    crypto: C,
    clock: K,
}

impl<C: CryptoProvider, K: Clock> BundleAssembler<C, K> {
    pub fn new(crypto: C, clock: K) -> Self {
        Self { crypto, clock }
    }

    pub async fn generate<S: KeyStore>(&self, store: &S, count: u32) -> Result<KeyBundle> {
        self.generate_with_progress(store, count, &|_, _| {}).await
    }

    /// Runs a cycle, calling `progress(done, count)` after each one-time
    /// prekey is persisted.
    ///
    /// Every record referenced by the returned bundle has been persisted. On
    /// error no bundle is returned; records written before the failure stay
    /// in the store and the next cycle allocates past them.
    pub async fn generate_with_progress<S, P>(
        &self,
        store: &S,
        count: u32,
        progress: &P,
    ) -> Result<KeyBundle>
    where
        S: KeyStore,
        P: Fn(u32, u32) + Sync,
    {
        if count == 0 {
            return Err(PreKeyError::InvalidCount(count));
        }

        let identity = store
            .load_identity()
            .await?
            .ok_or(PreKeyError::MissingIdentityKey)?;

        let start_id = allocator::next_pre_key_id(store).await?;
        let end_id = u32::from(start_id)
            .checked_add(count - 1)
            .ok_or(PreKeyError::IdSpaceExhausted(KeyKind::PreKey))?;
        let signed_id = allocator::next_signed_pre_key_id(store).await?;

        debug!(
            target: "PreKeys",
            "Generating prekeys {start_id}..={end_id} and signed prekey {signed_id}"
        );

        let mut pre_keys = Vec::new();
        for (id, done) in (u32::from(start_id)..=end_id).zip(1..) {
            let key_pair = codec::validate(&self.crypto.generate_key_pair())?;
            let record = PreKeyRecord::new(PreKeyId::from(id), key_pair);
            store.store_pre_key_record(&record).await?;
            pre_keys.push(PublicPreKey::from(&record));
            progress(done, count);
        }

        let key_pair = codec::validate(&self.crypto.generate_key_pair())?;
        let signature = self
            .crypto
            .sign(identity.private_key(), &key_pair.public_key.serialize())?;
        let signed_record = SignedPreKeyRecord::new(signed_id, key_pair, signature, self.clock.now());
        store.store_signed_pre_key_record(&signed_record).await?;

        let outcome = rotation::retain(store, signed_id).await?;
        if !outcome.is_complete() {
            return Err(PreKeyError::RotationIncomplete {
                retained: outcome.retained,
                failed: outcome.failed,
            });
        }

        info!(
            target: "PreKeys",
            "Generated {count} prekeys ({start_id}..={end_id}), signed prekey {signed_id}, retired {} signed prekey(s)",
            outcome.removed.len()
        );

        Ok(KeyBundle {
            pre_keys,
            signed_pre_key: PublicSignedPreKey::from(&signed_record),
            identity_key: *identity.identity_key(),
        })
    }
}
