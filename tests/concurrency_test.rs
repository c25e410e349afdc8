mod common;

use std::collections::HashSet;
use std::sync::Arc;

use keycore::store::{PreKeyStore, SignedPreKeyStore};
use prekey_manager::{MemoryStore, PreKeyManager};

use common::{ids, manager_with_identity};

const TASKS: u32 = 8;
const COUNT: u32 = 5;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_cycles_never_reuse_ids() {
    let manager = manager_with_identity(Arc::new(MemoryStore::new())).await;

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.generate(COUNT).await })
        })
        .collect();

    let mut pre_key_ids = Vec::new();
    let mut signed_ids = Vec::new();
    for handle in handles {
        let bundle = handle.await.unwrap().unwrap();
        assert!(bundle.verify_signature());
        pre_key_ids.extend(ids(bundle.pre_keys.iter().map(|k| k.key_id)));
        signed_ids.push(u32::from(bundle.signed_pre_key.key_id));
    }

    let unique: HashSet<_> = pre_key_ids.iter().copied().collect();
    assert_eq!(unique.len(), pre_key_ids.len());
    pre_key_ids.sort_unstable();
    assert_eq!(pre_key_ids, (1..=TASKS * COUNT).collect::<Vec<_>>());

    signed_ids.sort_unstable();
    assert_eq!(signed_ids, (1..=TASKS).collect::<Vec<_>>());

    let store = manager.store();
    let mut remaining = store.signed_prekey_ids().await.unwrap();
    remaining.sort_unstable();
    assert_eq!(remaining, vec![TASKS - 1, TASKS]);
    assert_eq!(store.prekey_ids().await.unwrap().len(), (TASKS * COUNT) as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn each_cycle_hands_out_a_contiguous_range() {
    let manager = manager_with_identity(Arc::new(MemoryStore::new())).await;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.generate(COUNT).await })
        })
        .collect();

    for handle in handles {
        let bundle = handle.await.unwrap().unwrap();
        let range = ids(bundle.pre_keys.iter().map(|k| k.key_id));
        let first = range[0];
        assert_eq!(range, (first..first + COUNT).collect::<Vec<_>>());
        assert_eq!((first - 1) % COUNT, 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn separate_managers_over_one_store_are_serialized() {
    let store = Arc::new(MemoryStore::new());
    manager_with_identity(Arc::clone(&store)).await;

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let manager = PreKeyManager::new(Arc::clone(&store));
            tokio::spawn(async move { manager.generate(COUNT).await })
        })
        .collect();

    let mut pre_key_ids = Vec::new();
    let mut signed_ids = Vec::new();
    for handle in handles {
        let bundle = handle.await.unwrap().unwrap();
        pre_key_ids.extend(ids(bundle.pre_keys.iter().map(|k| k.key_id)));
        signed_ids.push(u32::from(bundle.signed_pre_key.key_id));
    }

    pre_key_ids.sort_unstable();
    assert_eq!(pre_key_ids, (1..=TASKS * COUNT).collect::<Vec<_>>());
    signed_ids.sort_unstable();
    assert_eq!(signed_ids, (1..=TASKS).collect::<Vec<_>>());

    let mut remaining = store.signed_prekey_ids().await.unwrap();
    remaining.sort_unstable();
    assert_eq!(remaining, vec![TASKS - 1, TASKS]);
}
