mod common;

use std::sync::Arc;

use keycore::store::{PreKeyStore, SignedPreKeyStore};
use prekey_manager::{
    FileStore, KeyStoreExt, PreKeyError, PreKeyId, PreKeyManager, SignedPreKeyId,
    ValidationError, bootstrap_identity,
};
use tempfile::TempDir;

use common::{ids, init_logging};

async fn open(dir: &TempDir) -> Arc<FileStore> {
    Arc::new(FileStore::new(dir.path()).await.expect("open file store"))
}

#[tokio::test]
async fn new_store_creates_layout() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let store = open(&dir).await;

    assert!(store.base_path().join("prekeys").is_dir());
    assert!(store.base_path().join("signed_prekeys").is_dir());
    assert!(store.load_identity().await.unwrap().is_none());
    assert!(store.prekey_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn records_survive_reopen_and_ids_continue() {
    init_logging();
    let dir = TempDir::new().unwrap();

    let (identity, first) = {
        let store = open(&dir).await;
        let identity = bootstrap_identity(store.as_ref()).await.unwrap();
        let manager = PreKeyManager::new(store);
        (identity, manager.generate(5).await.unwrap())
    };
    assert_eq!(ids(first.pre_keys.iter().map(|k| k.key_id)), vec![1, 2, 3, 4, 5]);

    let store = open(&dir).await;
    assert_eq!(bootstrap_identity(store.as_ref()).await.unwrap(), identity);

    let restored = store
        .load_pre_key_record(PreKeyId::from(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        restored.public_key().serialize(),
        first.pre_keys[2].public_key.serialize()
    );

    let manager = PreKeyManager::new(Arc::clone(&store));
    let second = manager.generate(5).await.unwrap();
    assert_eq!(
        ids(second.pre_keys.iter().map(|k| k.key_id)),
        vec![6, 7, 8, 9, 10]
    );
    assert_eq!(second.signed_pre_key.key_id, SignedPreKeyId::from(2));
    assert!(second.verify_signature());
}

#[tokio::test]
async fn retention_removes_files_on_disk() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let store = open(&dir).await;
    bootstrap_identity(store.as_ref()).await.unwrap();
    let manager = PreKeyManager::new(Arc::clone(&store));

    for _ in 0..3 {
        manager.generate(1).await.unwrap();
    }

    let signed_dir = dir.path().join("signed_prekeys");
    assert!(!signed_dir.join("1.json").exists());
    assert!(signed_dir.join("2.json").exists());
    assert!(signed_dir.join("3.json").exists());

    let mut remaining = store.signed_prekey_ids().await.unwrap();
    remaining.sort_unstable();
    assert_eq!(remaining, vec![2, 3]);
}

#[tokio::test]
async fn unrelated_files_are_ignored_when_listing() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let store = open(&dir).await;
    bootstrap_identity(store.as_ref()).await.unwrap();
    PreKeyManager::new(Arc::clone(&store))
        .generate(2)
        .await
        .unwrap();

    tokio::fs::write(dir.path().join("prekeys").join("notes.txt"), b"scratch")
        .await
        .unwrap();

    let mut listed = store.prekey_ids().await.unwrap();
    listed.sort_unstable();
    assert_eq!(listed, vec![1, 2]);
}

#[tokio::test]
async fn removing_missing_records_is_not_an_error() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let store = open(&dir).await;

    store.remove_prekey(42).await.unwrap();
    store.remove_signed_prekey(42).await.unwrap();
}

#[tokio::test]
async fn tampered_record_on_disk_fails_validation() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let store = open(&dir).await;
    bootstrap_identity(store.as_ref()).await.unwrap();
    PreKeyManager::new(Arc::clone(&store))
        .generate(1)
        .await
        .unwrap();

    let mut record = store.load_signed_prekey(1).await.unwrap().unwrap();
    record.signature.truncate(10);
    store.store_signed_prekey(1, record).await.unwrap();

    let err = store
        .load_signed_pre_key_record(SignedPreKeyId::from(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PreKeyError::Validation(ValidationError::BadSignatureLength(10))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stores_on_one_directory_share_the_generation_lock() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let first = open(&dir).await;
    bootstrap_identity(first.as_ref()).await.unwrap();
    let second = open(&dir).await;

    let handles: Vec<_> = [first, second, open(&dir).await, open(&dir).await]
        .into_iter()
        .map(|store| {
            let manager = PreKeyManager::new(store);
            tokio::spawn(async move { manager.generate(3).await })
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
    assert_eq!(pre_key_ids, (1..=12).collect::<Vec<_>>());
    signed_ids.sort_unstable();
    assert_eq!(signed_ids, vec![1, 2, 3, 4]);

    let store = open(&dir).await;
    let mut remaining = store.signed_prekey_ids().await.unwrap();
    remaining.sort_unstable();
    assert_eq!(remaining, vec![3, 4]);
}
