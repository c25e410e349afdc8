use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, Weak};

use async_trait::async_trait;
use keycore::KeyPairStructure;
use keycore::store::error::{Result, StoreError};
use keycore::store::{
    IdentityKeyStore, PreKeyRecordStructure, PreKeyStore, SignedPreKeyRecordStructure,
    SignedPreKeyStore,
};
use log::warn;
use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;
use tokio::sync::Mutex;

use crate::store::GenerationLock;

const PREKEYS_DIR: &str = "prekeys";
const SIGNED_PREKEYS_DIR: &str = "signed_prekeys";

type DirectoryLocks = std::sync::Mutex<HashMap<PathBuf, Weak<Mutex<()>>>>;

static DIRECTORY_LOCKS: OnceLock<DirectoryLocks> = OnceLock::new();

/// The generation lock shared by every `FileStore` open on `directory`
/// within this process.
fn directory_lock(directory: PathBuf) -> Arc<Mutex<()>> {
    let mut locks = DIRECTORY_LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    locks.retain(|_, lock| lock.strong_count() > 0);
    if let Some(lock) = locks.get(&directory).and_then(Weak::upgrade) {
        return lock;
    }
    let lock = Arc::new(Mutex::new(()));
    locks.insert(directory, Arc::downgrade(&lock));
    lock
}

/// Key store persisted as JSON files under a base directory:
///
/// ```text
/// <base>/identity.json
/// <base>/prekeys/<id>.json
/// <base>/signed_prekeys/<id>.json
/// ```
///
/// Stores opened on the same directory share one generation lock.
pub struct FileStore {
    base_path: PathBuf,
    generation_lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub async fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let base_path = path.into();
        fs::create_dir_all(base_path.join(PREKEYS_DIR)).await?;
        fs::create_dir_all(base_path.join(SIGNED_PREKEYS_DIR)).await?;

        let generation_lock = directory_lock(fs::canonicalize(&base_path).await?);
        Ok(Self {
            base_path,
            generation_lock,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, sub: &str) -> PathBuf {
        self.base_path.join(sub)
    }

    fn record_path(&self, sub: &str, id: u32) -> PathBuf {
        self.path_for(sub).join(format!("{id}.json"))
    }

    fn identity_path(&self) -> PathBuf {
        self.base_path.join("identity.json")
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read(path).await {
            Ok(data) => serde_json::from_slice(&data)
                .map(Some)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Writes to a sibling temp file and renames it into place, so a reader
    /// never sees a half-written record.
    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, data).await?;
        fs::rename(&tmp_path, path).await?;
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn list_ids(&self, sub: &str) -> Result<Vec<u32>> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(self.path_for(sub)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u32>().ok())
            {
                Some(id) => ids.push(id),
                None => warn!(target: "PreKeys", "Ignoring unexpected file in key store: {}", path.display()),
            }
        }
        Ok(ids)
    }
}

impl GenerationLock for FileStore {
    fn generation_lock(&self) -> &Mutex<()> {
        &self.generation_lock
    }
}

#[async_trait]
impl IdentityKeyStore for FileStore {
    async fn load_identity_key_pair(&self) -> Result<Option<KeyPairStructure>> {
        self.read_json(&self.identity_path()).await
    }

    async fn store_identity_key_pair(&self, record: KeyPairStructure) -> Result<()> {
        self.write_json(&self.identity_path(), &record).await
    }
}

#[async_trait]
impl PreKeyStore for FileStore {
    async fn load_prekey(&self, prekey_id: u32) -> Result<Option<PreKeyRecordStructure>> {
        self.read_json(&self.record_path(PREKEYS_DIR, prekey_id))
            .await
    }

    async fn store_prekey(&self, prekey_id: u32, record: PreKeyRecordStructure) -> Result<()> {
        self.write_json(&self.record_path(PREKEYS_DIR, prekey_id), &record)
            .await
    }

    async fn remove_prekey(&self, prekey_id: u32) -> Result<()> {
        self.remove(&self.record_path(PREKEYS_DIR, prekey_id)).await
    }

    async fn prekey_ids(&self) -> Result<Vec<u32>> {
        self.list_ids(PREKEYS_DIR).await
    }
}

#[async_trait]
impl SignedPreKeyStore for FileStore {
    async fn load_signed_prekey(
        &self,
        signed_prekey_id: u32,
    ) -> Result<Option<SignedPreKeyRecordStructure>> {
        self.read_json(&self.record_path(SIGNED_PREKEYS_DIR, signed_prekey_id))
            .await
    }

    async fn store_signed_prekey(
        &self,
        signed_prekey_id: u32,
        record: SignedPreKeyRecordStructure,
    ) -> Result<()> {
        self.write_json(
            &self.record_path(SIGNED_PREKEYS_DIR, signed_prekey_id),
            &record,
        )
        .await
    }

    async fn remove_signed_prekey(&self, signed_prekey_id: u32) -> Result<()> {
        self.remove(&self.record_path(SIGNED_PREKEYS_DIR, signed_prekey_id))
            .await
    }

    async fn signed_prekey_ids(&self) -> Result<Vec<u32>> {
        self.list_ids(SIGNED_PREKEYS_DIR).await
    }
}
