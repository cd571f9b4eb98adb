use std::sync::Mutex;

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("blob i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("anchor store rejected '{0}'")]
    AnchorRejected(String),
}

/// Simple key-to-bytes persistence for memos and per-target metadata.
/// Implementations must tolerate concurrent use from the background save
/// worker, hence `Send + Sync`.
pub trait BlobStore: Send + Sync {
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

pub fn memo_key(name: &str) -> String {
    format!("memo-{name}")
}

pub fn config_key(name: &str) -> String {
    format!("config-{name}")
}

/// Structured per-target metadata stored next to the memo blob.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TargetConfig {
    pub scale: f32,
}

impl TargetConfig {
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// In-memory blob store for tests and headless sessions.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<FnvHashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.lock().expect("store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryStore {
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.map
            .lock()
            .expect("store lock")
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.map.lock().expect("store lock").get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.map.lock().expect("store lock").remove(key);
        Ok(())
    }
}
