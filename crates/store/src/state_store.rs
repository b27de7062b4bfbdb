use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

/// State store operation error.
///
/// Infrastructure failures only (storage IO, snapshot encoding); domain
/// failures never originate here. Callers treat these as warnings: the
/// in-memory state is authoritative and a failed save does not roll a
/// mutation back.
#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("storage io failed: {0}")]
    Io(String),

    #[error("snapshot serialization failed: {0}")]
    Serialize(String),
}

impl StateStoreError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn serialize(msg: impl Into<String>) -> Self {
        Self::Serialize(msg.into())
    }
}

/// Opaque key → blob durability boundary.
///
/// The repository writes the *entire* product collection and the *entire*
/// audit log as two whole snapshots after every successful mutation, and
/// reads each key once at startup. Implementations make no assumptions
/// about blob contents.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the blob stored under `key`, or `None` if nothing was ever
    /// saved there.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StateStoreError>;

    /// Replace the blob stored under `key`.
    async fn save(&self, key: &str, blob: &[u8]) -> Result<(), StateStoreError>;
}

#[async_trait]
impl<S> StateStore for Arc<S>
where
    S: StateStore + ?Sized,
{
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StateStoreError> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, blob: &[u8]) -> Result<(), StateStoreError> {
        (**self).save(key, blob).await
    }
}

/// In-memory state store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StateStoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StateStoreError::io("lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    async fn save(&self, key: &str, blob: &[u8]) -> Result<(), StateStoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StateStoreError::io("lock poisoned"))?;
        map.insert(key.to_string(), blob.to_vec());
        Ok(())
    }
}
