//! File-backed state store.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use crate::state_store::{StateStore, StateStoreError};

/// File-per-key state store under a local directory.
///
/// Keys map to `<dir>/<key>.json`. Writes land in a temporary sibling
/// first and are renamed into place, so a crash mid-write leaves the
/// previous snapshot readable.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the OS application data directory:
    /// `{app_data_dir}/stockledger`.
    pub fn in_data_dir() -> anyhow::Result<Self> {
        let base = dirs::data_dir()
            .or_else(|| {
                dirs::home_dir().map(|mut home| {
                    home.push(".local");
                    home.push("share");
                    home
                })
            })
            .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

        let mut dir = base;
        dir.push("stockledger");
        Ok(Self::new(dir))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StateStoreError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StateStoreError::io(format!("read {key}: {err}"))),
        }
    }

    async fn save(&self, key: &str, blob: &[u8]) -> Result<(), StateStoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| StateStoreError::io(format!("create {:?}: {err}", self.dir)))?;

        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, blob)
            .await
            .map_err(|err| StateStoreError::io(format!("write {key}: {err}")))?;
        tokio::fs::rename(&tmp, self.path_for(key))
            .await
            .map_err(|err| StateStoreError::io(format!("rename {key}: {err}")))?;

        Ok(())
    }
}
