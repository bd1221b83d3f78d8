use std::ffi::OsString;
use std::path::{Path, PathBuf};

use stormfeed_common::Snapshot;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::error::{PollerError, Result};

/// Replaces the published snapshot file atomically: stage the whole payload
/// next to the target, then rename over it. Readers see the previous file or
/// the new one, never a partial write.
pub struct SnapshotWriter {
    target: PathBuf,
}

impl SnapshotWriter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self { target: target.into() }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// `<target>.tmp`, same directory so the rename stays on one filesystem.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.target.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    pub async fn publish(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        let staged = self.stage(&bytes).await?;
        self.commit(&staged).await?;

        debug!(path = %self.target.display(), bytes = bytes.len(), "Snapshot published");
        Ok(())
    }

    /// Write the full payload to the temp path. The target is not touched.
    pub(crate) async fn stage(&self, bytes: &[u8]) -> Result<PathBuf> {
        let temp = self.temp_path();

        if let Some(parent) = temp.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|source| PollerError::Persist {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let persist_err = |source| PollerError::Persist {
            path: temp.clone(),
            source,
        };

        let mut file = tokio::fs::File::create(&temp).await.map_err(persist_err)?;
        file.write_all(bytes).await.map_err(persist_err)?;
        file.sync_all().await.map_err(persist_err)?;

        Ok(temp)
    }

    async fn commit(&self, staged: &Path) -> Result<()> {
        if let Err(source) = tokio::fs::rename(staged, &self.target).await {
            error!(
                from = %staged.display(),
                to = %self.target.display(),
                error = %source,
                "Failed to move staged snapshot into place"
            );
            return Err(PollerError::Persist {
                path: self.target.clone(),
                source,
            });
        }
        Ok(())
    }
}
