// SPDX-License-Identifier: Apache-2.0

use crate::{AssetKey, AssetStore, StoreError, StoreErrorCode};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &AssetKey) -> PathBuf {
        key.segments()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    /// Whether the resolved location (after symlinks) sits under the root.
    async fn is_within_root(&self, path: &Path) -> Result<bool, StoreError> {
        let root = tokio::fs::canonicalize(&self.root)
            .await
            .unwrap_or_else(|_| self.root.clone());
        let resolved = tokio::fs::canonicalize(path)
            .await
            .map_err(|e| StoreError::from_io("path traversal check failed", &e))?;
        Ok(resolved.starts_with(&root))
    }

    async fn ensure_within_root(&self, path: &Path) -> Result<(), StoreError> {
        if !self.is_within_root(path).await? {
            return Err(StoreError::new(
                StoreErrorCode::Validation,
                "path traversal blocked",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStore for LocalFsStore {
    fn backend_tag(&self) -> &'static str {
        "localfs"
    }

    async fn exists(&self, key: &AssetKey) -> Result<bool, StoreError> {
        let path = self.object_path(key);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if !meta.is_file() => Ok(false),
            Ok(_) => {
                // Out-of-root objects count as absent.
                if self.is_within_root(&path).await? {
                    Ok(true)
                } else {
                    warn!(key = key.as_str(), "object escapes storage root; skipping");
                    Ok(false)
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::from_io(
                &format!("stat failed for {}", path.display()),
                &e,
            )),
        }
    }

    async fn read(&self, key: &AssetKey) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(key);
        self.ensure_within_root(&path).await?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| {
                StoreError::from_io(&format!("read failed for {}", path.display()), &e)
            })
    }
}
