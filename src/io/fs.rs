use std::path::{Path, PathBuf};

use anyhow::Context as _;
use async_trait::async_trait;

use crate::foundation::error::{InkplateError, InkplateResult};
use crate::io::collab::{AssetFetcher, StorageBackend, StorageError};

const URL_SCHEME: &str = "file://";

/// Storage rooted at a local directory: objects land under `<root>/<bucket>/<path>`.
///
/// The bucket directory must already exist, mirroring a remote store where buckets are
/// provisioned out of band.
#[derive(Clone, Debug)]
pub struct FsStorage {
    root: PathBuf,
    bucket: String,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    /// Create the bucket directory.
    pub fn create_bucket(&self) -> InkplateResult<()> {
        let dir = self.bucket_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create bucket dir '{}'", dir.display()))?;
        Ok(())
    }

    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }

    pub fn object_path(&self, path: &str) -> PathBuf {
        self.bucket_dir().join(path)
    }
}

#[async_trait(?Send)]
impl StorageBackend for FsStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), StorageError> {
        if path.split('/').any(|seg| seg.is_empty() || seg == "..") {
            return Err(StorageError::Failed(format!("invalid object path '{path}'")));
        }
        if !self.bucket_dir().is_dir() {
            return Err(StorageError::BucketNotFound(self.bucket.clone()));
        }
        let dest = self.object_path(path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Failed(e.to_string()))?;
        }
        std::fs::write(&dest, bytes).map_err(|e| StorageError::Failed(e.to_string()))?;
        tracing::debug!(path = %dest.display(), bytes = bytes.len(), "object written");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{URL_SCHEME}{}", self.object_path(path).display())
    }
}

#[async_trait(?Send)]
impl AssetFetcher for FsStorage {
    async fn fetch(&self, url: &str) -> InkplateResult<Vec<u8>> {
        let path = url
            .strip_prefix(URL_SCHEME)
            .map(Path::new)
            .ok_or_else(|| InkplateError::input(format!("'{url}' is not a file:// url")))?;
        let bytes =
            std::fs::read(path).with_context(|| format!("read asset '{}'", path.display()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/fs.rs"]
mod tests;
