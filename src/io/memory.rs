//! In-process collaborators for tests, demos, and the offline CLI.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::foundation::error::{InkplateError, InkplateResult};
use crate::io::collab::{
    AssetFetcher, AuthProvider, CartSink, Clock, CustomLineItem, Session, StorageBackend,
    StorageError,
};

/// Stored object: bytes plus the declared content type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Blob store kept in memory. Also serves its own public URLs back as an [`AssetFetcher`].
#[derive(Debug)]
pub struct MemoryStorage {
    bucket: String,
    base_url: String,
    objects: RefCell<BTreeMap<String, StoredObject>>,
    upload_calls: Cell<usize>,
    fail_with: RefCell<Option<StorageError>>,
}

impl MemoryStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        Self {
            base_url: format!("memory://{bucket}/"),
            bucket,
            objects: RefCell::new(BTreeMap::new()),
            upload_calls: Cell::new(0),
            fail_with: RefCell::new(None),
        }
    }

    /// Make every following upload fail with `err` (or succeed again with `None`).
    pub fn fail_uploads(&self, err: Option<StorageError>) {
        *self.fail_with.borrow_mut() = err;
    }

    /// Number of `upload` calls, failed ones included.
    pub fn upload_calls(&self) -> usize {
        self.upload_calls.get()
    }

    pub fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.borrow().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.objects.borrow().keys().cloned().collect()
    }

    /// Store bytes directly, bypassing the upload counter.
    pub fn insert(&self, path: impl Into<String>, bytes: Vec<u8>, content_type: impl Into<String>) {
        self.objects.borrow_mut().insert(
            path.into(),
            StoredObject {
                bytes,
                content_type: content_type.into(),
            },
        );
    }
}

#[async_trait(?Send)]
impl StorageBackend for MemoryStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.upload_calls.set(self.upload_calls.get() + 1);
        if let Some(err) = self.fail_with.borrow().clone() {
            return Err(err);
        }
        self.insert(path, bytes.to_vec(), content_type);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait(?Send)]
impl AssetFetcher for MemoryStorage {
    async fn fetch(&self, url: &str) -> InkplateResult<Vec<u8>> {
        let path = url
            .strip_prefix(&self.base_url)
            .ok_or_else(|| InkplateError::input(format!("'{url}' is not served by this store")))?;
        self.get(path)
            .map(|o| o.bytes)
            .ok_or_else(|| anyhow::anyhow!("no object at '{path}'").into())
    }
}

/// Auth provider with a fixed answer.
#[derive(Clone, Debug, Default)]
pub struct StaticAuth(pub Option<Session>);

impl StaticAuth {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self(Some(Session {
            user_id: user_id.into(),
        }))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

#[async_trait(?Send)]
impl AuthProvider for StaticAuth {
    async fn session(&self) -> Option<Session> {
        self.0.clone()
    }
}

/// Cart that records the line items it receives.
#[derive(Debug, Default)]
pub struct MemoryCart {
    items: RefCell<Vec<CustomLineItem>>,
}

impl MemoryCart {
    pub fn items(&self) -> Vec<CustomLineItem> {
        self.items.borrow().clone()
    }
}

#[async_trait(?Send)]
impl CartSink for MemoryCart {
    async fn add_custom_item(&self, item: CustomLineItem) -> InkplateResult<()> {
        self.items.borrow_mut().push(item);
        Ok(())
    }
}

/// Clock stuck at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/memory.rs"]
mod tests;
