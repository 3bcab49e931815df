//! Boundaries to the services the editor talks to: auth, blob storage, asset fetching, and the
//! cart. All are single-threaded async traits; futures never need to be `Send`.

use async_trait::async_trait;

use crate::foundation::error::InkplateResult;

/// Authenticated user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

/// Failure reported by a [`StorageBackend`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("bucket '{0}' not found")]
    BucketNotFound(String),
    #[error("{0}")]
    Failed(String),
}

#[async_trait(?Send)]
pub trait AuthProvider {
    /// Current session, or `None` when signed out.
    async fn session(&self) -> Option<Session>;
}

#[async_trait(?Send)]
pub trait StorageBackend {
    /// Bucket this backend writes to.
    fn bucket(&self) -> &str;

    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Publicly addressable URL for an uploaded `path`.
    fn public_url(&self, path: &str) -> String;
}

#[async_trait(?Send)]
pub trait AssetFetcher {
    async fn fetch(&self, url: &str) -> InkplateResult<Vec<u8>>;
}

/// Line item handed to the cart once a design is saved.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomLineItem {
    pub product_id: String,
    pub artifact_url: String,
}

#[async_trait(?Send)]
pub trait CartSink {
    async fn add_custom_item(&self, item: CustomLineItem) -> InkplateResult<()>;
}

/// Millisecond wall clock used to name storage objects.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// [`Clock`] backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
