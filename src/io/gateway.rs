use std::cell::Cell;
use std::rc::Rc;

use crate::foundation::config::EditorConfig;
use crate::foundation::error::{InkplateError, InkplateResult, UploadError, ValidationError};
use crate::io::collab::{AuthProvider, Clock, Session, StorageBackend, StorageError, SystemClock};

/// File picked by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name, used for the extension check.
    pub name: String,
    /// Declared MIME type.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Lowercased extension after the last dot, or `""`.
    pub fn extension(&self) -> String {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Upload acceptance rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    /// Lowercase extensions without the dot.
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn from_config(cfg: &EditorConfig) -> Self {
        Self {
            max_bytes: cfg.max_upload_bytes,
            allowed_extensions: cfg
                .allowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }
}

/// Pre-flight checks, in order: MIME type, size, extension. Returns the normalized extension.
pub fn validate_upload(
    file: &UploadFile,
    policy: &UploadPolicy,
) -> Result<String, ValidationError> {
    if !file.mime.starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            mime: file.mime.clone(),
        });
    }
    let size = file.bytes.len() as u64;
    if size > policy.max_bytes {
        return Err(ValidationError::TooLarge {
            size,
            limit: policy.max_bytes,
        });
    }
    let ext = file.extension();
    if !policy.allowed_extensions.iter().any(|a| *a == ext) {
        return Err(ValidationError::DisallowedExtension { ext });
    }
    Ok(ext)
}

/// Where an uploaded object lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Storage path, `{user_id}/{timestamp_ms}.{ext}`.
    pub path: String,
    /// Public URL of the object.
    pub url: String,
}

/// Validates files and forwards them to storage under per-user, time-ordered paths.
pub struct UploadGateway {
    storage: Rc<dyn StorageBackend>,
    auth: Rc<dyn AuthProvider>,
    clock: Rc<dyn Clock>,
    policy: UploadPolicy,
    last_ms: Cell<i64>,
}

impl UploadGateway {
    pub fn new(
        config: &EditorConfig,
        storage: Rc<dyn StorageBackend>,
        auth: Rc<dyn AuthProvider>,
    ) -> Self {
        Self::with_clock(config, storage, auth, Rc::new(SystemClock))
    }

    pub fn with_clock(
        config: &EditorConfig,
        storage: Rc<dyn StorageBackend>,
        auth: Rc<dyn AuthProvider>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            auth,
            clock,
            policy: UploadPolicy::from_config(config),
            last_ms: Cell::new(i64::MIN),
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub async fn require_session(&self) -> InkplateResult<Session> {
        self.auth.session().await.ok_or(InkplateError::AuthRequired)
    }

    /// Validate, then upload an image for the signed-in user.
    ///
    /// Nothing reaches storage when validation or the session check fails.
    #[tracing::instrument(skip_all, fields(file = %file.name, bytes = file.bytes.len()))]
    pub async fn upload_image(&self, file: &UploadFile) -> InkplateResult<UploadedAsset> {
        let ext = validate_upload(file, &self.policy)?;
        let session = self.require_session().await?;
        self.put(&session, &ext, &file.bytes, &file.mime).await
    }

    /// Store an exported PNG for `session`.
    pub async fn persist_export(
        &self,
        session: &Session,
        png: &[u8],
    ) -> InkplateResult<UploadedAsset> {
        self.put(session, "png", png, "image/png").await
    }

    /// Next storage path for `user_id`. Timestamps strictly increase across calls.
    pub fn next_path(&self, user_id: &str, ext: &str) -> String {
        let now = self.clock.now_ms();
        let ts = now.max(self.last_ms.get().saturating_add(1));
        self.last_ms.set(ts);
        format!("{user_id}/{ts}.{ext}")
    }

    async fn put(
        &self,
        session: &Session,
        ext: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> InkplateResult<UploadedAsset> {
        let path = self.next_path(&session.user_id, ext);
        self.storage
            .upload(&path, bytes, content_type)
            .await
            .map_err(|e| match e {
                StorageError::BucketNotFound(bucket) => UploadError::BucketNotConfigured { bucket },
                StorageError::Failed(reason) => UploadError::Rejected {
                    path: path.clone(),
                    reason,
                },
            })?;
        let url = self.storage.public_url(&path);
        tracing::debug!(bucket = self.storage.bucket(), %path, %url, "uploaded");
        Ok(UploadedAsset { path, url })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/gateway.rs"]
mod tests;
