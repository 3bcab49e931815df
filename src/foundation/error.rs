/// Crate-wide result alias.
pub type InkplateResult<T> = Result<T, InkplateError>;

/// Every failure the editor can report.
///
/// Variants map onto the user-facing taxonomy: validation and auth problems are detected before any
/// I/O, upload and decode failures happen after. Editor invariant violations (layer ops without a
/// selection, style edits on non-text nodes) are not errors at all; those calls return `false`.
#[derive(thiserror::Error, Debug)]
pub enum InkplateError {
    /// The file was rejected before any network call.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No active session for an asset-mutating operation.
    #[error("authentication required: sign in to continue")]
    AuthRequired,

    /// The storage collaborator failed.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Bytes were persisted but could not be turned into a renderable bitmap.
    #[error("decode error: {0}")]
    Decode(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// A caller-supplied value (color, font size, script step) is malformed.
    #[error("invalid input: {0}")]
    Input(String),

    /// Editor configuration is unusable.
    #[error("config error: {0}")]
    Config(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with context attached by `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Reasons an upload is rejected during pre-flight validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// MIME type does not start with `image/`.
    #[error("'{mime}' is not an image type")]
    NotAnImage {
        /// Declared MIME type.
        mime: String,
    },

    /// File is larger than the configured limit.
    #[error("file is {size} bytes, limit is {limit} bytes")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Configured maximum in bytes.
        limit: u64,
    },

    /// Extension is missing or not in the allow list.
    #[error("extension '{ext}' is not allowed")]
    DisallowedExtension {
        /// Lowercased extension (empty if the name had none).
        ext: String,
    },
}

/// Storage-side upload failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The bucket the gateway writes to does not exist.
    #[error("storage bucket '{bucket}' is not configured")]
    BucketNotConfigured {
        /// Bucket name from the editor config.
        bucket: String,
    },

    /// The storage collaborator refused or failed the write.
    #[error("storage rejected '{path}': {reason}")]
    Rejected {
        /// Storage path that was being written.
        path: String,
        /// Collaborator-provided reason.
        reason: String,
    },
}

impl InkplateError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Short message suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::NotAnImage { .. }) => {
                "Please upload an image file".to_owned()
            }
            Self::Validation(ValidationError::TooLarge { limit, .. }) => {
                format!("File size must be less than {}MB", limit / (1024 * 1024))
            }
            Self::Validation(ValidationError::DisallowedExtension { .. }) => {
                "Only JPG, PNG, GIF and WEBP images are supported".to_owned()
            }
            Self::AuthRequired => "Please sign in to continue".to_owned(),
            Self::Upload(UploadError::BucketNotConfigured { .. }) => {
                "Storage is not set up yet, please contact support".to_owned()
            }
            Self::Upload(UploadError::Rejected { reason, .. }) => {
                format!("Upload failed: {reason}. Please try again")
            }
            Self::Decode(_) => "The image was uploaded but could not be loaded".to_owned(),
            Self::Render(_) => "The design could not be rendered, please try again".to_owned(),
            other => format!("Something went wrong: {other}"),
        }
    }
}

impl From<serde_json::Error> for InkplateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
