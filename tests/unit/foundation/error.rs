use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        InkplateError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        InkplateError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        InkplateError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        InkplateError::from(ValidationError::NotAnImage {
            mime: "text/plain".to_owned()
        })
        .to_string()
        .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = InkplateError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn user_messages_distinguish_upload_and_decode() {
    let bucket = InkplateError::from(UploadError::BucketNotConfigured {
        bucket: "designs".to_owned(),
    });
    let rejected = InkplateError::from(UploadError::Rejected {
        path: "u/1.png".to_owned(),
        reason: "quota".to_owned(),
    });
    let decode = InkplateError::decode("bad bytes");

    assert!(bucket.user_message().contains("Storage is not set up"));
    assert!(rejected.user_message().contains("quota"));
    assert_ne!(decode.user_message(), rejected.user_message());
}

#[test]
fn too_large_message_reports_megabytes() {
    let err = InkplateError::from(ValidationError::TooLarge {
        size: 6 * 1024 * 1024,
        limit: 5 * 1024 * 1024,
    });
    assert_eq!(err.user_message(), "File size must be less than 5MB");
}
