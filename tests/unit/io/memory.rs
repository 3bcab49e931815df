use super::*;
use futures::executor::block_on;

#[test]
fn upload_then_fetch_by_public_url() {
    let store = MemoryStorage::new("designs");
    block_on(store.upload("u1/1.png", b"abc", "image/png")).unwrap();
    assert_eq!(store.upload_calls(), 1);

    let url = store.public_url("u1/1.png");
    assert_eq!(url, "memory://designs/u1/1.png");
    assert_eq!(block_on(store.fetch(&url)).unwrap(), b"abc");
    assert_eq!(store.get("u1/1.png").unwrap().content_type, "image/png");
}

#[test]
fn injected_failure_is_counted_and_stores_nothing() {
    let store = MemoryStorage::new("designs");
    store.fail_uploads(Some(StorageError::Failed("offline".to_owned())));
    let err = block_on(store.upload("a", b"x", "image/png")).unwrap_err();
    assert_eq!(err, StorageError::Failed("offline".to_owned()));
    assert_eq!(store.upload_calls(), 1);
    assert!(store.paths().is_empty());

    store.fail_uploads(None);
    block_on(store.upload("a", b"x", "image/png")).unwrap();
    assert_eq!(store.paths(), vec!["a".to_owned()]);
}

#[test]
fn fetch_unknown_url_fails() {
    let store = MemoryStorage::new("designs");
    assert!(block_on(store.fetch("https://elsewhere/x")).is_err());
    assert!(block_on(store.fetch("memory://designs/missing")).is_err());
}

#[test]
fn static_auth_and_cart() {
    assert_eq!(
        block_on(StaticAuth::signed_in("u1").session()).map(|s| s.user_id),
        Some("u1".to_owned())
    );
    assert!(block_on(StaticAuth::signed_out().session()).is_none());

    let cart = MemoryCart::default();
    let item = CustomLineItem {
        product_id: "mug".to_owned(),
        artifact_url: "memory://designs/x.png".to_owned(),
    };
    block_on(cart.add_custom_item(item.clone())).unwrap();
    assert_eq!(cart.items(), vec![item]);
}
