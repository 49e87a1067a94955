//! KeyValueStore interface tests.
//!
//! These tests verify the contract of the KeyValueStore trait.
//! Each store implementation should run these tests. Every test flushes the
//! store first.

use recall::store::KeyValueStore;

// =============================================================================
// get/set tests
// =============================================================================

pub async fn test_get_nonexistent<S: KeyValueStore>(store: &S) {
    store.flush().await.expect("flush should succeed");

    let result = store.get("missing").await.expect("get should succeed");
    assert!(result.is_none(), "missing key should be None");
}

pub async fn test_set_and_get<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    store.set("k", b"hello").await.expect("set should succeed");
    let result = store.get("k").await.expect("get should succeed");
    assert_eq!(result, Some(b"hello".to_vec()));
}

pub async fn test_set_overwrites<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    store.set("k", b"first").await.unwrap();
    store.set("k", b"second").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some(b"second".to_vec()));
}

pub async fn test_set_empty_value<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    store.set("empty", b"").await.unwrap();
    assert_eq!(
        store.get("empty").await.unwrap(),
        Some(Vec::new()),
        "empty value should be distinct from missing"
    );
}

pub async fn test_binary_value<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    let value = [0u8, 1, 127, 128, 255];
    store.set("bin", &value).await.unwrap();
    assert_eq!(store.get("bin").await.unwrap(), Some(value.to_vec()));
}

// =============================================================================
// incr tests
// =============================================================================

pub async fn test_incr_from_missing<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    assert_eq!(store.incr("counter").await.unwrap(), 1);
    assert_eq!(store.incr("counter").await.unwrap(), 2);
    assert_eq!(store.get("counter").await.unwrap(), Some(b"2".to_vec()));
}

pub async fn test_incr_non_integer_fails<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    store.set("counter", b"abc").await.unwrap();
    assert!(
        store.incr("counter").await.is_err(),
        "incr on non-integer should fail"
    );
}

// =============================================================================
// list tests
// =============================================================================

pub async fn test_rpush_and_lrange<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    assert_eq!(store.rpush("list", b"a").await.unwrap(), 1);
    assert_eq!(store.rpush("list", b"b").await.unwrap(), 2);
    assert_eq!(store.rpush("list", b"c").await.unwrap(), 3);

    let all = store.lrange("list", 0, -1).await.unwrap();
    assert_eq!(all, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);

    let middle = store.lrange("list", 1, 1).await.unwrap();
    assert_eq!(middle, vec![b"b".to_vec()]);

    let tail = store.lrange("list", -2, -1).await.unwrap();
    assert_eq!(tail, vec![b"b".to_vec(), b"c".to_vec()]);

    let past_end = store.lrange("list", 5, 10).await.unwrap();
    assert!(past_end.is_empty());
}

pub async fn test_lrange_missing<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    let items = store.lrange("missing", 0, -1).await.unwrap();
    assert!(items.is_empty(), "missing list should read as empty");
}

pub async fn test_list_wrong_type<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    store.set("plain", b"x").await.unwrap();
    assert!(store.rpush("plain", b"y").await.is_err());

    store.rpush("list", b"x").await.unwrap();
    assert!(store.get("list").await.is_err());
}

// =============================================================================
// flush tests
// =============================================================================

pub async fn test_flush_removes_everything<S: KeyValueStore>(store: &S) {
    store.flush().await.unwrap();

    store.set("a", b"1").await.unwrap();
    store.incr("b").await.unwrap();
    store.rpush("c", b"x").await.unwrap();

    store.flush().await.expect("flush should succeed");

    assert!(store.get("a").await.unwrap().is_none());
    assert!(store.get("b").await.unwrap().is_none());
    assert!(store.lrange("c", 0, -1).await.unwrap().is_empty());
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all KeyValueStore interface tests against a store implementation.
#[macro_export]
macro_rules! run_kv_store_tests {
    ($store:expr) => {
        use $crate::storage::kv_store_tests::*;

        // get/set tests
        test_get_nonexistent($store).await;
        println!("  test_get_nonexistent: PASSED");

        test_set_and_get($store).await;
        println!("  test_set_and_get: PASSED");

        test_set_overwrites($store).await;
        println!("  test_set_overwrites: PASSED");

        test_set_empty_value($store).await;
        println!("  test_set_empty_value: PASSED");

        test_binary_value($store).await;
        println!("  test_binary_value: PASSED");

        // incr tests
        test_incr_from_missing($store).await;
        println!("  test_incr_from_missing: PASSED");

        test_incr_non_integer_fails($store).await;
        println!("  test_incr_non_integer_fails: PASSED");

        // list tests
        test_rpush_and_lrange($store).await;
        println!("  test_rpush_and_lrange: PASSED");

        test_lrange_missing($store).await;
        println!("  test_lrange_missing: PASSED");

        test_list_wrong_type($store).await;
        println!("  test_list_wrong_type: PASSED");

        // flush tests
        test_flush_removes_everything($store).await;
        println!("  test_flush_removes_everything: PASSED");
    };
}
