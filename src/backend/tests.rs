use std::time::Duration;

use serde_json::json;

use super::memory::MemoryBackend;
use super::mock::MockBackend;
use super::{BackendError, CacheBackend, MEMORY_KIND, TierHandle, TierSpec, create_backend};

#[tokio::test]
async fn test_memory_set_get_round_trip() {
    let backend = MemoryBackend::new();

    let stored = backend
        .set("myKey", json!("myValue"), None)
        .await
        .expect("set should succeed");
    assert_eq!(stored, json!("myValue"));

    let value = backend.get("myKey").await.expect("get should succeed");
    assert_eq!(value, Some(json!("myValue")));
}

#[tokio::test]
async fn test_memory_get_miss_is_none() {
    let backend = MemoryBackend::new();
    let value = backend.get("absent").await.expect("get should succeed");
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_memory_del() {
    let backend = MemoryBackend::new();
    backend
        .set("myKey", json!(1), None)
        .await
        .expect("set should succeed");

    backend.del("myKey").await.expect("del should succeed");
    assert_eq!(backend.get("myKey").await.expect("get"), None);
}

#[tokio::test]
async fn test_memory_del_absent_key_is_not_an_error() {
    let backend = MemoryBackend::new();
    backend.del("never set").await.expect("del should succeed");
}

#[tokio::test]
async fn test_memory_overwrite_replaces_value() {
    let backend = MemoryBackend::new();
    backend.set("k", json!("old"), None).await.expect("set");
    backend.set("k", json!("new"), None).await.expect("set");

    backend.run_pending_tasks();
    assert_eq!(backend.len(), 1);
    assert_eq!(backend.get("k").await.expect("get"), Some(json!("new")));
}

#[tokio::test]
async fn test_memory_ttl_expires_entry() {
    let backend = MemoryBackend::new();
    backend
        .set("short", json!("lived"), Some(Duration::from_millis(100)))
        .await
        .expect("set");

    assert_eq!(
        backend.get("short").await.expect("get"),
        Some(json!("lived"))
    );

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(backend.get("short").await.expect("get"), None);
}

#[tokio::test]
async fn test_memory_no_ttl_does_not_expire() {
    let backend = MemoryBackend::new();
    backend.set("stable", json!(true), None).await.expect("set");

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(
        backend.get("stable").await.expect("get"),
        Some(json!(true))
    );
}

#[tokio::test]
async fn test_memory_clear() {
    let backend = MemoryBackend::new();
    for i in 0..5 {
        backend
            .set(&format!("key {i}"), json!(i), None)
            .await
            .expect("set");
    }

    backend.clear();
    backend.run_pending_tasks();
    assert!(backend.is_empty());
}

#[test]
fn test_create_backend_memory() {
    let handle = create_backend(MEMORY_KIND).expect("should create memory backend");
    assert_eq!(handle.kind(), "memory");
}

#[test]
fn test_create_backend_unknown_kind() {
    let err = create_backend("etcd").expect_err("unknown kind should fail");
    assert_eq!(
        err,
        BackendError::UnknownKind {
            kind: "etcd".to_string()
        }
    );
}

#[test]
fn test_tier_spec_from_name_and_handle() {
    let named: TierSpec = "memory".into();
    assert!(matches!(named, TierSpec::Named(ref kind) if kind == "memory"));

    let handle: TierSpec = TierHandle::memory().into();
    assert!(matches!(handle, TierSpec::Handle(_)));
}

#[test]
fn test_tier_handle_sharing() {
    let first = TierHandle::memory();
    let shared = first.clone();
    let other = TierHandle::memory();

    assert!(first.shares_backend(&shared));
    assert!(!first.shares_backend(&other));
}

#[test]
fn test_tier_handle_debug() {
    let handle = TierHandle::memory();
    let debug_str = format!("{:?}", handle);
    assert!(debug_str.contains("TierHandle"));
    assert!(debug_str.contains("memory"));
}

#[tokio::test]
async fn test_mock_counts_calls() {
    let mock = MockBackend::new();

    mock.set("k", json!(1), None).await.expect("set");
    mock.get("k").await.expect("get");
    mock.get("other").await.expect("get");
    mock.del("k").await.expect("del");

    assert_eq!(mock.set_calls(), 1);
    assert_eq!(mock.get_calls(), 2);
    assert_eq!(mock.del_calls(), 1);
}

#[tokio::test]
async fn test_mock_seed_does_not_count() {
    let mock = MockBackend::new();
    mock.insert("seeded", json!("value"));

    assert_eq!(mock.set_calls(), 0);
    assert!(mock.contains("seeded"));
    assert_eq!(mock.get("seeded").await.expect("get"), Some(json!("value")));
}

#[tokio::test]
async fn test_mock_injected_failures() {
    let mock = MockBackend::new();
    mock.fail_gets(BackendError::Unavailable {
        reason: "fake error".to_string(),
    });

    let err = mock.get("k").await.expect_err("get should fail");
    assert_eq!(
        err,
        BackendError::Unavailable {
            reason: "fake error".to_string()
        }
    );
    assert_eq!(mock.get_calls(), 1);
}

#[tokio::test]
async fn test_mock_handle_shares_state_with_spy() {
    let mock = MockBackend::new();
    let handle = mock.handle();

    handle.set("k", json!("v"), None).await.expect("set");

    assert_eq!(mock.set_calls(), 1);
    assert!(mock.contains("k"));
}
