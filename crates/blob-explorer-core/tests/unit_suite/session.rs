//! Session tests.
//!
//! Tests for connection validation and the two-step delete flow over
//! files and virtual directories.

use std::sync::Arc;

use blob_explorer_core::{
    validate_access, DeleteOutcome, Error, ObjectStoreBackend, Session, StorageBackend,
    StorageError, TransferConfig,
};

use super::helpers::{seeded_backend, seeded_session, Fault, FaultyBackend, SAMPLE_KEYS};

// ============================================================================
// Connection
// ============================================================================

#[tokio::test]
async fn test_access_denied_creates_no_session() {
    let backend = seeded_backend(SAMPLE_KEYS).await;
    let faulty = Arc::new(FaultyBackend::new(backend).failing_lists(Fault::AccessDenied));

    let result = Session::open(faulty, "memory://", &TransferConfig::default()).await;

    match result {
        Err(Error::Storage(StorageError::AccessDenied(_))) => {}
        other => panic!("Expected AccessDenied, got {:?}", other),
    }
}

#[tokio::test]
async fn test_network_failure_is_connection_error() {
    let faulty = FaultyBackend::new(Arc::new(ObjectStoreBackend::in_memory()))
        .failing_lists(Fault::Network);

    let err = validate_access(&faulty).await.unwrap_err();
    assert!(matches!(err, Error::Connection(_)));
}

#[tokio::test]
async fn test_empty_container_is_valid() {
    let session = Session::open(
        Arc::new(ObjectStoreBackend::in_memory()),
        "memory://",
        &TransferConfig::default(),
    )
    .await
    .unwrap();
    assert_eq!(session.location(), "memory://");
}

// ============================================================================
// Two-step delete
// ============================================================================

#[tokio::test]
async fn test_file_delete_needs_two_requests() {
    let (backend, mut session) = seeded_session(SAMPLE_KEYS).await;
    let view = session.list().await.unwrap();
    let file = view.find("a.txt").unwrap().clone();

    let first = session.request_delete(&file).await.unwrap();
    assert!(matches!(first, DeleteOutcome::ConfirmationRequired(ref t) if t.key == "a.txt"));
    assert!(backend.get("a.txt").await.is_ok());
    assert!(session.navigation().is_pending("a.txt"));

    let second = session.request_delete(&file).await.unwrap();
    match second {
        DeleteOutcome::Deleted(report) => {
            assert_eq!(report.deleted, vec!["a.txt".to_string()]);
            assert!(report.is_complete());
        }
        other => panic!("Expected Deleted, got {:?}", other),
    }
    assert!(backend.get("a.txt").await.unwrap_err().is_not_found());
    assert!(!session.navigation().is_pending("a.txt"));
}

#[tokio::test]
async fn test_directory_delete_removes_whole_subtree() {
    let (backend, mut session) = seeded_session(SAMPLE_KEYS).await;
    let view = session.list().await.unwrap();
    let dir = view.find("dir/").unwrap().clone();

    session.request_delete(&dir).await.unwrap();
    let outcome = session.request_delete(&dir).await.unwrap();

    match outcome {
        DeleteOutcome::Deleted(report) => {
            let mut deleted = report.deleted.clone();
            deleted.sort();
            assert_eq!(deleted, vec!["dir/b.txt", "dir/sub/c.txt"]);
        }
        other => panic!("Expected Deleted, got {:?}", other),
    }

    assert!(backend.get("dir/sub/c.txt").await.unwrap_err().is_not_found());

    let after = session.refresh().await.unwrap();
    assert!(after.find("dir/").is_none());
    assert!(after.find("a.txt").is_some());
}

#[tokio::test]
async fn test_directory_delete_tolerates_vanished_objects() {
    let backend = seeded_backend(&["logs/1", "logs/2", "logs/3"]).await;
    let faulty = Arc::new(
        FaultyBackend::new(backend.clone()).failing_deletes(&["logs/2"], Fault::NotFound),
    );
    let mut session = Session::open(faulty, "memory://", &TransferConfig::default())
        .await
        .unwrap();

    let view = session.list().await.unwrap();
    let dir = view.find("logs").unwrap().clone();
    session.request_delete(&dir).await.unwrap();

    match session.request_delete(&dir).await.unwrap() {
        DeleteOutcome::Deleted(report) => {
            assert_eq!(report.deleted.len(), 2);
            assert_eq!(report.missing, vec!["logs/2".to_string()]);
            assert!(report.is_complete());
        }
        other => panic!("Expected Deleted, got {:?}", other),
    }
    assert!(!session.navigation().is_pending("logs/"));
}

#[tokio::test]
async fn test_directory_delete_reports_hard_failures() {
    let backend = seeded_backend(&["logs/1", "logs/2"]).await;
    let faulty = Arc::new(
        FaultyBackend::new(backend.clone()).failing_deletes(&["logs/1"], Fault::AccessDenied),
    );
    let mut session = Session::open(faulty, "memory://", &TransferConfig::default())
        .await
        .unwrap();

    let view = session.list().await.unwrap();
    let dir = view.find("logs").unwrap().clone();
    session.request_delete(&dir).await.unwrap();

    match session.request_delete(&dir).await.unwrap() {
        DeleteOutcome::Deleted(report) => {
            assert_eq!(report.deleted, vec!["logs/2".to_string()]);
            assert_eq!(report.failed.len(), 1);
            assert!(!report.is_complete());
        }
        other => panic!("Expected Deleted, got {:?}", other),
    }

    // Batch continued past the failure; the failing object is still there
    assert!(backend.get("logs/1").await.is_ok());
    assert!(session.navigation().is_pending("logs/"));
}

#[tokio::test]
async fn test_single_file_delete_surfaces_not_found() {
    let backend = seeded_backend(&["a.txt"]).await;
    let faulty =
        Arc::new(FaultyBackend::new(backend).failing_deletes(&["a.txt"], Fault::NotFound));
    let mut session = Session::open(faulty, "memory://", &TransferConfig::default())
        .await
        .unwrap();

    let view = session.list().await.unwrap();
    let file = view.find("a.txt").unwrap().clone();
    session.request_delete(&file).await.unwrap();

    let err = session.request_delete(&file).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_of_reserved_character_key_removes_it() {
    let (backend, mut session) = seeded_session(&["a#b.txt", "100%.txt"]).await;

    let view = session.list().await.unwrap();
    let file = view.find("a#b.txt").unwrap().clone();
    session.request_delete(&file).await.unwrap();

    match session.request_delete(&file).await.unwrap() {
        DeleteOutcome::Deleted(report) => {
            assert_eq!(report.deleted, vec!["a#b.txt".to_string()]);
            assert!(report.is_complete());
        }
        other => panic!("Expected Deleted, got {:?}", other),
    }

    assert!(backend.get("a#b.txt").await.unwrap_err().is_not_found());
    let view = session.refresh().await.unwrap();
    let names: Vec<&str> = view.entries.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["100%.txt"]);
}
