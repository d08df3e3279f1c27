//! Navigation tests driven through a session.
//!
//! Tests for:
//! - Enter/back/refresh transitions
//! - View versions and confirmation invalidation
//! - Disconnect

use blob_explorer_core::path::{normalize_prefix, parent_of, segments};
use blob_explorer_core::{DeleteOutcome, Error, ListingEntry, Session, StorageBackend, TransferConfig};

use super::helpers::{seeded_session, SAMPLE_KEYS};

#[tokio::test]
async fn test_enter_and_back_round_trip() {
    let (_, mut session) = seeded_session(SAMPLE_KEYS).await;

    let root = session.list().await.unwrap();
    let dir = root.find("dir").unwrap().clone();

    let inside = session.enter(&dir).await.unwrap();
    assert_eq!(session.current_prefix(), "dir/");
    assert_eq!(inside.prefix, "dir/");

    let sub = inside.find("sub").unwrap().clone();
    let deepest = session.enter(&sub).await.unwrap();
    assert_eq!(deepest.files().count(), 1);

    session.back().await.unwrap();
    assert_eq!(session.current_prefix(), "dir/");
    let back_at_root = session.back().await.unwrap();
    assert_eq!(session.current_prefix(), "");
    assert_eq!(back_at_root.entries, root.entries);

    // Back at the root stays at the root
    session.back().await.unwrap();
    assert!(session.navigation().is_root());
}

#[tokio::test]
async fn test_enter_file_is_rejected() {
    let (_, mut session) = seeded_session(SAMPLE_KEYS).await;
    let root = session.list().await.unwrap();
    let file = root.find("a.txt").unwrap().clone();

    let err = session.enter(&file).await.unwrap_err();
    assert!(matches!(err, Error::InvalidEntry(_)));
    assert_eq!(session.current_prefix(), "");
}

#[tokio::test]
async fn test_stale_directory_lists_empty() {
    let (_, mut session) = seeded_session(SAMPLE_KEYS).await;
    let stale = ListingEntry::Directory {
        name: "removed-out-of-band/".to_string(),
    };

    let view = session.enter(&stale).await.unwrap();
    assert!(view.is_empty());
}

#[tokio::test]
async fn test_every_listing_bumps_version() {
    let (_, mut session) = seeded_session(SAMPLE_KEYS).await;

    let first = session.list().await.unwrap();
    let second = session.refresh().await.unwrap();
    assert_eq!(second.version, first.version + 1);
    assert_eq!(first.entries, second.entries);
}

#[tokio::test]
async fn test_refresh_discards_pending_confirmation() {
    let (backend, mut session) = seeded_session(SAMPLE_KEYS).await;
    let view = session.list().await.unwrap();
    let file = view.find("a.txt").unwrap().clone();

    let first = session.request_delete(&file).await.unwrap();
    assert!(matches!(first, DeleteOutcome::ConfirmationRequired(_)));

    session.refresh().await.unwrap();
    assert!(!session.navigation().is_pending("a.txt"));

    // A click after the refresh asks again instead of deleting
    let after = session.request_delete(&file).await.unwrap();
    assert!(matches!(after, DeleteOutcome::ConfirmationRequired(_)));
    assert!(backend.get("a.txt").await.is_ok());
}

#[test]
fn test_parent_walk_terminates() {
    for path in ["", "a", "a/b/c", "deep/er/and/deeper/"] {
        let mut current = normalize_prefix(path);
        let mut steps = 0;
        while !current.is_empty() {
            current = parent_of(&current);
            steps += 1;
        }
        assert!(steps <= segments(path));
        assert_eq!(parent_of(""), "");
    }
}

#[tokio::test]
async fn test_disconnect_consumes_session() {
    let (backend, mut session) = seeded_session(SAMPLE_KEYS).await;
    let root = session.list().await.unwrap();
    session.enter(root.find("dir").unwrap()).await.unwrap();

    session.disconnect();

    // A new session starts from a clean root
    let fresh = Session::open(backend, "memory://", &TransferConfig::default())
        .await
        .unwrap();
    assert!(fresh.navigation().is_root());
    assert_eq!(fresh.navigation().view_version(), 0);
}
