//! Record store behavior shared by the CSV and SQLite backends, plus the
//! CSV-specific file contract (layout, encoding, crash recovery).

mod helpers;

use helpers::{approved, open, pending, seed_pending, seed_repository, BACKENDS};
use sametha_common::store::{ApprovalJournal, CsvStore, JournalEntry};
use sametha_common::{Collection, Error, ProverbRecord, RecordStore};
use tempfile::TempDir;

#[tokio::test]
async fn test_fresh_store_reads_empty() {
    for backend in BACKENDS {
        let dir = TempDir::new().unwrap();
        let store = open(backend, dir.path()).await;

        assert!(store.read_all(Collection::Pending).await.unwrap().is_empty(), "{}", backend);
        assert!(store.read_all(Collection::Repository).await.unwrap().is_empty(), "{}", backend);
    }
}

#[tokio::test]
async fn test_append_preserves_order() {
    for backend in BACKENDS {
        let dir = TempDir::new().unwrap();
        let store = open(backend, dir.path()).await;

        seed_pending(
            store.as_ref(),
            &[
                pending(1, "ఆరు నెలలు", "six months", "ravi"),
                pending(2, "పప్పు", "lentils", "sita"),
            ],
        )
        .await;

        let rows = store.read_pending().await.unwrap();
        assert_eq!(rows.len(), 2, "{}", backend);
        assert_eq!(rows[0], pending(1, "ఆరు నెలలు", "six months", "ravi"));
        assert_eq!(rows[1].serial_no, 2);
    }
}

#[tokio::test]
async fn test_read_order_is_insertion_order_not_serial_order() {
    for backend in BACKENDS {
        let dir = TempDir::new().unwrap();
        let store = open(backend, dir.path()).await;
        seed_pending(
            store.as_ref(),
            &[pending(5, "a", "one", "ravi"), pending(2, "b", "two", "ravi")],
        )
        .await;

        let serials: Vec<i64> = store.read_pending().await.unwrap().iter().map(|r| r.serial_no).collect();
        assert_eq!(serials, vec![5, 2], "{}", backend);
    }
}

#[tokio::test]
async fn test_append_rejects_wrong_shape() {
    for backend in BACKENDS {
        let dir = TempDir::new().unwrap();
        let store = open(backend, dir.path()).await;

        let result = store
            .append(Collection::Pending, &ProverbRecord::Approved(approved("x", "y")))
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))), "{}", backend);
    }
}

#[tokio::test]
async fn test_remove_by_key_removes_all_matches() {
    for backend in BACKENDS {
        let dir = TempDir::new().unwrap();
        let store = open(backend, dir.path()).await;

        seed_pending(
            store.as_ref(),
            &[
                pending(1, "a", "one", "ravi"),
                pending(2, "b", "two", "sita"),
                pending(3, "c", "three", "ravi"),
            ],
        )
        .await;

        let removed = store
            .remove_by_key(Collection::Pending, "annotator", "ravi")
            .await
            .unwrap();
        assert_eq!(removed, 2, "{}", backend);

        let rows = store.read_pending().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].serial_no, 2);
    }
}

#[tokio::test]
async fn test_remove_by_serial_no_and_unknown_column() {
    for backend in BACKENDS {
        let dir = TempDir::new().unwrap();
        let store = open(backend, dir.path()).await;
        seed_pending(store.as_ref(), &[pending(7, "a", "one", "ravi")]).await;

        assert_eq!(
            store.remove_by_key(Collection::Pending, "serial_no", "8").await.unwrap(),
            0,
            "{}",
            backend
        );
        assert_eq!(
            store.remove_by_key(Collection::Pending, "serial_no", "7").await.unwrap(),
            1,
            "{}",
            backend
        );
        assert!(matches!(
            store.remove_by_key(Collection::Repository, "serial_no", "7").await,
            Err(Error::InvalidInput(_))
        ));
    }
}

#[tokio::test]
async fn test_transfer_moves_exactly_one_row() {
    for backend in BACKENDS {
        let dir = TempDir::new().unwrap();
        let store = open(backend, dir.path()).await;
        seed_pending(
            store.as_ref(),
            &[pending(1, "a", "one", "ravi"), pending(2, "b", "two", "sita")],
        )
        .await;

        let moved = store.transfer(1, &approved("a", "one")).await.unwrap();
        assert!(moved, "{}", backend);

        let pending_rows = store.read_pending().await.unwrap();
        let repository = store.read_repository().await.unwrap();
        assert_eq!(pending_rows.len(), 1);
        assert_eq!(pending_rows[0].serial_no, 2);
        assert_eq!(repository, vec![approved("a", "one")]);
    }
}

#[tokio::test]
async fn test_transfer_of_unknown_serial_changes_nothing() {
    for backend in BACKENDS {
        let dir = TempDir::new().unwrap();
        let store = open(backend, dir.path()).await;
        seed_pending(store.as_ref(), &[pending(1, "a", "one", "ravi")]).await;

        assert!(!store.transfer(99, &approved("z", "zz")).await.unwrap(), "{}", backend);
        assert_eq!(store.read_pending().await.unwrap().len(), 1);
        assert!(store.read_repository().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_rows_survive_reopen() {
    for backend in BACKENDS {
        let dir = TempDir::new().unwrap();
        {
            let store = open(backend, dir.path()).await;
            seed_repository(store.as_ref(), &[approved("ఆరు నెలలు", "six months")]).await;
        }
        let store = open(backend, dir.path()).await;
        assert_eq!(
            store.read_repository().await.unwrap(),
            vec![approved("ఆరు నెలలు", "six months")],
            "{}",
            backend
        );
    }
}

// =============================================================================
// CSV file contract
// =============================================================================

#[tokio::test]
async fn test_csv_open_creates_files_with_declared_columns() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::open(dir.path().join("data")).await.unwrap();

    let pending = std::fs::read(store.collection_path(Collection::Pending)).unwrap();
    assert!(pending.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(pending[3..].to_vec()).unwrap();
    assert_eq!(
        text.trim_end(),
        "serial_no,proverb_telugu,proverb_english,meaning_english,keywords,annotator,timestamp"
    );

    let repository = std::fs::read_to_string(store.collection_path(Collection::Repository)).unwrap();
    assert!(repository.trim_end().ends_with("proverb_telugu,proverb_english,meaning_english,keywords"));
}

#[tokio::test]
async fn test_csv_deleted_file_reads_empty() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::open(dir.path().join("data")).await.unwrap();
    std::fs::remove_file(store.collection_path(Collection::Repository)).unwrap();

    assert!(store.read_all(Collection::Repository).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_csv_written_rows_use_original_layout() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::open(dir.path().join("data")).await.unwrap();
    seed_pending(&store, &[pending(1, "ఆరు నెలలు", "six months", "ravi")]).await;

    let text = std::fs::read_to_string(store.collection_path(Collection::Pending)).unwrap();
    let line = text.lines().nth(1).unwrap();
    assert_eq!(
        line,
        "1,ఆరు నెలలు,six months,meaning of six months,\"proverb, test\",ravi,2024-06-01 10:30:01"
    );
}

#[tokio::test]
async fn test_csv_reads_legacy_encoded_hand_edit() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::open(dir.path().join("data")).await.unwrap();
    std::fs::write(
        store.collection_path(Collection::Repository),
        b"proverb_telugu,proverb_english,meaning_english,keywords\nx,na\xEFve,,\n",
    )
    .unwrap();

    let rows = store.read_repository().await.unwrap();
    assert_eq!(rows[0].translated_text, "naïve");
}

#[tokio::test]
async fn test_csv_corrupt_file_is_fatal_and_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::open(dir.path().join("data")).await.unwrap();
    let path = store.collection_path(Collection::Pending);
    let corrupt = "serial_no,proverb_telugu\nnot-a-number,x\n";
    std::fs::write(&path, corrupt).unwrap();

    assert!(matches!(store.read_all(Collection::Pending).await, Err(Error::Storage(_))));

    let append = store
        .append(Collection::Pending, &ProverbRecord::Pending(pending(1, "a", "b", "c")))
        .await;
    assert!(matches!(append, Err(Error::Storage(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), corrupt);
}

#[tokio::test]
async fn test_csv_replays_interrupted_approval_after_repository_append() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    {
        let store = CsvStore::open(&data_dir).await.unwrap();
        seed_pending(&store, &[pending(5, "a", "one", "ravi")]).await;
        // Crash after the repository append, before the pending removal
        seed_repository(&store, &[approved("a", "one")]).await;
    }
    let journal = ApprovalJournal::new(data_dir.join("approval.journal"));
    journal.begin(&JournalEntry::new(5, approved("a", "one"), 0)).await.unwrap();

    let store = CsvStore::open(&data_dir).await.unwrap();

    assert!(store.read_pending().await.unwrap().is_empty());
    assert_eq!(store.read_repository().await.unwrap(), vec![approved("a", "one")]);
    assert!(!data_dir.join("approval.journal").exists());
}

#[tokio::test]
async fn test_csv_replays_interrupted_approval_before_any_write() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    {
        let store = CsvStore::open(&data_dir).await.unwrap();
        seed_pending(&store, &[pending(5, "a", "one", "ravi")]).await;
    }
    ApprovalJournal::new(data_dir.join("approval.journal"))
        .begin(&JournalEntry::new(5, approved("a", "one"), 0))
        .await
        .unwrap();

    let store = CsvStore::open(&data_dir).await.unwrap();

    assert!(store.read_pending().await.unwrap().is_empty());
    assert_eq!(store.read_repository().await.unwrap(), vec![approved("a", "one")]);
}

#[tokio::test]
async fn test_csv_replay_appends_when_repository_already_holds_identical_row() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    {
        let store = CsvStore::open(&data_dir).await.unwrap();
        seed_repository(&store, &[approved("a", "one")]).await;
        seed_pending(&store, &[pending(5, "a", "one", "ravi")]).await;
    }
    // Crash after begin, before the repository append
    ApprovalJournal::new(data_dir.join("approval.journal"))
        .begin(&JournalEntry::new(5, approved("a", "one"), 1))
        .await
        .unwrap();

    let store = CsvStore::open(&data_dir).await.unwrap();

    assert!(store.read_pending().await.unwrap().is_empty());
    assert_eq!(
        store.read_repository().await.unwrap(),
        vec![approved("a", "one"), approved("a", "one")]
    );
    assert!(!data_dir.join("approval.journal").exists());
}

#[tokio::test]
async fn test_csv_transfer_with_identical_repository_row_adds_one() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::open(dir.path().join("data")).await.unwrap();
    seed_repository(&store, &[approved("a", "one")]).await;
    seed_pending(&store, &[pending(5, "a", "one", "ravi")]).await;

    assert!(store.transfer(5, &approved("a", "one")).await.unwrap());

    assert!(store.read_pending().await.unwrap().is_empty());
    assert_eq!(store.read_repository().await.unwrap().len(), 2);
}
