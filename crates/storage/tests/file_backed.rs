use std::sync::Arc;

use storage::{GameStore, Storage, StoreError};

#[tokio::test]
async fn creates_database_file_and_persists_across_reopen() {
    let temp = tempfile::tempdir().expect("tempdir");
    let db_path = temp.path().join("nested").join("games.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let created = {
        let storage = Storage::new(&database_url).await.expect("db");
        let created = storage.insert("Scrabble").await.expect("insert");
        storage.pool().close().await;
        created
    };
    assert!(db_path.exists(), "database file should exist: {}", db_path.display());

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let games = reopened.list_all().await.expect("list");
    assert_eq!(games, vec![created]);
}

#[tokio::test]
async fn concurrent_writes_to_distinct_ids_do_not_interfere() {
    let temp = tempfile::tempdir().expect("tempdir");
    let database_url = format!(
        "sqlite://{}",
        temp.path().join("games.db").to_string_lossy().replace('\\', "/")
    );
    let storage = Arc::new(Storage::new(&database_url).await.expect("db"));

    let mut seeded = Vec::new();
    for i in 0..8 {
        seeded.push(storage.insert(&format!("game {i}")).await.expect("seed"));
    }

    let mut handles = Vec::new();
    for (i, game) in seeded.iter().enumerate() {
        let storage = Arc::clone(&storage);
        let id = game.id;
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                storage.rename(id, &format!("renamed {i}")).await.map(|_| ())
            } else {
                storage.remove(id).await
            }
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("write");
    }

    let games = storage.list_all().await.expect("list");
    assert_eq!(games.len(), 4);
    assert!(games.iter().all(|g| g.name.starts_with("renamed ")));

    let removed = seeded[1].id;
    let err = storage.rename(removed, "late").await.expect_err("removed");
    assert!(matches!(err, StoreError::NotFound(id) if id == removed));
}
