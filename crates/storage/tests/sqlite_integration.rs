use storage::repository::{ResponseStore, StorageError};
use storage::sqlite::SqliteResponseStore;
use survey_core::model::{Exposure, PersistedRow, Rating, SessionId, assemble_rows};

fn build_rows(id: SessionId, ratings: &[f64]) -> Vec<PersistedRow> {
    let exposures: Vec<Exposure> = (0..ratings.len())
        .map(|i| Exposure::new(format!("Headline {i}"), format!("Summary {i}")).unwrap())
        .collect();
    let ratings: Vec<Rating> = ratings.iter().map(|v| Rating::new(*v).unwrap()).collect();
    assemble_rows(id, Rating::new(55.5).unwrap(), &exposures, &ratings).unwrap()
}

#[tokio::test]
async fn sqlite_roundtrips_session_rows() {
    let repo = SqliteResponseStore::open("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("open");
    repo.migrate().await.expect("migrate");

    let id = SessionId::generate();
    let rows = build_rows(id, &[60.0, 42.5, 90.1]);
    let written = repo.insert_batch(&rows).await.expect("insert");
    assert_eq!(written, 3);

    let fetched = repo.list_session_rows(id).await.expect("list");
    assert_eq!(fetched, rows);
}

#[tokio::test]
async fn sqlite_rejects_duplicate_session_batch() {
    let repo = SqliteResponseStore::open("sqlite:file:memdb_duplicate?mode=memory&cache=shared")
        .await
        .expect("open");
    repo.migrate().await.expect("migrate");

    let id = SessionId::generate();
    let rows = build_rows(id, &[10.0, 20.0]);
    repo.insert_batch(&rows).await.expect("first insert");

    let err = repo.insert_batch(&rows).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict), "unexpected {err:?}");

    // the failed batch rolled back as a unit
    assert_eq!(repo.list_session_rows(id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteResponseStore::open("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("open");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let other = SessionId::generate();
    assert!(repo.list_session_rows(other).await.unwrap().is_empty());
    assert_eq!(repo.insert_batch(&[]).await.unwrap(), 0);
}
