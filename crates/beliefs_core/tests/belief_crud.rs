use beliefs_core::db::migrations::latest_version;
use beliefs_core::db::open_db_in_memory;
use beliefs_core::{
    Belief, BeliefDraft, BeliefId, BeliefRepository, BeliefType, RepoError,
    SqliteBeliefRepository,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rusqlite::Connection;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
}

fn belief(message: &str, kind: BeliefType, now: DateTime<Utc>) -> Belief {
    Belief::create(BeliefDraft::new(message, kind), now)
}

#[test]
fn insert_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let created = belief("Ship early", BeliefType::Principle, at(1, 9));
    let id = repo.insert_belief(&created).unwrap();
    assert_eq!(id, created.id);

    let loaded = repo.find_belief(id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn created_at_survives_storage_at_millisecond_precision() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let now = at(1, 9) + Duration::nanoseconds(123_456_789);
    let created = belief("precise", BeliefType::Discovery, now);
    repo.insert_belief(&created).unwrap();

    let loaded = repo.find_belief(created.id).unwrap();
    assert_eq!(loaded.created_at, at(1, 9) + Duration::milliseconds(123));
}

#[test]
fn find_missing_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let id = BeliefId::generate();
    let err = repo.find_belief(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn list_orders_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let middle = belief("middle", BeliefType::Principle, at(2, 9));
    let oldest = belief("oldest", BeliefType::Discovery, at(1, 9));
    let newest = belief("newest", BeliefType::Principle, at(3, 9));
    repo.insert_belief(&middle).unwrap();
    repo.insert_belief(&oldest).unwrap();
    repo.insert_belief(&newest).unwrap();

    let listed: Vec<BeliefId> = repo
        .list_beliefs()
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(listed, vec![newest.id, middle.id, oldest.id]);
}

#[test]
fn list_breaks_created_at_ties_by_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let same_instant = at(4, 12);
    let first = belief("first", BeliefType::Principle, same_instant);
    let second = belief("second", BeliefType::Principle, same_instant);
    let third = belief("third", BeliefType::Discovery, same_instant);
    for item in [&first, &second, &third] {
        repo.insert_belief(item).unwrap();
    }

    let listed: Vec<BeliefId> = repo
        .list_beliefs()
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(listed, vec![third.id, second.id, first.id]);
}

#[test]
fn list_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    assert!(repo.list_beliefs().unwrap().is_empty());
}

#[test]
fn update_replaces_fields_and_keeps_identity_and_creation_instant() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let created = belief("draft", BeliefType::Principle, at(1, 9));
    repo.insert_belief(&created).unwrap();

    let new_day = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
    let updated = repo
        .update_belief(
            created.id,
            &BeliefDraft::new("revised", BeliefType::Discovery),
            new_day,
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.message, "revised");
    assert_eq!(updated.kind, BeliefType::Discovery);
    assert_eq!(updated.date, new_day);
    assert_eq!(repo.find_belief(created.id).unwrap(), updated);
}

#[test]
fn update_does_not_reorder_listing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let older = belief("older", BeliefType::Principle, at(1, 9));
    let newer = belief("newer", BeliefType::Principle, at(2, 9));
    repo.insert_belief(&older).unwrap();
    repo.insert_belief(&newer).unwrap();

    repo.update_belief(
        older.id,
        &BeliefDraft::new("older, edited", BeliefType::Principle),
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    )
    .unwrap();

    let listed = repo.list_beliefs().unwrap();
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let id = BeliefId::generate();
    let err = repo
        .update_belief(
            id,
            &BeliefDraft::new("ghost", BeliefType::Principle),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
    assert!(repo.list_beliefs().unwrap().is_empty());
}

#[test]
fn delete_removes_row_and_repeated_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let keep = belief("keep", BeliefType::Principle, at(1, 9));
    let doomed = belief("doomed", BeliefType::Discovery, at(2, 9));
    repo.insert_belief(&keep).unwrap();
    repo.insert_belief(&doomed).unwrap();

    repo.delete_belief(doomed.id).unwrap();
    assert!(matches!(repo.find_belief(doomed.id), Err(RepoError::NotFound(_))));
    assert!(matches!(repo.delete_belief(doomed.id), Err(RepoError::NotFound(_))));
    assert!(matches!(repo.delete_belief(doomed.id), Err(RepoError::NotFound(_))));

    let remaining = repo.list_beliefs().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
}

#[test]
fn insert_after_deleting_newest_still_lists_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let same_instant = at(6, 6);
    let first = belief("first", BeliefType::Principle, same_instant);
    let second = belief("second", BeliefType::Principle, same_instant);
    repo.insert_belief(&first).unwrap();
    repo.insert_belief(&second).unwrap();
    repo.delete_belief(second.id).unwrap();

    let third = belief("third", BeliefType::Principle, same_instant);
    repo.insert_belief(&third).unwrap();

    let listed = repo.list_beliefs().unwrap();
    assert_eq!(listed[0].id, third.id);
    assert_eq!(listed[1].id, first.id);
}

#[test]
fn read_rejects_invalid_persisted_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeliefRepository::try_new(&conn).unwrap();

    let created = belief("valid", BeliefType::Principle, at(1, 9));
    repo.insert_belief(&created).unwrap();
    conn.execute("UPDATE beliefs SET date = 'yesterday';", [])
        .unwrap();

    let err = repo.find_belief(created.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteBeliefRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_beliefs_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBeliefRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("beliefs"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE beliefs (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            message TEXT NOT NULL,
            type TEXT NOT NULL,
            date TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBeliefRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "beliefs",
            column: "created_at"
        })
    ));
}
