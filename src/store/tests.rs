use super::{RowStore, SqliteRowStore, StorageError};
use crate::db;
use crate::domain::entry::{Compound, WorkoutDate, WorkoutEntry};
use std::str::FromStr;

fn unique_db_path() -> String {
    std::env::temp_dir()
        .join(format!("liftlog-store-{}.sqlite", uuid::Uuid::now_v7()))
        .display()
        .to_string()
}

fn cleanup_db_files(path: &str) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}

fn set(date: &str, exercise: &str, weight: f64, reps: u32) -> WorkoutEntry {
    WorkoutEntry {
        date: WorkoutDate::from_str(date).expect("test date should parse"),
        workout: "Legs".to_string(),
        exercise: exercise.to_string(),
        position: "Standing".to_string(),
        weight,
        set_number: 1,
        target_reps: 8,
        number_of_reps: reps,
        is_compound: Compound::Yes,
        muscle: "Quads".to_string(),
    }
}

fn sorted(mut rows: Vec<WorkoutEntry>) -> Vec<WorkoutEntry> {
    rows.sort_by(|left, right| {
        (left.date, &left.exercise, left.weight.to_bits(), left.number_of_reps).cmp(&(
            right.date,
            &right.exercise,
            right.weight.to_bits(),
            right.number_of_reps,
        ))
    });
    rows
}

#[test]
fn missing_table_loads_as_empty_log() {
    let path = unique_db_path();
    let store = SqliteRowStore::open(&path, "workout").expect("store should open");
    assert!(store.load().expect("load should succeed").is_empty());
    cleanup_db_files(&path);
}

#[test]
fn save_creates_table_and_round_trips() {
    let path = unique_db_path();
    let mut store = SqliteRowStore::open(&path, "workout").expect("store should open");
    let rows = vec![
        set("2026-06-01", "Squat", 140.0, 5),
        set("2026-06-01", "Squat", 142.5, 4),
        set("2026-06-03", "Lunge", 30.0, 12),
    ];

    store.save(&rows).expect("save should succeed");
    assert!(db::table_exists(store.connection(), "workout").expect("lookup should work"));
    assert_eq!(store.load().expect("load should succeed"), rows);

    cleanup_db_files(&path);
}

#[test]
fn saving_a_load_is_idempotent() {
    let path = unique_db_path();
    let mut store = SqliteRowStore::open(&path, "workout").expect("store should open");
    let rows = vec![
        set("2026-06-03", "Lunge", 30.0, 12),
        set("2026-06-01", "Squat", 140.0, 5),
        set("2026-06-01", "Squat", 140.0, 5),
    ];
    store.save(&rows).expect("save should succeed");

    let first = store.load().expect("load should succeed");
    store.save(&first).expect("resave should succeed");
    let second = store.load().expect("reload should succeed");

    assert_eq!(sorted(first), sorted(second.clone()));
    assert_eq!(sorted(second), sorted(rows));

    cleanup_db_files(&path);
}

#[test]
fn save_replaces_the_whole_table() {
    let path = unique_db_path();
    let mut store = SqliteRowStore::open(&path, "workout").expect("store should open");
    store
        .save(&[set("2026-06-01", "Squat", 140.0, 5), set("2026-06-02", "Squat", 100.0, 8)])
        .expect("save should succeed");
    store
        .save(&[set("2026-06-05", "Deadlift", 180.0, 3)])
        .expect("second save should succeed");

    let loaded = store.load().expect("load should succeed");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].exercise, "Deadlift");

    cleanup_db_files(&path);
}

#[test]
fn workout_exercise_column_is_written() {
    let path = unique_db_path();
    let mut store = SqliteRowStore::open(&path, "workout").expect("store should open");
    store
        .save(&[set("2026-06-01", "Squat", 140.0, 5)])
        .expect("save should succeed");

    let derived: String = store
        .connection()
        .query_row("SELECT \"Workout_Exercise\" FROM \"workout\"", [], |row| {
            row.get(0)
        })
        .expect("derived column should be readable");
    assert_eq!(derived, "Legs-Squat");

    cleanup_db_files(&path);
}

#[test]
fn table_names_are_quoted() {
    let path = unique_db_path();
    let mut store = SqliteRowStore::open(&path, "my log").expect("store should open");
    store
        .save(&[set("2026-06-01", "Squat", 140.0, 5)])
        .expect("save should succeed");
    assert_eq!(store.load().expect("load should succeed").len(), 1);

    cleanup_db_files(&path);
}

#[test]
fn undecodable_rows_are_storage_errors() {
    let path = unique_db_path();
    let mut store = SqliteRowStore::open(&path, "workout").expect("store should open");
    store
        .save(&[set("2026-06-01", "Squat", 140.0, 5), set("2026-06-02", "Squat", 140.0, 5)])
        .expect("save should succeed");
    store
        .connection()
        .execute(
            "UPDATE \"workout\" SET \"Is_Compound\" = 'Sometimes' WHERE \"Date\" = '2026-06-02'",
            [],
        )
        .expect("corrupting update should work");

    let err = store.load().expect_err("corrupt row should fail to load");
    match err {
        StorageError::CorruptRow { row, column, .. } => {
            assert_eq!(row, 2);
            assert_eq!(column, "Is_Compound");
        }
        other => panic!("expected CorruptRow, got {other:?}"),
    }

    cleanup_db_files(&path);
}

#[test]
fn failed_save_leaves_previous_rows() {
    let path = unique_db_path();
    let mut store = SqliteRowStore::open(&path, "workout").expect("store should open");
    store
        .save(&[set("2026-06-01", "Squat", 140.0, 5)])
        .expect("save should succeed");

    // A conflicting schema makes the insert fail mid-transaction.
    store
        .connection()
        .execute_batch(
            "DROP TABLE \"workout\"; CREATE TABLE \"workout\" (\"Date\" TEXT NOT NULL);
             INSERT INTO \"workout\" VALUES ('2026-01-01');",
        )
        .expect("schema swap should work");
    let err = store
        .save(&[set("2026-06-02", "Squat", 150.0, 5)])
        .expect_err("insert into mismatched schema should fail");
    assert!(matches!(err, StorageError::Db(_)));

    let remaining: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM \"workout\"", [], |row| row.get(0))
        .expect("count should be readable");
    assert_eq!(remaining, 1);

    cleanup_db_files(&path);
}

#[test]
fn table_name_case_does_not_hide_rows() {
    let path = unique_db_path();
    let mut first = SqliteRowStore::open(&path, "Workout").expect("store should open");
    first
        .save(&[set("2026-06-01", "Squat", 140.0, 5)])
        .expect("save should succeed");
    drop(first);

    let mut second = SqliteRowStore::open(&path, "workout").expect("store should open");
    assert_eq!(second.load().expect("load should succeed").len(), 1);

    second
        .save(&[
            set("2026-06-01", "Squat", 140.0, 5),
            set("2026-06-03", "Squat", 145.0, 3),
        ])
        .expect("save should succeed");
    let tables: i64 = second
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 'workout'",
            [],
            |row| row.get(0),
        )
        .expect("count should be readable");
    assert_eq!(tables, 1);
    assert_eq!(second.load().expect("load should succeed").len(), 2);

    cleanup_db_files(&path);
}
