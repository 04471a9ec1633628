use super::{
    get_meta, open_connection, quote_identifier, schema_version, set_meta, table_exists,
    CURRENT_SCHEMA_VERSION,
};

fn unique_db_path() -> String {
    std::env::temp_dir()
        .join(format!("liftlog-db-{}.sqlite", uuid::Uuid::now_v7()))
        .display()
        .to_string()
}

fn cleanup_db_files(path: &str) {
    for suffix in ["", "-wal", "-shm"] {
        let candidate = format!("{path}{suffix}");
        let _ = std::fs::remove_file(candidate);
    }
}

#[test]
fn configures_connection_pragmas() {
    let path = unique_db_path();
    let conn = open_connection(&path).expect("connection should open");

    let journal_mode: String = conn
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .expect("journal_mode pragma should be readable");
    assert_eq!(journal_mode.to_uppercase(), "WAL");

    let busy_timeout: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .expect("busy_timeout pragma should be readable");
    assert_eq!(busy_timeout, 5000);

    cleanup_db_files(&path);
}

#[test]
fn fresh_database_gets_meta_and_version() {
    let path = unique_db_path();
    let conn = open_connection(&path).expect("connection should open");

    assert!(table_exists(&conn, "meta").expect("lookup should work"));
    assert!(!table_exists(&conn, "workout").expect("lookup should work"));
    assert_eq!(
        schema_version(&conn).expect("version should be readable"),
        CURRENT_SCHEMA_VERSION
    );

    drop(conn);
    let reopened = open_connection(&path).expect("reopen should work");
    assert_eq!(
        schema_version(&reopened).expect("version should be readable"),
        CURRENT_SCHEMA_VERSION
    );

    cleanup_db_files(&path);
}

#[test]
fn newer_schema_is_refused() {
    let path = unique_db_path();
    let conn = open_connection(&path).expect("connection should open");
    conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION + 1)
        .expect("version should be writable");
    drop(conn);

    let err = open_connection(&path).expect_err("newer schema should be refused");
    assert!(err.to_string().contains("newer than supported"));

    cleanup_db_files(&path);
}

#[test]
fn table_lookup_ignores_ascii_case() {
    let conn = open_connection(":memory:").expect("connection should open");
    conn.execute_batch("CREATE TABLE \"Workout\" (x TEXT);")
        .expect("table should be creatable");
    assert!(table_exists(&conn, "workout").expect("lookup should work"));
    assert!(table_exists(&conn, "WORKOUT").expect("lookup should work"));
    assert!(!table_exists(&conn, "workouts").expect("lookup should work"));
}

#[test]
fn meta_values_upsert() {
    let path = unique_db_path();
    let conn = open_connection(&path).expect("connection should open");

    assert_eq!(get_meta(&conn, "current_view").unwrap(), None);
    set_meta(&conn, "current_view", "logger").expect("set should work");
    set_meta(&conn, "current_view", "insights").expect("overwrite should work");
    assert_eq!(
        get_meta(&conn, "current_view").unwrap(),
        Some("insights".to_string())
    );

    cleanup_db_files(&path);
}

#[test]
fn identifiers_are_quoted_and_escaped() {
    assert_eq!(quote_identifier("workout"), "\"workout\"");
    assert_eq!(quote_identifier("my \"log\""), "\"my \"\"log\"\"\"");
}
