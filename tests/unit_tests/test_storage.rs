use std::path::PathBuf;

use sdsql::{
    engine::{table::Table, txn::LogEntry},
    models::data_types::{ColumnDef, DataType},
    storage::{FileBackend, StorageBackend, StorageError},
    utils::generate_session_token,
};

fn temp_backend() -> (FileBackend, PathBuf) {
    let root = std::env::temp_dir().join(format!("sdsql_store_{}", generate_session_token()));
    let backend = FileBackend::open(&root).expect("open backend");
    (backend, root)
}

fn sample_table() -> Table {
    let mut table = Table::new(
        "users",
        vec![
            ColumnDef::new("id", DataType::Int, true),
            ColumnDef::new("name", DataType::String, false),
        ],
    )
    .expect("valid table");
    table.rows = vec![
        vec!["1".into(), "Alice".into()],
        vec!["2".into(), "Bob".into()],
    ];
    table
}

#[test]
fn test_save_then_load_roundtrips() {
    let (backend, root) = temp_backend();
    backend.create_db("db").expect("create db");

    let table = sample_table();
    backend.save_table("db", &table).expect("save");
    let loaded = backend.load_table("db", "users").expect("load");
    assert_eq!(loaded, table);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_list_tables_sees_saved_tables() {
    let (backend, root) = temp_backend();
    backend.create_db("db").expect("create db");
    backend.save_table("db", &sample_table()).expect("save");

    let mut other = sample_table();
    other.name = "orders".into();
    backend.save_table("db", &other).expect("save");

    assert_eq!(backend.list_tables("db").expect("list"), ["orders", "users"]);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_truncate_and_rewrite_replaces_rows() {
    let (backend, root) = temp_backend();
    backend.create_db("db").expect("create db");

    let mut table = sample_table();
    backend.save_table("db", &table).expect("save");

    table.rows = vec![vec!["9".into(), "Zed".into()]];
    backend.save_table("db", &table).expect("rewrite");

    let loaded = backend.load_table("db", "users").expect("load");
    assert_eq!(loaded.rows, [["9", "Zed"]]);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_missing_database_and_table_errors() {
    let (backend, root) = temp_backend();
    assert!(matches!(
        backend.load_table("ghost", "users"),
        Err(StorageError::DatabaseNotFound(_))
    ));

    backend.create_db("db").expect("create db");
    assert!(matches!(
        backend.load_table("db", "users"),
        Err(StorageError::TableNotFound { .. })
    ));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_drop_table_removes_all_artifacts() {
    let (backend, root) = temp_backend();
    backend.create_db("db").expect("create db");
    backend.save_table("db", &sample_table()).expect("save");

    backend.drop_table("db", "users").expect("drop");
    assert!(backend.list_tables("db").expect("list").is_empty());
    assert!(backend.load_table("db", "users").is_err());

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_drop_db_removes_the_container() {
    let (backend, root) = temp_backend();
    backend.create_db("db").expect("create db");
    assert!(backend.db_exists("db"));
    backend.drop_db("db").expect("drop");
    assert!(!backend.db_exists("db"));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_txn_log_lifecycle() {
    let (backend, root) = temp_backend();
    backend.create_db("db").expect("create db");

    backend.create_log("db", 1).expect("create log");
    backend
        .append_log(
            "db",
            &LogEntry::Insert {
                table: "users".into(),
                row: vec!["1".into(), "Alice".into()],
            },
        )
        .expect("append");
    backend
        .append_log(
            "db",
            &LogEntry::Delete {
                table: "users".into(),
                old_row: vec!["1".into(), "Alice".into()],
            },
        )
        .expect("append");

    let log_path = root.join("db").join("txn.log");
    assert!(log_path.is_file(), "log exists while the txn is active");

    backend.delete_log("db").expect("delete log");
    assert!(!log_path.is_file(), "log is gone after commit/rollback");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_corrupt_rows_artifact_is_reported() {
    let (backend, root) = temp_backend();
    backend.create_db("db").expect("create db");
    backend.save_table("db", &sample_table()).expect("save");

    std::fs::write(root.join("db").join("users.rows.json"), "not json")
        .expect("corrupt file");
    assert!(matches!(
        backend.load_table("db", "users"),
        Err(StorageError::Corrupt { .. })
    ));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_row_width_mismatch_is_corrupt() {
    let (backend, root) = temp_backend();
    backend.create_db("db").expect("create db");
    backend.save_table("db", &sample_table()).expect("save");

    std::fs::write(root.join("db").join("users.rows.json"), r#"[["only-one-cell"]]"#)
        .expect("write rows");
    assert!(matches!(
        backend.load_table("db", "users"),
        Err(StorageError::Corrupt { .. })
    ));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_pk_descriptor_tracks_the_key_column() {
    let (backend, root) = temp_backend();
    backend.create_db("db").expect("create db");
    backend.save_table("db", &sample_table()).expect("save");
    assert!(root.join("db").join("users.pk.json").is_file());

    let mut keyless = sample_table();
    keyless.columns[0].is_primary_key = false;
    backend.save_table("db", &keyless).expect("save keyless");
    assert!(
        !root.join("db").join("users.pk.json").is_file(),
        "descriptor disappears with the key"
    );

    let _ = std::fs::remove_dir_all(root);
}
