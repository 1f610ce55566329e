use sdsql::{
    engine::{Engine, EngineError, RowValues, SessionState},
    models::data_types::{ColumnDef, DataType},
    storage::MemoryBackend,
};

fn engine_with_table() -> (Engine, SessionState) {
    let mut engine = Engine::new(Box::new(MemoryBackend::new()));
    let mut session = SessionState::default();
    engine.create_database("test_db").expect("create db");
    engine
        .use_database("test_db", &mut session)
        .expect("use db");
    engine
        .create_table(
            &session,
            "users",
            vec![
                ColumnDef::new("id", DataType::Int, true),
                ColumnDef::new("name", DataType::String, false),
            ],
        )
        .expect("create table");
    (engine, session)
}

fn insert(engine: &mut Engine, session: &mut SessionState, id: &str, name: &str) {
    engine
        .insert(
            session,
            "users",
            RowValues::Positional(vec![id.into(), name.into()]),
        )
        .expect("insert");
}

fn rows(engine: &Engine, session: &SessionState) -> Vec<Vec<String>> {
    engine
        .select(session, "users", None, None, &[])
        .expect("select")
        .1
}

#[test]
fn test_begin_requires_database() {
    let mut engine = Engine::new(Box::new(MemoryBackend::new()));
    let mut session = SessionState::default();
    assert!(matches!(
        engine.begin_transaction(&mut session),
        Err(EngineError::NoDatabaseSelected)
    ));
}

#[test]
fn test_begin_twice_fails() {
    let (mut engine, mut session) = engine_with_table();
    engine.begin_transaction(&mut session).expect("begin");
    assert!(matches!(
        engine.begin_transaction(&mut session),
        Err(EngineError::TransactionActive)
    ));
}

#[test]
fn test_commit_without_transaction_fails() {
    let (mut engine, mut session) = engine_with_table();
    assert!(matches!(
        engine.commit(&mut session),
        Err(EngineError::NoActiveTransaction)
    ));
}

#[test]
fn test_rollback_undoes_inserts() {
    let (mut engine, mut session) = engine_with_table();

    engine.begin_transaction(&mut session).expect("begin");
    insert(&mut engine, &mut session, "1", "a");
    insert(&mut engine, &mut session, "2", "b");
    insert(&mut engine, &mut session, "3", "c");
    engine.rollback(&mut session).expect("rollback");

    assert!(rows(&engine, &session).is_empty());
    assert!(!session.txn.active);
}

#[test]
fn test_commit_then_rollback_is_an_error() {
    let (mut engine, mut session) = engine_with_table();

    engine.begin_transaction(&mut session).expect("begin");
    insert(&mut engine, &mut session, "1", "a");
    insert(&mut engine, &mut session, "2", "b");
    insert(&mut engine, &mut session, "3", "c");
    engine.commit(&mut session).expect("commit");

    assert!(matches!(
        engine.rollback(&mut session),
        Err(EngineError::NoActiveTransaction)
    ));
    assert_eq!(rows(&engine, &session).len(), 3);
}

#[test]
fn test_rollback_restores_pre_begin_state_exactly() {
    let (mut engine, mut session) = engine_with_table();
    insert(&mut engine, &mut session, "1", "a");
    insert(&mut engine, &mut session, "2", "b");
    let snapshot = rows(&engine, &session);

    engine.begin_transaction(&mut session).expect("begin");
    insert(&mut engine, &mut session, "3", "c");
    engine
        .update(
            &mut session,
            "users",
            &[("name".into(), "patched".into())],
            Some("id = 1"),
        )
        .expect("update");
    engine
        .delete(&mut session, "users", Some("id = 2"))
        .expect("delete");
    assert_ne!(rows(&engine, &session), snapshot);

    engine.rollback(&mut session).expect("rollback");
    let mut after = rows(&engine, &session);
    after.sort();
    let mut expected = snapshot;
    expected.sort();
    assert_eq!(after, expected);
}

#[test]
fn test_commit_survives_rollback_of_next_transaction() {
    let (mut engine, mut session) = engine_with_table();

    engine.begin_transaction(&mut session).expect("begin");
    insert(&mut engine, &mut session, "1", "a");
    engine.commit(&mut session).expect("commit");

    engine.begin_transaction(&mut session).expect("begin again");
    insert(&mut engine, &mut session, "2", "b");
    engine.rollback(&mut session).expect("rollback");

    assert_eq!(rows(&engine, &session), [["1", "a"]]);
}

#[test]
fn test_committed_state_is_persisted() {
    let backend = Box::new(MemoryBackend::new());
    let mut engine = Engine::new(backend);
    let mut session = SessionState::default();
    engine.create_database("test_db").expect("create db");
    engine
        .use_database("test_db", &mut session)
        .expect("use db");
    engine
        .create_table(
            &session,
            "users",
            vec![ColumnDef::new("id", DataType::Int, true)],
        )
        .expect("create table");

    engine.begin_transaction(&mut session).expect("begin");
    engine
        .insert(&mut session, "users", RowValues::Positional(vec!["1".into()]))
        .expect("insert");
    engine.commit(&mut session).expect("commit");

    // another session selecting the same database sees the committed row
    let mut other = SessionState::default();
    engine
        .use_database("test_db", &mut other)
        .expect("use db");
    assert_eq!(rows(&engine, &other), [["1"]]);
}
