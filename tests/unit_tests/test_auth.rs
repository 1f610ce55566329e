use std::path::PathBuf;

use sdsql::{
    auth::{
        ADMIN_USER, ADMIN_USER_ID, ObjectType, Permission, SessionManager, UserStore,
        hash_password,
    },
    models::data_types::Operation,
    utils::generate_session_token,
};

fn temp_store_path() -> PathBuf {
    std::env::temp_dir().join(format!("sdsql_users_{}.json", generate_session_token()))
}

#[test]
fn test_admin_is_created_once() {
    let path = temp_store_path();
    let mut store = UserStore::open(&path).expect("open");
    store.ensure_admin("123456").expect("ensure admin");

    let admin = store.get(ADMIN_USER).expect("admin exists");
    assert_eq!(admin.user_id, ADMIN_USER_ID);
    let original_hash = admin.password_hash.clone();

    // a second ensure with another password must not overwrite
    store.ensure_admin("different").expect("ensure admin again");
    assert_eq!(
        store.get(ADMIN_USER).expect("admin").password_hash,
        original_hash
    );

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_verify_rejects_bad_credentials_generically() {
    let path = temp_store_path();
    let mut store = UserStore::open(&path).expect("open");
    store.ensure_admin("123456").expect("ensure admin");

    assert!(store.verify(ADMIN_USER, "123456").is_ok());
    let wrong_password = store.verify(ADMIN_USER, "nope").expect_err("must fail");
    let unknown_user = store.verify("ghost", "nope").expect_err("must fail");
    // same message for both: no user enumeration
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_users_survive_a_restart() {
    let path = temp_store_path();
    {
        let mut store = UserStore::open(&path).expect("open");
        store.ensure_admin("123456").expect("ensure admin");
        let id = store.create_user("guest", "pw").expect("create");
        assert_eq!(id, ADMIN_USER_ID + 1);
        store
            .grant(
                "guest",
                Permission::new(Operation::Select, ObjectType::Table, "users"),
            )
            .expect("grant");
    }

    let store = UserStore::open(&path).expect("reopen");
    let guest = store.get("guest").expect("guest persisted");
    assert_eq!(guest.user_id, ADMIN_USER_ID + 1);
    assert!(guest.can(Operation::Select, ObjectType::Table, "users"));
    assert!(!guest.can(Operation::Select, ObjectType::Table, "orders"));
    assert!(!guest.can(Operation::Insert, ObjectType::Table, "users"));

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_revoke_removes_a_grant() {
    let path = temp_store_path();
    let mut store = UserStore::open(&path).expect("open");
    store.create_user("guest", "pw").expect("create");

    let grant = Permission::any(Operation::Insert, ObjectType::Table);
    store.grant("guest", grant.clone()).expect("grant");
    assert!(store.get("guest").expect("guest").can(
        Operation::Insert,
        ObjectType::Table,
        "anything"
    ));

    store.revoke("guest", &grant).expect("revoke");
    assert!(!store.get("guest").expect("guest").can(
        Operation::Insert,
        ObjectType::Table,
        "anything"
    ));

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_admin_always_authorizes() {
    let path = temp_store_path();
    let mut store = UserStore::open(&path).expect("open");
    store.ensure_admin("123456").expect("ensure admin");
    let admin = store.get(ADMIN_USER).expect("admin");
    assert!(admin.can(Operation::DropDatabase, ObjectType::Database, "prod"));
    assert!(admin.can(Operation::Delete, ObjectType::Table, "anything"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_admin_cannot_be_dropped() {
    let path = temp_store_path();
    let mut store = UserStore::open(&path).expect("open");
    store.ensure_admin("123456").expect("ensure admin");
    assert!(store.drop_user(ADMIN_USER).is_err());
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_password_store_never_holds_plaintext() {
    let path = temp_store_path();
    let mut store = UserStore::open(&path).expect("open");
    store.create_user("guest", "hunter2").expect("create");
    let guest = store.get("guest").expect("guest");
    assert_ne!(guest.password_hash, "hunter2");
    assert_eq!(guest.password_hash, hash_password("hunter2"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_new_login_supersedes_the_previous_session() {
    let path = temp_store_path();
    let mut store = UserStore::open(&path).expect("open");
    store.ensure_admin("123456").expect("ensure admin");
    let admin = store.get(ADMIN_USER).expect("admin").clone();

    let sessions = SessionManager::new();
    let first = sessions.open(&admin);

    // the login handler evicts the old session before opening the new one
    let evicted = sessions.take_by_user(ADMIN_USER).expect("one session");
    assert_eq!(evicted.token, first.token);
    let second = sessions.open(&admin);

    assert_ne!(first.token, second.token);
    assert_eq!(sessions.len(), 1);
    assert!(!sessions.is_live(&first.token));
    assert!(sessions.is_live(&second.token));

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_taken_session_is_not_live() {
    let path = temp_store_path();
    let mut store = UserStore::open(&path).expect("open");
    store.ensure_admin("123456").expect("ensure admin");
    let admin = store.get(ADMIN_USER).expect("admin").clone();

    let sessions = SessionManager::new();
    let session = sessions.open(&admin);
    let token = session.token.clone();
    assert!(sessions.is_live(&token));

    let taken = sessions.take(&token).expect("take");
    assert!(!sessions.is_live(&token));
    sessions.restore(taken);
    assert!(sessions.is_live(&token));

    let _ = std::fs::remove_file(path);
}
