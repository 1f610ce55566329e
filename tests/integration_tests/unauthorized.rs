use sdsql::{
    client::Command,
    models::{
        data_types::Operation,
        parse::Message,
        query::{QueryRequest, QueryResponse},
    },
};
use serial_test::serial;

use super::common::{IO_TIMEOUT, TestServer};

// A user with no grants cannot change anything.
#[tokio::test]
#[serial]
async fn test_permissionless_user_is_denied_without_side_effects() {
    let server = TestServer::spawn().await;
    server
        .ctx
        .users
        .write()
        .await
        .create_user("guest", "guest123")
        .expect("create guest");

    let mut client = server.client().await;
    client.login("guest", "guest123").await.expect("guest login");

    let resp = client
        .execute(Command::CreateDatabase { name: "x".into() })
        .await
        .expect("round trip");
    match resp {
        QueryResponse::Err { error_message } => {
            assert!(
                error_message.contains("permission denied"),
                "got: {error_message}"
            );
        },
        QueryResponse::Ok { .. } => panic!("guest must be denied"),
    }

    // zero observable state change
    assert!(!server.ctx.engine.lock().await.has_database("x"));
}

#[tokio::test]
#[serial]
async fn test_granted_user_passes_the_same_check() {
    use sdsql::auth::{ObjectType, Permission};

    let server = TestServer::spawn().await;
    {
        let mut users = server.ctx.users.write().await;
        users.create_user("writer", "pw").expect("create writer");
        users
            .grant(
                "writer",
                Permission::any(Operation::CreateDatabase, ObjectType::Database),
            )
            .expect("grant");
    }

    let mut client = server.client().await;
    client.login("writer", "pw").await.expect("writer login");

    let resp = client
        .execute(Command::CreateDatabase { name: "x".into() })
        .await
        .expect("round trip");
    assert!(resp.is_success());
    assert!(server.ctx.engine.lock().await.has_database("x"));
}

// A token the server never issued draws the 401 error response.
#[tokio::test]
#[serial]
async fn test_unissued_token_gets_401() {
    let server = TestServer::spawn().await;
    let conn = sdsql::client::ClientConnection::connect(&server.addr, IO_TIMEOUT)
        .await
        .expect("connect");

    let mut req = QueryRequest::new(Operation::Select, "feedfacefeedfacefeedfacefeedface");
    req.table_name = "users".into();

    match conn.call(&Message::from(req)).await.expect("round trip") {
        Message::ErrorResponse(err) => {
            assert_eq!(err.error_code, 401);
            assert!(err.error_message.contains("session token"));
        },
        other => panic!("expected ERROR_RESPONSE, got {other:?}"),
    }
}
