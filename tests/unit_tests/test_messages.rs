use sdsql::models::{
    data_types::{ColumnDef, DataType, Literal, Operation, SetClause, WhereClause},
    login::{LoginFailure, LoginRequest, LoginSuccess},
    parse::Message,
    ping::{PingRequest, PongResponse},
    query::{QueryRequest, QueryResponse},
    reject::ErrorResponse,
};

fn roundtrip(message: Message) {
    let frame = message.encode();
    let decoded = Message::decode(&frame).expect("frame decodes");
    assert_eq!(decoded, message);
}

#[test]
fn test_login_messages_roundtrip() {
    roundtrip(Message::from(LoginRequest::new("admin", "123456")));
    roundtrip(Message::from(LoginSuccess {
        session_token: "f3a9".repeat(8),
        user_id: 1001,
    }));
    roundtrip(Message::from(LoginFailure::new("invalid username or password")));
}

#[test]
fn test_ping_messages_roundtrip() {
    roundtrip(Message::from(PingRequest {
        timestamp_ms: 1_700_000_000_123,
    }));
    roundtrip(Message::from(PongResponse {
        original_timestamp_ms: 1_700_000_000_123,
        server_timestamp_ms: u64::MAX,
    }));
}

#[test]
fn test_error_response_roundtrip() {
    roundtrip(Message::from(ErrorResponse::new("invalid or expired session token", 401)));
}

#[test]
fn test_minimal_query_request_roundtrip() {
    roundtrip(Message::from(QueryRequest::new(
        Operation::CreateDatabase,
        "token",
    )));
}

#[test]
fn test_full_query_request_roundtrip() {
    let mut req = QueryRequest::new(Operation::Update, "0123456789abcdef");
    req.db_name = "test_db".into();
    req.table_name = "users".into();
    req.columns = vec![
        ColumnDef::new("id", DataType::Int, true),
        ColumnDef::new("name", DataType::String, false),
        ColumnDef::new("score", DataType::Double, false),
        ColumnDef::new("active", DataType::Bool, false),
    ];
    req.select_columns = vec!["id".into(), "name".into()];
    req.insert_values = vec![
        Literal::new(DataType::Int, "1"),
        Literal::new(DataType::String, "Alice"),
    ];
    req.update_clauses = vec![SetClause {
        column: "name".into(),
        value: Literal::new(DataType::String, "Bob"),
    }];
    req.where_clause = Some(WhereClause {
        column: "id".into(),
        operator: "=".into(),
        value: Literal::new(DataType::Int, "1"),
    });
    roundtrip(Message::from(req));
}

#[test]
fn test_query_response_ok_roundtrip() {
    roundtrip(Message::from(QueryResponse::ok(
        vec!["id".into(), "name".into(), "age".into()],
        vec![
            vec!["1".into(), "Alice".into(), "25".into()],
            vec!["2".into(), "Bob".into(), "30".into()],
        ],
    )));
}

#[test]
fn test_query_response_shapes_roundtrip() {
    roundtrip(Message::from(QueryResponse::empty()));
    roundtrip(Message::from(QueryResponse::affected(3)));
    roundtrip(Message::from(QueryResponse::failure(
        "duplicate primary key value '1' in table 'users'",
    )));
}

#[test]
fn test_ragged_rows_roundtrip() {
    // every row carries its own cell count on the wire
    roundtrip(Message::from(QueryResponse::ok(
        vec!["a".into(), "b".into()],
        vec![vec![], vec!["x".into()], vec!["y".into(), "z".into()]],
    )));
}

#[test]
fn test_all_operations_roundtrip() {
    for op in [
        Operation::CreateDatabase,
        Operation::DropDatabase,
        Operation::UseDatabase,
        Operation::CreateTable,
        Operation::DropTable,
        Operation::Insert,
        Operation::Select,
        Operation::Update,
        Operation::Delete,
    ] {
        roundtrip(Message::from(QueryRequest::new(op, "t")));
    }
}
