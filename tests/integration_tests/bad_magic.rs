use sdsql::models::{common::HEADER_LEN, parse::Message};
use serial_test::serial;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::common::TestServer;

// Garbage magic draws ERROR_RESPONSE, the connection dies, the server
// keeps accepting.
#[tokio::test]
#[serial]
async fn test_bad_magic_is_rejected_and_server_survives() {
    let server = TestServer::spawn().await;

    let mut raw = TcpStream::connect(&server.addr).await.expect("connect");
    // valid-looking frame with a corrupted sentinel
    raw.write_all(&[0x00, 0xAD, 0xBE, 0xEF, 0x20, 0x00, 0x00, 0x00, 0x00])
        .await
        .expect("write garbage");

    let mut header = [0u8; HEADER_LEN];
    raw.read_exact(&mut header).await.expect("read reply header");
    let payload_len = u32::from_be_bytes([header[5], header[6], header[7], header[8]]) as usize;
    let mut payload = vec![0u8; payload_len];
    raw.read_exact(&mut payload).await.expect("read reply payload");

    let mut frame = header.to_vec();
    frame.extend_from_slice(&payload);
    match Message::decode(&frame).expect("reply decodes") {
        Message::ErrorResponse(err) => {
            assert!(
                err.error_message.contains("magic"),
                "got: {}",
                err.error_message
            );
        },
        other => panic!("expected ERROR_RESPONSE, got {other:?}"),
    }

    // the offending connection is closed...
    let mut probe = [0u8; 1];
    assert_eq!(
        raw.read(&mut probe).await.expect("read EOF"),
        0,
        "server must disconnect after a framing error"
    );

    // ...but new clients are still served
    let mut client = server.client().await;
    client.login("admin", "123456").await.expect("fresh login");
}
