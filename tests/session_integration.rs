// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end tests against an in-process mock drive: a loopback TCP
//! listener that speaks the same PDU framing a real Kinetic drive would.
//! There is no way to run these against real hardware in CI, so the mock
//! stands in for the drive side of the protocol.

use std::time::Duration;

use bytes::Bytes;
use kinetic_client_rs::{
    cfg::config::SessionConfig,
    client::{Bus, Client},
    commands::{delete, get, key_range, noop, put},
    entry::Entry,
    key_range::{KeyRange, KeyRangeBuffer},
    message,
    proto::{self, Message, message::AuthType},
    session::Session,
    status::Status,
};
use prost::Message as _;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

const HMAC_KEY: &[u8] = b"asdfasdf";
const IDENTITY: i64 = 1;

async fn read_framed(stream: &mut TcpStream) -> (proto::Message, Bytes) {
    let mut header = [0u8; 9];
    stream.read_exact(&mut header).await.expect("header");
    let proto_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;
    let value_len = u32::from_be_bytes([header[5], header[6], header[7], header[8]]) as usize;
    let mut proto_buf = vec![0u8; proto_len];
    stream.read_exact(&mut proto_buf).await.expect("proto body");
    let mut value_buf = vec![0u8; value_len];
    if value_len > 0 {
        stream.read_exact(&mut value_buf).await.expect("value body");
    }
    let message = Message::decode(proto_buf.as_slice()).expect("decode message");
    (message, Bytes::from(value_buf))
}

async fn write_framed(stream: &mut TcpStream, message: &Message, value: &[u8]) {
    let proto_bytes = message.encode_to_vec();
    let mut header = [0u8; 9];
    header[0] = 0x46;
    header[1..5].copy_from_slice(&(proto_bytes.len() as u32).to_be_bytes());
    header[5..9].copy_from_slice(&(value.len() as u32).to_be_bytes());
    stream.write_all(&header).await.expect("write header");
    stream.write_all(&proto_bytes).await.expect("write proto");
    stream.write_all(value).await.expect("write value");
}

fn unsolicited_handshake(connection_id: i64) -> Message {
    let command = proto::Command {
        header: Some(proto::Header {
            connection_id,
            ..Default::default()
        }),
        body: None,
        status: Some(proto::Status {
            code: proto::StatusCode::Success as i32,
            ..Default::default()
        }),
    };
    Message {
        auth_type: AuthType::Unsolicitedstatus as i32,
        hmac_auth: None,
        pin_auth: None,
        command_bytes: command.encode_to_vec(),
    }
}

fn success_response(ack_sequence: i64, body: Option<proto::Body>) -> (Message, Vec<u8>) {
    let command = proto::Command {
        header: Some(proto::Header {
            ack_sequence,
            ..Default::default()
        }),
        body,
        status: Some(proto::Status {
            code: proto::StatusCode::Success as i32,
            ..Default::default()
        }),
    };
    let message = message::build_message(&command, message::Auth::Hmac {
        identity: IDENTITY,
        key: HMAC_KEY,
    });
    (message, Vec::new())
}

/// Starts a mock drive on an ephemeral port and returns (port, join handle
/// controlling the listener task). `behavior` is invoked once per
/// accepted request after the handshake; it gets the decoded `Command`
/// and the value bytes, and returns the response to send (or `None` to
/// send nothing, simulating a dropped/slow response).
async fn start_mock_drive<F>(behavior: F) -> u16
where
    F: Fn(proto::Command, Bytes) -> Option<(Message, Vec<u8>)> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        write_framed(&mut stream, &unsolicited_handshake(42), &[]).await;

        loop {
            let (message, value) = read_framed(&mut stream).await;
            let command = match message::verify_and_unwrap(&message, HMAC_KEY) {
                Ok(c) => c,
                Err(_) => continue,
            };
            if let Some((response, response_value)) = behavior(command, value) {
                write_framed(&mut stream, &response, &response_value).await;
            }
        }
    });

    port
}

fn test_config(port: u16) -> SessionConfig {
    SessionConfig {
        host: "127.0.0.1".to_string(),
        port,
        cluster_version: 0,
        identity: IDENTITY,
        hmac_key: String::from_utf8(HMAC_KEY.to_vec()).expect("ascii key"),
        use_tls: false,
        connect_timeout: Duration::from_secs(2),
        response_timeout: Duration::from_secs(2),
    }
}

async fn connect(port: u16) -> (std::sync::Arc<Session>, std::sync::Arc<Bus>) {
    let client = Client::init(&kinetic_client_rs::cfg::config::ClientConfig {
        log_file: None,
        log_level: "error".to_string(),
        log_json: false,
        max_threadpool_threads: 2,
    })
    .expect("client init");
    let bus = client.bus();
    let session = Session::connect(test_config(port), bus.clone())
        .await
        .expect("connect");
    (session, bus)
}

#[tokio::test]
async fn handshake_establishes_connection_id() {
    let port = start_mock_drive(|command, _| {
        let ack = command.header.expect("header").sequence;
        Some(success_response(ack, None))
    })
    .await;
    let (session, _bus) = connect(port).await;
    assert_eq!(session.connection_id(), 42);
    session.disconnect().await;
}

#[tokio::test]
async fn noop_round_trips() {
    let port = start_mock_drive(|command, _| {
        let ack = command.header.expect("header").sequence;
        Some(success_response(ack, None))
    })
    .await;
    let (session, _bus) = connect(port).await;
    noop::noop(&session).await.expect("noop succeeds");
    session.disconnect().await;
}

#[tokio::test]
async fn put_then_get_round_trips_value() {
    let stored: std::sync::Arc<std::sync::Mutex<Option<Vec<u8>>>> =
        std::sync::Arc::new(std::sync::Mutex::new(None));
    let stored_in_mock = stored.clone();
    let port = start_mock_drive(move |command, value| {
        let header = command.header.expect("header");
        let ack = header.sequence;
        match header.message_type() {
            proto::MessageType::Put => {
                *stored_in_mock.lock().expect("lock") = Some(value.to_vec());
                Some(success_response(ack, None))
            }
            proto::MessageType::Get => {
                let kv = proto::KeyValue {
                    key: b"k1".to_vec(),
                    tag: b"tag1".to_vec(),
                    ..Default::default()
                };
                let (msg, _) = success_response(ack, Some(proto::Body {
                    key_value: Some(kv),
                    ..Default::default()
                }));
                let value_out = stored_in_mock.lock().expect("lock").clone().unwrap_or_default();
                Some((msg, value_out))
            }
            _ => None,
        }
    })
    .await;
    let (session, _bus) = connect(port).await;

    let mut entry = Entry {
        key: Bytes::from_static(b"k1"),
        tag: Bytes::from_static(b"tag1"),
        value: Bytes::from_static(b"hello world"),
        ..Default::default()
    };
    put::put(&session, &mut entry).await.expect("put succeeds");

    let mut fetched = Entry {
        key: Bytes::from_static(b"k1"),
        ..Default::default()
    };
    get::get(&session, &mut fetched, get::Direction::Exact)
        .await
        .expect("get succeeds");
    assert_eq!(fetched.value, Bytes::from_static(b"hello world"));
    assert_eq!(fetched.tag, Bytes::from_static(b"tag1"));

    session.disconnect().await;
}

#[tokio::test]
async fn delete_propagates_not_found_status() {
    let port = start_mock_drive(|command, _| {
        let header = command.header.expect("header");
        let response = proto::Command {
            header: Some(proto::Header {
                ack_sequence: header.sequence,
                ..Default::default()
            }),
            body: None,
            status: Some(proto::Status {
                code: proto::StatusCode::NotFound as i32,
                ..Default::default()
            }),
        };
        let message = message::build_message(&response, message::Auth::Hmac {
            identity: IDENTITY,
            key: HMAC_KEY,
        });
        Some((message, Vec::new()))
    })
    .await;
    let (session, _bus) = connect(port).await;

    let entry = Entry {
        key: Bytes::from_static(b"missing"),
        ..Default::default()
    };
    let result = delete::delete(&session, &entry).await;
    assert_eq!(result, Err(Status::NotFound));
    session.disconnect().await;
}

#[tokio::test]
async fn operation_times_out_when_drive_never_replies() {
    let port = start_mock_drive(|_command, _value| None).await;
    let mut cfg = test_config(port);
    cfg.response_timeout = Duration::from_millis(200);
    let client = Client::init(&kinetic_client_rs::cfg::config::ClientConfig {
        log_file: None,
        log_level: "error".to_string(),
        log_json: false,
        max_threadpool_threads: 2,
    })
    .expect("client init");
    let session = Session::connect(cfg, client.bus()).await.expect("connect");

    let result = noop::noop(&session).await;
    assert_eq!(result, Err(Status::OperationTimedOut));
    session.disconnect().await;
}

#[tokio::test]
async fn get_key_range_reports_buffer_overrun_but_keeps_prefix() {
    let port = start_mock_drive(|command, _| {
        let header = command.header.expect("header");
        let keys = vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()];
        let range = proto::Range {
            keys,
            ..Default::default()
        };
        Some(success_response(header.sequence, Some(proto::Body {
            range: Some(range),
            ..Default::default()
        })))
    })
    .await;
    let (session, _bus) = connect(port).await;

    let range = KeyRange {
        start_key: Bytes::from_static(b"a"),
        end_key: Bytes::from_static(b"z"),
        max_returned: 3,
        ..Default::default()
    };
    let mut buffer = KeyRangeBuffer::with_capacity(2);
    let result = key_range::get_key_range(&session, &range, &mut buffer).await;
    assert_eq!(result, Err(Status::BufferOverrun));
    assert_eq!(buffer.keys.len(), 2);
    assert_eq!(buffer.keys[0], Bytes::from_static(b"a"));

    session.disconnect().await;
}

#[tokio::test]
async fn eleventh_concurrent_request_is_rejected_as_max_outstanding() {
    let port = start_mock_drive(|_command, _value| None).await;
    let (session, _bus) = connect(port).await;

    // Fill the session to capacity with requests the mock drive never
    // answers, so they stay outstanding for the duration of the test.
    let mut tasks = Vec::new();
    for _ in 0..kinetic_client_rs::operation::MAX_OUTSTANDING {
        let session = session.clone();
        tasks.push(tokio::spawn(async move { noop::noop(&session).await }));
    }
    // Give the writer loop a moment to register each before probing capacity.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let eleventh = noop::noop(&session).await;
    assert_eq!(eleventh, Err(Status::MaxOutstandingExceeded));

    for task in tasks {
        task.abort();
    }
    session.disconnect().await;
}

#[tokio::test]
async fn submit_async_runs_closure_off_the_caller_task() {
    let port = start_mock_drive(|command, _| {
        let ack = command.header.expect("header").sequence;
        Some(success_response(ack, None))
    })
    .await;
    let (session, _bus) = connect(port).await;

    let (tx, rx) = tokio::sync::oneshot::channel();
    let status = session.submit_async(
        proto::Command {
            header: None,
            body: None,
            status: None,
        },
        Bytes::new(),
        proto::MessageType::Noop,
        move |result| {
            let _ = tx.send(result.is_ok());
        },
    );
    assert_eq!(status, Status::SuccessPending);
    let completed_ok = rx.await.expect("closure ran");
    assert!(completed_ok);

    session.disconnect().await;
}
