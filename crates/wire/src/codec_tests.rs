// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tokio::net::TcpListener;

const RECV_TIMEOUT: Duration = Duration::from_secs(1);

#[test]
fn encode_decode_round_trip() {
    let message = Message::Heartbeat { worker_host: "localhost".into(), worker_port: 6001 };
    let bytes = encode(&message).unwrap();
    assert_eq!(decode(&bytes).unwrap(), message);
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode(b"not json").is_err());
    assert!(decode(b"").is_err());
}

#[tokio::test]
async fn send_then_read_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let message = Message::Finished { task_id: 7, worker_host: "localhost".into(), worker_port: 6001 };
    let sent = message.clone();
    let sender = tokio::spawn(async move { send_message(addr, &sent).await });

    let (mut stream, _) = listener.accept().await.unwrap();
    let received = read_message(&mut stream, RECV_TIMEOUT).await.unwrap();
    assert_eq!(received, message);
    sender.await.unwrap().unwrap();
}

#[tokio::test]
async fn read_waits_for_half_close() {
    use tokio::io::AsyncWriteExt;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Write the payload in two chunks with a pause; the reader must not
    // decode until EOF.
    let sender = tokio::spawn(async move {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let bytes = encode(&Message::Shutdown).unwrap();
        let (a, b) = bytes.split_at(bytes.len() / 2);
        stream.write_all(a).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        stream.write_all(b).await.unwrap();
        stream.shutdown().await.unwrap();
    });

    let (mut stream, _) = listener.accept().await.unwrap();
    let received = read_message(&mut stream, RECV_TIMEOUT).await.unwrap();
    assert_eq!(received, Message::Shutdown);
    sender.await.unwrap();
}

#[tokio::test]
async fn read_times_out_on_stalled_sender() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Connect but never write or close.
    let _stalled = tokio::net::TcpStream::connect(addr).await.unwrap();
    let (mut stream, _) = listener.accept().await.unwrap();

    let err = read_message(&mut stream, Duration::from_millis(50)).await.unwrap_err();
    assert!(matches!(err, ProtocolError::Timeout));
}

#[tokio::test]
async fn send_to_closed_port_is_connection_refused() {
    // Bind then drop to find a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = send_message(addr, &Message::Shutdown).await.unwrap_err();
    assert!(err.is_connection_refused());
}
