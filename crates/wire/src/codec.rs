// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Encode/decode and socket helpers for the one-message-per-connection
//! TCP framing.

use crate::Message;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

/// Errors from encoding, decoding, or moving messages over a socket.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("receive timed out")]
    Timeout,
}

impl ProtocolError {
    /// True when the far side refused the connection, the one network
    /// failure the scheduler reacts to (by declaring the peer dead).
    pub fn is_connection_refused(&self) -> bool {
        matches!(
            self,
            ProtocolError::Io(e) if e.kind() == std::io::ErrorKind::ConnectionRefused
        )
    }
}

/// Serialize a message to its JSON wire bytes.
pub fn encode(message: &Message) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}

/// Decode one message from a complete payload (a drained TCP stream or
/// a single UDP datagram).
pub fn decode(payload: &[u8]) -> Result<Message, ProtocolError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Read one message: buffer until the sender half-closes, then decode.
/// `timeout` bounds the whole read so a stalled sender cannot pin the
/// accept loop past shutdown.
pub async fn read_message<R>(reader: &mut R, timeout: Duration) -> Result<Message, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut payload = Vec::new();
    match tokio::time::timeout(timeout, reader.read_to_end(&mut payload)).await {
        Ok(read) => {
            read?;
        }
        Err(_) => return Err(ProtocolError::Timeout),
    }
    decode(&payload)
}

/// Open a fresh TCP connection to `addr`, write one message, and
/// half-close. Each control message gets its own connection.
pub async fn send_message<A>(addr: A, message: &Message) -> Result<(), ProtocolError>
where
    A: ToSocketAddrs,
{
    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(&encode(message)?).await?;
    stream.shutdown().await?;
    Ok(())
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
