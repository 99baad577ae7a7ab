// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-plane protocol between the Manager, Workers, and job
//! submitters.
//!
//! Wire format: one JSON object per TCP connection, delimited by the
//! sender half-closing after the full payload (the receiver buffers to
//! EOF before decoding). Heartbeats ride UDP, one JSON datagram each.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod message;

pub use codec::{decode, encode, read_message, send_message, ProtocolError};
pub use message::Message;
