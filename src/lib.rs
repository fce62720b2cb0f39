// MIT License
//
// Copyright (c) 2025 Takatoshi Kondo
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! # MQTT v5.0 Codec Core
//!
//! A Sans-I/O MQTT v5.0 control-packet codec: bit-exact wire framing, the
//! v5 Property subsystem, and CONNACK semantic decoding.
//!
//! This crate does not perform I/O. It translates between MQTT v5 control
//! packets on the wire and a structured in-memory representation; the
//! caller owns the transport, the byte buffers, and the surrounding
//! session-state machine (packet-id allocation, retransmission, keep-alive
//! timers).
//!
//! ## Layout
//!
//! - [`primitive`] — Variable Byte Integer, UTF-8 string, and binary-data
//!   wire primitives (component C1).
//! - [`fixed_header`] — the one-byte control-packet-type-and-flags octet
//!   plus the Remaining Length VBI (component C2).
//! - [`property`] — the tag-prefixed, variable-length Property subsystem:
//!   a write-side builder (C3), a read-side cursor decoder (C4), and the
//!   per-packet-type legality matrix (C8).
//! - [`packet`] — per-packet-type serializers (C5) and deserializers (C6).
//! - [`length_extractor`] — incremental Remaining Length extraction from a
//!   transport callback or a partially-filled buffer (C7).
//! - [`reason_code`] — the closed v5 Reason Code enumeration.
//! - [`error`] — the tagged `CodecError` result type shared by every
//!   fallible operation in this crate.
//!
//! ## Example
//!
//! ```
//! use mqtt_v5_codec_core::packet::pingreq;
//!
//! let mut buf = [0u8; 2];
//! let n = pingreq::serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..n], &[0xC0, 0x00]);
//! ```

pub mod error;
pub mod fixed_header;
pub mod length_extractor;
pub mod packet;
pub mod primitive;
pub mod property;
pub mod reason_code;
mod trace_shim;

pub use error::CodecError;
