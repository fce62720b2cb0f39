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

//! Tagged result type shared by every fallible operation in this crate.
//!
//! `Success` is represented by `Ok(_)`; every other outcome in the
//! source codec's result enum has a matching `CodecError` variant.
//! `ServerRefused` is the one outcome that is not purely a failure: the
//! inbound packet decoded correctly but reports a semantic refusal, so it
//! carries the decoded value the caller would otherwise lose.

use thiserror::Error;

/// Every fallible operation in this crate returns `Result<T, CodecError>`.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Caller-supplied argument violates the API contract: a null/empty
    /// value where one is forbidden, a duplicate single-occurrence
    /// property, a property illegal for the target packet type, QoS 3,
    /// an empty UTF-8 string where length >= 1 is required, and so on.
    #[error("bad parameter: {0}")]
    BadParameter(&'static str),

    /// The destination buffer cannot hold the encoded output.
    #[error("destination buffer too small")]
    NoMemory,

    /// The transport `send` callback returned a negative byte count.
    #[error("transport send failed")]
    SendFailed,

    /// The transport `recv` callback returned a negative byte count.
    #[error("transport recv failed")]
    RecvFailed,

    /// Inbound bytes violate MQTT v5 framing or semantic rules: a
    /// non-canonical Variable Byte Integer, a truncated or overrun
    /// packet, an unknown packet type, a property illegal in this
    /// context, a duplicated property, an out-of-range property value,
    /// or a reason code outside the v5 set.
    #[error("malformed or protocol-violating input: {0}")]
    BadResponse(&'static str),

    /// The transport reported zero bytes available.
    #[error("no data available")]
    NoDataAvailable,

    /// A buffered incremental decode needs more bytes to complete.
    #[error("need more bytes")]
    NeedMoreBytes,
}

/// Result alias used throughout this crate.
pub type CodecResult<T> = Result<T, CodecError>;

/// Outcome of a decode that completed but may carry a semantic refusal.
///
/// CONNACK and SUBACK can decode successfully while still reporting that
/// the server refused the request (a non-zero reason code). The caller
/// needs the decoded packet either way, so this is not folded into
/// `CodecError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed and the server accepted the request.
    Success,
    /// The operation completed but the server refused the request; the
    /// decoded value (reason code, properties) is still valid and must
    /// be inspected by the caller.
    ServerRefused,
}
