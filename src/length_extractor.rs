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

//! Component C7: peeling a packet type and Remaining Length off the
//! front of an inbound byte stream, before the caller knows how large a
//! buffer to allocate for the rest of the packet.
//!
//! Two entry points share the same VBI-walking logic: [`extract_from_stream`]
//! pulls bytes one at a time through a [`Transport`], [`extract_from_buffer`]
//! walks a buffer the caller has already filled as far as `end_index`.

use crate::error::{CodecError, CodecResult};
use crate::fixed_header::{classify_inbound, PacketType};
use crate::primitive::{decode_vbi, vbi_size};
use crate::trace_shim::trace;

/// The caller-owned transport a stream-mode extraction reads from.
///
/// Mirrors the blocking/non-blocking `recv`/`send` callback pair at the
/// codec's boundary: `>0` bytes read, `0` no data available, `<0` an
/// error. The codec never calls `send` itself; the method exists so a
/// single object can represent a connection.
pub trait Transport {
    fn recv(&mut self, buf: &mut [u8]) -> i32;
    fn send(&mut self, buf: &[u8]) -> i32;
}

/// Build-time-style limits threaded through deserialization.
///
/// `max_packet_size` is the one piece of configuration the codec
/// itself enforces: MQTT v5 lets a client advertise, via the Maximum
/// Packet Size property, the largest packet it is willing to accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_packet_size: Option<u32>,
}

/// The result of peeling a fixed header off an inbound stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedHeader {
    pub packet_type: PacketType,
    pub flags: u8,
    pub remaining_length: u32,
    /// `1 + vbi_size(remaining_length)`: bytes consumed by the fixed
    /// header itself, before the variable header begins.
    pub header_length: usize,
}

/// Extract a fixed header by reading one byte at a time from `transport`.
///
/// A zero-byte read on the very first byte is `NoDataAvailable` (there
/// is simply nothing waiting); any other short read is `RecvFailed`.
pub fn extract_from_stream(transport: &mut dyn Transport) -> CodecResult<ExtractedHeader> {
    let mut first = [0u8; 1];
    match transport.recv(&mut first) {
        0 => return Err(CodecError::NoDataAvailable),
        n if n < 0 => return Err(CodecError::RecvFailed),
        _ => {}
    }
    let (packet_type, flags) = classify_inbound(first[0])?;

    let mut multiplier: u32 = 1;
    let mut value: u32 = 0;
    let mut consumed: usize = 0;
    loop {
        let mut byte_buf = [0u8; 1];
        if transport.recv(&mut byte_buf) <= 0 {
            return Err(CodecError::RecvFailed);
        }
        let byte = byte_buf[0];
        value = value.saturating_add(u32::from(byte & 0x7F) * multiplier);
        consumed += 1;
        if byte & 0x80 == 0 {
            if consumed != vbi_size(value) {
                return Err(CodecError::BadResponse(
                    "variable byte integer is not canonically encoded",
                ));
            }
            trace!(packet_type = ?packet_type, remaining_length = value, "extracted fixed header from stream");
            return Ok(ExtractedHeader {
                packet_type,
                flags,
                remaining_length: value,
                header_length: 1 + consumed,
            });
        }
        if consumed == 4 {
            return Err(CodecError::BadResponse("variable byte integer exceeds four bytes"));
        }
        multiplier *= 128;
    }
}

/// Extract a fixed header from `buf[..end_index]`, the portion a
/// caller has read so far.
///
/// Returns `NeedMoreBytes` when the Remaining Length VBI is not yet
/// fully present, so the caller can resume once more bytes arrive
/// without losing the bytes already read. `end_index == 0` is
/// `NoDataAvailable`.
pub fn extract_from_buffer(buf: &[u8], end_index: usize) -> CodecResult<ExtractedHeader> {
    if end_index == 0 {
        return Err(CodecError::NoDataAvailable);
    }
    let bytes = &buf[..end_index];
    let (packet_type, flags) = classify_inbound(bytes[0])?;
    if bytes.len() < 2 {
        return Err(CodecError::NeedMoreBytes);
    }
    let (remaining_length, consumed) = decode_vbi(&bytes[1..])?;
    trace!(packet_type = ?packet_type, remaining_length, "extracted fixed header from buffer");
    Ok(ExtractedHeader {
        packet_type,
        flags,
        remaining_length,
        header_length: 1 + consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedTransport<'a> {
        bytes: &'a [u8],
        pos: usize,
    }

    impl<'a> Transport for ScriptedTransport<'a> {
        fn recv(&mut self, buf: &mut [u8]) -> i32 {
            if self.pos >= self.bytes.len() {
                return 0;
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            1
        }

        fn send(&mut self, _buf: &[u8]) -> i32 {
            unimplemented!("extraction never sends")
        }
    }

    #[test]
    fn stream_mode_extracts_connack_header() {
        let mut t = ScriptedTransport { bytes: &[0x20, 0x03], pos: 0 };
        let header = extract_from_stream(&mut t).unwrap();
        assert_eq!(header.packet_type, PacketType::Connack);
        assert_eq!(header.remaining_length, 3);
        assert_eq!(header.header_length, 2);
    }

    #[test]
    fn stream_mode_no_data_on_empty_first_read() {
        let mut t = ScriptedTransport { bytes: &[], pos: 0 };
        assert!(matches!(extract_from_stream(&mut t), Err(CodecError::NoDataAvailable)));
    }

    #[test]
    fn buffer_mode_needs_more_bytes_mid_vbi() {
        let buf = [0xD0u8, 0x80];
        assert!(matches!(extract_from_buffer(&buf, 2), Err(CodecError::NeedMoreBytes)));
    }

    #[test]
    fn buffer_mode_no_data_when_empty() {
        let buf = [0u8; 4];
        assert!(matches!(extract_from_buffer(&buf, 0), Err(CodecError::NoDataAvailable)));
    }

    #[test]
    fn buffer_mode_rejects_non_canonical_vbi() {
        let buf = [0xD0u8, 0x80, 0x00];
        assert!(matches!(extract_from_buffer(&buf, 3), Err(CodecError::BadResponse(_))));
    }

    #[test]
    fn buffer_mode_succeeds_exactly_at_vbi_last_byte() {
        let buf = [0x20u8, 0x7F];
        let header = extract_from_buffer(&buf, 2).unwrap();
        assert_eq!(header.remaining_length, 127);
    }
}
