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

use super::simple_ack;
use crate::error::CodecResult;
use crate::fixed_header::{first_byte, PacketType};
use crate::reason_code::PubAckReasonCode;
use num_enum::TryFromPrimitive;

/// A decoded PUBACK.
#[derive(Debug, Clone, Copy)]
pub struct PubAck<'a> {
    pub packet_id: u16,
    pub reason: PubAckReasonCode,
    pub properties: &'a [u8],
}

/// Writes the short form (no reason code, no properties).
pub fn serialize(dst: &mut [u8], packet_id: u16) -> CodecResult<usize> {
    simple_ack::serialize_short(dst, first_byte(PacketType::Puback, 0), packet_id)
}

/// Writes the long form with an explicit reason code and properties.
pub fn serialize_long(dst: &mut [u8], packet_id: u16, reason: PubAckReasonCode, properties: &[u8]) -> CodecResult<usize> {
    simple_ack::serialize_long(dst, first_byte(PacketType::Puback, 0), packet_id, reason.as_u8(), properties)
}

/// Decodes a PUBACK body (the bytes after the fixed header).
pub fn deserialize(remaining: &[u8]) -> CodecResult<PubAck<'_>> {
    let (packet_id, reason, properties) = simple_ack::deserialize(remaining, |b| {
        PubAckReasonCode::try_from_primitive(b)
            .map_err(|_| crate::error::CodecError::BadResponse("unrecognized PUBACK reason code"))
    })?;
    Ok(PubAck { packet_id, reason, properties })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_round_trip() {
        let mut buf = [0u8; 4];
        let n = serialize(&mut buf, 0x1234).unwrap();
        assert_eq!(&buf[..n], &[0x40, 0x02, 0x12, 0x34]);
        let ack = deserialize(&buf[2..n]).unwrap();
        assert_eq!(ack.packet_id, 0x1234);
        assert_eq!(ack.reason, PubAckReasonCode::Success);
        assert!(ack.properties.is_empty());
    }

    #[test]
    fn rejects_zero_packet_id() {
        let mut buf = [0u8; 4];
        assert!(serialize(&mut buf, 0).is_err());
    }
}
