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
use crate::reason_code::PubRecReasonCode;
use num_enum::TryFromPrimitive;

/// A decoded PUBREC.
#[derive(Debug, Clone, Copy)]
pub struct PubRec<'a> {
    pub packet_id: u16,
    pub reason: PubRecReasonCode,
    pub properties: &'a [u8],
}

pub fn serialize(dst: &mut [u8], packet_id: u16) -> CodecResult<usize> {
    simple_ack::serialize_short(dst, first_byte(PacketType::Pubrec, 0), packet_id)
}

pub fn serialize_long(dst: &mut [u8], packet_id: u16, reason: PubRecReasonCode, properties: &[u8]) -> CodecResult<usize> {
    simple_ack::serialize_long(dst, first_byte(PacketType::Pubrec, 0), packet_id, reason.as_u8(), properties)
}

pub fn deserialize(remaining: &[u8]) -> CodecResult<PubRec<'_>> {
    let (packet_id, reason, properties) = simple_ack::deserialize(remaining, |b| {
        PubRecReasonCode::try_from_primitive(b)
            .map_err(|_| crate::error::CodecError::BadResponse("unrecognized PUBREC reason code"))
    })?;
    Ok(PubRec { packet_id, reason, properties })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_round_trip() {
        let mut buf = [0u8; 4];
        let n = serialize(&mut buf, 7).unwrap();
        assert_eq!(&buf[..n], &[0x50, 0x02, 0x00, 0x07]);
        let ack = deserialize(&buf[2..n]).unwrap();
        assert_eq!(ack.reason, PubRecReasonCode::Success);
    }
}
