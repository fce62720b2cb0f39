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

//! UNSUBACK deserialization, the mirror image of [`crate::packet::suback`].

use crate::error::{CodecError, CodecResult, Outcome};
use crate::primitive::decode_u16_be;
use crate::primitive::decode_vbi;
use crate::property::{PropertyContext, PropertyReader};
use crate::reason_code::UnsubAckReasonCode;
use num_enum::TryFromPrimitive;

/// A decoded UNSUBACK. `reason_codes` holds one raw byte per requested
/// filter, in request order; decode them with [`reason_codes`].
#[derive(Debug, Clone, Copy)]
pub struct UnsubAck<'a> {
    pub packet_id: u16,
    pub properties: &'a [u8],
    pub reason_codes: &'a [u8],
}

/// Decode an UNSUBACK body (everything after the fixed header).
pub fn deserialize(remaining: &[u8]) -> CodecResult<(UnsubAck<'_>, Outcome)> {
    if remaining.len() < 3 {
        return Err(CodecError::BadResponse("UNSUBACK remaining length must be at least 3"));
    }
    let packet_id = decode_u16_be(remaining)?;
    if packet_id == 0 {
        return Err(CodecError::BadResponse("UNSUBACK packet identifier must not be zero"));
    }

    let (prop_len, vbi_len) = decode_vbi(&remaining[2..])?;
    let prop_start = 2 + vbi_len;
    let prop_end = prop_start + prop_len as usize;
    if remaining.len() <= prop_end {
        return Err(CodecError::BadResponse("UNSUBACK has no reason codes after its property section"));
    }

    let properties = &remaining[prop_start..prop_end];
    let mut reader = PropertyReader::new(properties, PropertyContext::Ack);
    while reader.next()?.is_some() {}

    let codes = &remaining[prop_end..];
    let mut any_failure = false;
    for &byte in codes {
        let code = UnsubAckReasonCode::try_from_primitive(byte)
            .map_err(|_| CodecError::BadResponse("unrecognized UNSUBACK reason code"))?;
        if code.is_failure() {
            any_failure = true;
        }
    }

    let outcome = if any_failure { Outcome::ServerRefused } else { Outcome::Success };
    Ok((UnsubAck { packet_id, properties, reason_codes: codes }, outcome))
}

/// Lazily decode the raw reason-code bytes carried by an `UnsubAck`.
pub fn reason_codes<'a>(ack: &UnsubAck<'a>) -> impl Iterator<Item = CodecResult<UnsubAckReasonCode>> + 'a {
    ack.reason_codes.iter().map(|&byte| {
        UnsubAckReasonCode::try_from_primitive(byte).map_err(|_| CodecError::BadResponse("unrecognized UNSUBACK reason code"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_filter_success() {
        let remaining = [0x00u8, 0x01, 0x00, 0x00];
        let (ack, outcome) = deserialize(&remaining).unwrap();
        assert_eq!(ack.packet_id, 1);
        assert_eq!(outcome, Outcome::Success);
        let codes: Vec<_> = reason_codes(&ack).collect::<Result<_, _>>().unwrap();
        assert_eq!(codes, vec![UnsubAckReasonCode::Success]);
    }

    #[test]
    fn failure_reason_code_marks_server_refused() {
        let remaining = [0x00u8, 0x01, 0x00, 0x11, 0x80];
        let (_, outcome) = deserialize(&remaining).unwrap();
        assert_eq!(outcome, Outcome::ServerRefused);
    }

    #[test]
    fn rejects_zero_packet_id() {
        let remaining = [0x00u8, 0x00, 0x00, 0x00];
        assert!(matches!(deserialize(&remaining), Err(CodecError::BadResponse(_))));
    }

    #[test]
    fn rejects_missing_reason_codes() {
        let remaining = [0x00u8, 0x01, 0x00];
        assert!(matches!(deserialize(&remaining), Err(CodecError::BadResponse(_))));
    }
}
