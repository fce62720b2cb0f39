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

//! Shared machinery for PUBACK, PUBREC, PUBREL and PUBCOMP: four packet
//! types whose wire shape is identical up to the reason-code enum they
//! carry. The source codec duplicated this logic per packet type; here
//! it lives once and each `pub*.rs` module supplies only its reason-code
//! type and fixed-header byte.

use crate::error::{CodecError, CodecResult};
use crate::primitive::{decode_u16_be, decode_vbi, encode_u16_be};
use crate::property::{PropertyContext, PropertyReader};

/// Writes the short form: `<first_byte><0x02><packet_id>`, with no
/// reason code or properties (an implicit reason code of zero).
pub(crate) fn serialize_short(dst: &mut [u8], first_byte: u8, packet_id: u16) -> CodecResult<usize> {
    if packet_id == 0 {
        return Err(CodecError::BadParameter("packet identifier must not be zero"));
    }
    if dst.len() < 4 {
        return Err(CodecError::NoMemory);
    }
    dst[0] = first_byte;
    dst[1] = 2;
    encode_u16_be(&mut dst[2..], packet_id)?;
    Ok(4)
}

/// Writes the long form, carrying an explicit reason code and property
/// section.
pub(crate) fn serialize_long(
    dst: &mut [u8],
    first_byte: u8,
    packet_id: u16,
    reason: u8,
    properties: &[u8],
) -> CodecResult<usize> {
    if packet_id == 0 {
        return Err(CodecError::BadParameter("packet identifier must not be zero"));
    }
    let prop_len_size = crate::primitive::vbi_size(properties.len() as u32);
    let remaining = 3 + prop_len_size + properties.len();
    let total = 1 + crate::primitive::vbi_size(remaining as u32) + remaining;
    if dst.len() < total {
        return Err(CodecError::NoMemory);
    }
    let mut cursor = 0;
    dst[cursor] = first_byte;
    cursor += 1;
    cursor += crate::primitive::encode_vbi(&mut dst[cursor..], remaining as u32)?;
    cursor += encode_u16_be(&mut dst[cursor..], packet_id)?;
    dst[cursor] = reason;
    cursor += 1;
    cursor += crate::primitive::encode_vbi(&mut dst[cursor..], properties.len() as u32)?;
    dst[cursor..cursor + properties.len()].copy_from_slice(properties);
    cursor += properties.len();
    Ok(cursor)
}

/// Decodes the body of a PUBACK/PUBREC/PUBREL/PUBCOMP packet
/// (everything after the fixed header), in either its short form
/// (`remaining_length == 2`, reason code implicitly zero) or its long
/// form (explicit reason code, optional properties).
pub(crate) fn deserialize<'a, R>(
    remaining: &'a [u8],
    decode_reason: impl FnOnce(u8) -> CodecResult<R>,
) -> CodecResult<(u16, R, &'a [u8])> {
    if remaining.len() < 2 {
        return Err(CodecError::BadResponse("truncated packet identifier"));
    }
    let packet_id = decode_u16_be(remaining)?;
    if packet_id == 0 {
        return Err(CodecError::BadResponse("packet identifier must not be zero"));
    }
    if remaining.len() == 2 {
        return Ok((packet_id, decode_reason(0)?, &remaining[2..2]));
    }
    let reason = decode_reason(remaining[2])?;
    if remaining.len() == 3 {
        return Ok((packet_id, reason, &remaining[3..3]));
    }
    let (prop_len, vn) = decode_vbi(&remaining[3..])?;
    let prop_start = 3 + vn;
    let prop_end = prop_start + prop_len as usize;
    if remaining.len() != prop_end {
        return Err(CodecError::BadResponse("trailing bytes after property section"));
    }
    let properties = &remaining[prop_start..prop_end];
    let mut reader = PropertyReader::new(properties, PropertyContext::Ack);
    while reader.next()?.is_some() {}
    Ok((packet_id, reason, properties))
}
