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

use crate::error::{CodecError, CodecResult};
use crate::fixed_header::{first_byte, PacketType};
use crate::primitive::{encode_length_prefixed, encode_u16_be, encode_vbi, vbi_size, VBI_MAX};

/// One requested subscription and its options byte.
#[derive(Debug, Clone, Copy)]
pub struct SubscribeFilter<'a> {
    pub filter: &'a str,
    pub qos: u8,
    pub no_local: bool,
    pub retain_as_published: bool,
    /// 0 (send always), 1 (send if new), 2 (never send) retained messages.
    pub retain_handling: u8,
}

impl<'a> SubscribeFilter<'a> {
    fn options_byte(&self) -> u8 {
        (self.qos & 0x03)
            | ((self.no_local as u8) << 2)
            | ((self.retain_as_published as u8) << 3)
            | ((self.retain_handling & 0x03) << 4)
    }

    fn validate(&self) -> CodecResult<()> {
        if self.qos > 2 {
            return Err(CodecError::BadParameter("subscribe filter QoS must be 0, 1 or 2"));
        }
        if self.retain_handling > 2 {
            return Err(CodecError::BadParameter("retain handling must be 0, 1 or 2"));
        }
        Ok(())
    }
}

/// Precompute `(remaining_length, total_packet_size)`.
pub fn get_packet_size(properties: &[u8], filters: &[SubscribeFilter]) -> CodecResult<(usize, usize)> {
    if filters.is_empty() {
        return Err(CodecError::BadParameter("SUBSCRIBE requires at least one topic filter"));
    }
    for f in filters {
        f.validate()?;
    }
    let mut remaining = 2 + vbi_size(properties.len() as u32) + properties.len();
    for f in filters {
        remaining += 2 + f.filter.len() + 1;
    }
    if remaining as u32 > VBI_MAX {
        return Err(CodecError::BadParameter("SUBSCRIBE remaining length exceeds the protocol maximum"));
    }
    let total = 1 + vbi_size(remaining as u32) + remaining;
    Ok((remaining, total))
}

/// Serialize a SUBSCRIBE packet.
pub fn serialize(dst: &mut [u8], packet_id: u16, properties: &[u8], filters: &[SubscribeFilter]) -> CodecResult<usize> {
    if packet_id == 0 {
        return Err(CodecError::BadParameter("packet identifier must not be zero"));
    }
    let (remaining, total) = get_packet_size(properties, filters)?;
    if dst.len() < total {
        return Err(CodecError::NoMemory);
    }
    let mut cursor = 0;
    dst[cursor] = first_byte(PacketType::Subscribe, 0b0010);
    cursor += 1;
    cursor += encode_vbi(&mut dst[cursor..], remaining as u32)?;
    cursor += encode_u16_be(&mut dst[cursor..], packet_id)?;
    cursor += encode_vbi(&mut dst[cursor..], properties.len() as u32)?;
    dst[cursor..cursor + properties.len()].copy_from_slice(properties);
    cursor += properties.len();
    for f in filters {
        cursor += encode_length_prefixed(&mut dst[cursor..], f.filter.as_bytes())?;
        dst[cursor] = f.options_byte();
        cursor += 1;
    }
    debug_assert_eq!(cursor, total);
    Ok(cursor)
}
