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
use crate::primitive::{encode_vbi, vbi_size};
use crate::reason_code::DisconnectReasonCode;

/// Writes the fixed two-byte DISCONNECT packet (Normal Disconnection,
/// implied, no properties): `E0 00`.
pub fn serialize(dst: &mut [u8]) -> CodecResult<usize> {
    if dst.len() < 2 {
        return Err(CodecError::NoMemory);
    }
    dst[0] = first_byte(PacketType::Disconnect, 0);
    dst[1] = 0;
    Ok(2)
}

/// Writes the long form, carrying an explicit reason code and
/// properties (Session Expiry Interval, Reason String, Server
/// Reference, User Property).
pub fn serialize_long(dst: &mut [u8], reason: DisconnectReasonCode, properties: &[u8]) -> CodecResult<usize> {
    let prop_len_size = vbi_size(properties.len() as u32);
    let remaining = 1 + prop_len_size + properties.len();
    let total = 1 + vbi_size(remaining as u32) + remaining;
    if dst.len() < total {
        return Err(CodecError::NoMemory);
    }
    let mut cursor = 0;
    dst[cursor] = first_byte(PacketType::Disconnect, 0);
    cursor += 1;
    cursor += encode_vbi(&mut dst[cursor..], remaining as u32)?;
    dst[cursor] = reason.as_u8();
    cursor += 1;
    cursor += encode_vbi(&mut dst[cursor..], properties.len() as u32)?;
    dst[cursor..cursor + properties.len()].copy_from_slice(properties);
    cursor += properties.len();
    Ok(cursor)
}
