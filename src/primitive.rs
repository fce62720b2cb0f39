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

//! Wire primitives shared by every packet codec: the Variable Byte
//! Integer, two-byte length-prefixed UTF-8 strings and binary blobs, and
//! fixed-width big-endian integers.
//!
//! Every primitive here is caller-buffer-in, caller-buffer-out: nothing
//! in this module allocates or retains a reference past the call.

use crate::error::{CodecError, CodecResult};

/// Largest value a Variable Byte Integer can hold (4 bytes, continuation
/// bit clear on the last byte): `0x0FFF_FFFF`.
pub const VBI_MAX: u32 = 0x0FFF_FFFF;

/// Number of bytes `encode_vbi` would use for `value`.
///
/// Closed-form on the four length bands; does not itself validate that
/// `value` fits in a VBI (`encode_vbi` does).
pub fn vbi_size(value: u32) -> usize {
    if value < 128 {
        1
    } else if value < 16_384 {
        2
    } else if value < 2_097_152 {
        3
    } else {
        4
    }
}

/// Encode `value` as a Variable Byte Integer into `dst`.
///
/// Returns the number of bytes written. Fails with `BadParameter` if
/// `value` exceeds [`VBI_MAX`], or `NoMemory` if `dst` is too small.
pub fn encode_vbi(dst: &mut [u8], value: u32) -> CodecResult<usize> {
    if value > VBI_MAX {
        return Err(CodecError::BadParameter("variable byte integer out of range"));
    }
    let needed = vbi_size(value);
    if dst.len() < needed {
        return Err(CodecError::NoMemory);
    }
    let mut v = value;
    let mut i = 0;
    loop {
        let mut byte = (v & 0x7F) as u8;
        v >>= 7;
        if v > 0 {
            byte |= 0x80;
        }
        dst[i] = byte;
        i += 1;
        if v == 0 {
            break;
        }
    }
    Ok(i)
}

/// Decode a Variable Byte Integer from the front of `src`.
///
/// Returns `(value, bytes_consumed)`. Fails with `NeedMoreBytes` if
/// `src` ends before the continuation bit clears and fewer than four
/// bytes have been read, `BadResponse` if a fifth byte would be needed,
/// or if the encoding is not the canonical minimum length for the
/// decoded value (e.g. `[0x80, 0x00]` decodes to `0` using 2 bytes,
/// where `vbi_size(0) == 1`).
pub fn decode_vbi(src: &[u8]) -> CodecResult<(u32, usize)> {
    let mut multiplier: u32 = 1;
    let mut value: u32 = 0;
    for (i, &byte) in src.iter().take(4).enumerate() {
        value = value.saturating_add(u32::from(byte & 0x7F) * multiplier);
        if byte & 0x80 == 0 {
            let consumed = i + 1;
            if consumed != vbi_size(value) {
                return Err(CodecError::BadResponse(
                    "variable byte integer is not canonically encoded",
                ));
            }
            return Ok((value, consumed));
        }
        multiplier *= 128;
    }
    if src.len() < 4 {
        Err(CodecError::NeedMoreBytes)
    } else {
        Err(CodecError::BadResponse(
            "variable byte integer exceeds four bytes",
        ))
    }
}

/// Encode a two-byte big-endian length followed by `bytes` into `dst`.
///
/// Used identically for UTF-8 strings and opaque binary data; the
/// distinction between the two is purely semantic. Fails with
/// `BadParameter` if `bytes.len() > u16::MAX as usize`, `NoMemory` if
/// `dst` cannot hold `2 + bytes.len()`.
pub fn encode_length_prefixed(dst: &mut [u8], bytes: &[u8]) -> CodecResult<usize> {
    if bytes.len() > u16::MAX as usize {
        return Err(CodecError::BadParameter("length-prefixed field exceeds 65535 bytes"));
    }
    let total = 2 + bytes.len();
    if dst.len() < total {
        return Err(CodecError::NoMemory);
    }
    encode_u16_be(dst, bytes.len() as u16)?;
    dst[2..total].copy_from_slice(bytes);
    Ok(total)
}

/// Decode a two-byte length-prefixed field, returning a borrowed slice
/// into `src` and the total bytes consumed (`2 + len`).
///
/// The returned slice is only valid for as long as `src` lives; callers
/// must not retain it past the lifetime of the packet's receive buffer.
pub fn decode_length_prefixed(src: &[u8]) -> CodecResult<(&[u8], usize)> {
    if src.len() < 2 {
        return Err(CodecError::BadResponse("truncated length prefix"));
    }
    let len = decode_u16_be(src)? as usize;
    let total = 2 + len;
    if src.len() < total {
        return Err(CodecError::BadResponse("length-prefixed field runs past buffer end"));
    }
    Ok((&src[2..total], total))
}

/// Decode a two-byte length-prefixed UTF-8 string.
///
/// Identical framing to [`decode_length_prefixed`], with an added
/// validity check: malformed UTF-8 is a `BadResponse`.
pub fn decode_utf8_str(src: &[u8]) -> CodecResult<(&str, usize)> {
    let (slice, consumed) = decode_length_prefixed(src)?;
    let s = core::str::from_utf8(slice)
        .map_err(|_| CodecError::BadResponse("property or field is not valid UTF-8"))?;
    Ok((s, consumed))
}

/// Encode a `u16` as two big-endian bytes.
pub fn encode_u16_be(dst: &mut [u8], value: u16) -> CodecResult<usize> {
    if dst.len() < 2 {
        return Err(CodecError::NoMemory);
    }
    dst[0..2].copy_from_slice(&value.to_be_bytes());
    Ok(2)
}

/// Decode two big-endian bytes as a `u16`.
pub fn decode_u16_be(src: &[u8]) -> CodecResult<u16> {
    if src.len() < 2 {
        return Err(CodecError::BadResponse("truncated u16"));
    }
    Ok(u16::from_be_bytes([src[0], src[1]]))
}

/// Encode a `u32` as four big-endian bytes.
pub fn encode_u32_be(dst: &mut [u8], value: u32) -> CodecResult<usize> {
    if dst.len() < 4 {
        return Err(CodecError::NoMemory);
    }
    dst[0..4].copy_from_slice(&value.to_be_bytes());
    Ok(4)
}

/// Decode four big-endian bytes as a `u32`.
pub fn decode_u32_be(src: &[u8]) -> CodecResult<u32> {
    if src.len() < 4 {
        return Err(CodecError::BadResponse("truncated u32"));
    }
    Ok(u32::from_be_bytes([src[0], src[1], src[2], src[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vbi_size_bands() {
        assert_eq!(vbi_size(0), 1);
        assert_eq!(vbi_size(127), 1);
        assert_eq!(vbi_size(128), 2);
        assert_eq!(vbi_size(16_383), 2);
        assert_eq!(vbi_size(16_384), 3);
        assert_eq!(vbi_size(2_097_151), 3);
        assert_eq!(vbi_size(2_097_152), 4);
        assert_eq!(vbi_size(VBI_MAX), 4);
    }

    #[test]
    fn vbi_round_trip_boundaries() {
        for v in [0u32, 1, 127, 128, 16_383, 16_384, 2_097_151, 2_097_152, VBI_MAX] {
            let mut buf = [0u8; 4];
            let n = encode_vbi(&mut buf, v).unwrap();
            assert_eq!(n, vbi_size(v));
            let (decoded, consumed) = decode_vbi(&buf[..n]).unwrap();
            assert_eq!(decoded, v);
            assert_eq!(consumed, n);
        }
    }

    #[test]
    fn vbi_rejects_overlarge_value() {
        let mut buf = [0u8; 4];
        assert!(matches!(
            encode_vbi(&mut buf, VBI_MAX + 1),
            Err(CodecError::BadParameter(_))
        ));
    }

    #[test]
    fn vbi_rejects_non_canonical_encoding() {
        // 0x80 0x00 decodes to 0 using two bytes; vbi_size(0) == 1.
        let buf = [0x80u8, 0x00];
        assert!(matches!(decode_vbi(&buf), Err(CodecError::BadResponse(_))));
    }

    #[test]
    fn vbi_needs_more_bytes_mid_encoding() {
        let buf = [0x80u8];
        assert!(matches!(decode_vbi(&buf), Err(CodecError::NeedMoreBytes)));
    }

    #[test]
    fn vbi_rejects_fifth_continuation_byte() {
        let buf = [0xFFu8, 0xFF, 0xFF, 0xFF];
        assert!(matches!(decode_vbi(&buf), Err(CodecError::BadResponse(_))));
    }

    #[test]
    fn length_prefixed_round_trip() {
        let mut buf = [0u8; 16];
        let n = encode_length_prefixed(&mut buf, b"hello").unwrap();
        assert_eq!(n, 7);
        let (slice, consumed) = decode_length_prefixed(&buf[..n]).unwrap();
        assert_eq!(slice, b"hello");
        assert_eq!(consumed, n);
    }

    #[test]
    fn utf8_rejects_invalid_encoding() {
        let mut buf = [0u8, 2, 0xFF, 0xFE];
        assert!(decode_utf8_str(&mut buf).is_err());
    }
}
