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

//! PUBLISH serialization (both the fully-copying form and a
//! header-only form for callers that stream the payload separately)
//! and deserialization.

use crate::error::{CodecError, CodecResult};
use crate::fixed_header::{decode_publish_flags, first_byte, PacketType, PublishFlags};
use crate::primitive::{decode_u16_be, decode_utf8_str, decode_vbi, encode_length_prefixed, encode_u16_be, encode_vbi, vbi_size, VBI_MAX};

/// Everything about a PUBLISH except the payload bytes, which the two
/// serialize entry points treat differently.
#[derive(Debug, Clone, Copy)]
pub struct PublishMeta<'a> {
    pub flags: PublishFlags,
    pub topic: &'a str,
    /// `None` for QoS 0; must be `Some(nonzero)` for QoS 1/2.
    pub packet_id: Option<u16>,
    /// Pre-built PUBLISH property section (`PropertyContext::Publish`).
    pub properties: &'a [u8],
}

fn validate(meta: &PublishMeta) -> CodecResult<()> {
    if meta.flags.qos == 0 {
        if meta.packet_id.is_some() {
            return Err(CodecError::BadParameter("QoS 0 PUBLISH must not carry a packet identifier"));
        }
        if meta.flags.dup {
            return Err(CodecError::BadParameter("QoS 0 PUBLISH must not set DUP"));
        }
    } else {
        match meta.packet_id {
            Some(0) | None => {
                return Err(CodecError::BadParameter(
                    "QoS 1/2 PUBLISH requires a nonzero packet identifier",
                ))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn variable_header_len(meta: &PublishMeta) -> usize {
    2 + meta.topic.len()
        + if meta.flags.qos > 0 { 2 } else { 0 }
        + vbi_size(meta.properties.len() as u32)
        + meta.properties.len()
}

/// Precompute `(remaining_length, total_packet_size)` given the
/// payload length the caller intends to write (0 is valid — an empty
/// PUBLISH payload is legal MQTT).
pub fn get_packet_size(meta: &PublishMeta, payload_len: usize) -> CodecResult<(usize, usize)> {
    validate(meta)?;
    let remaining = variable_header_len(meta) + payload_len;
    if remaining as u32 > VBI_MAX {
        return Err(CodecError::BadParameter("PUBLISH remaining length exceeds the protocol maximum"));
    }
    let total = 1 + vbi_size(remaining as u32) + remaining;
    Ok((remaining, total))
}

fn write_header(dst: &mut [u8], meta: &PublishMeta, payload_len: usize) -> CodecResult<usize> {
    let (remaining, total) = get_packet_size(meta, payload_len)?;
    let header_len = total - payload_len;
    if dst.len() < header_len {
        return Err(CodecError::NoMemory);
    }
    let mut cursor = 0;
    dst[cursor] = first_byte(PacketType::Publish, meta.flags.to_byte());
    cursor += 1;
    cursor += encode_vbi(&mut dst[cursor..], remaining as u32)?;
    cursor += encode_length_prefixed(&mut dst[cursor..], meta.topic.as_bytes())?;
    if let Some(packet_id) = meta.packet_id {
        cursor += encode_u16_be(&mut dst[cursor..], packet_id)?;
    }
    cursor += encode_vbi(&mut dst[cursor..], meta.properties.len() as u32)?;
    dst[cursor..cursor + meta.properties.len()].copy_from_slice(meta.properties);
    cursor += meta.properties.len();
    Ok(cursor)
}

/// Writes everything up to but not including the payload, for callers
/// that stream the payload bytes into the transport separately instead
/// of copying them through this buffer.
pub fn serialize_header(dst: &mut [u8], meta: &PublishMeta, payload_len: usize) -> CodecResult<usize> {
    write_header(dst, meta, payload_len)
}

/// Writes the full packet, payload included.
pub fn serialize(dst: &mut [u8], meta: &PublishMeta, payload: &[u8]) -> CodecResult<usize> {
    let header_len = write_header(dst, meta, payload.len())?;
    let total = header_len + payload.len();
    if dst.len() < total {
        return Err(CodecError::NoMemory);
    }
    dst[header_len..total].copy_from_slice(payload);
    Ok(total)
}

/// A decoded PUBLISH. `topic`, `properties` and `payload` borrow from
/// the caller's receive buffer.
#[derive(Debug, Clone, Copy)]
pub struct Publish<'a> {
    pub flags: PublishFlags,
    pub topic: &'a str,
    pub packet_id: Option<u16>,
    pub properties: &'a [u8],
    pub payload: &'a [u8],
}

/// Decode a PUBLISH body (everything after the fixed header).
/// `low_nibble` is the fixed header's flag nibble.
pub fn deserialize(low_nibble: u8, remaining: &[u8]) -> CodecResult<Publish<'_>> {
    let flags = decode_publish_flags(low_nibble)?;
    let (topic, topic_len) = decode_utf8_str(remaining)?;
    let mut cursor = topic_len;

    let packet_id = if flags.qos > 0 {
        if remaining.len() < cursor + 2 {
            return Err(CodecError::BadResponse("truncated PUBLISH packet identifier"));
        }
        let pid = decode_u16_be(&remaining[cursor..])?;
        if pid == 0 {
            return Err(CodecError::BadResponse("PUBLISH packet identifier must not be zero"));
        }
        cursor += 2;
        Some(pid)
    } else {
        None
    };

    let (prop_len, vbi_len) = decode_vbi(&remaining[cursor..])?;
    cursor += vbi_len;
    let prop_end = cursor + prop_len as usize;
    if remaining.len() < prop_end {
        return Err(CodecError::BadResponse("PUBLISH property section runs past the packet end"));
    }
    let properties = &remaining[cursor..prop_end];
    let payload = &remaining[prop_end..];

    Ok(Publish { flags, topic, packet_id, properties, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_header::PublishFlags;

    fn meta(qos: u8, packet_id: Option<u16>) -> PublishMeta<'static> {
        PublishMeta {
            flags: PublishFlags { retain: false, qos, dup: false },
            topic: "a/b",
            packet_id,
            properties: &[],
        }
    }

    #[test]
    fn qos0_round_trip() {
        let m = meta(0, None);
        let mut buf = [0u8; 32];
        let n = serialize(&mut buf, &m, b"payload").unwrap();
        let decoded = deserialize(buf[0] & 0x0F, &buf[2..n]).unwrap();
        assert_eq!(decoded.topic, "a/b");
        assert_eq!(decoded.packet_id, None);
        assert_eq!(decoded.payload, b"payload");
    }

    #[test]
    fn qos1_requires_packet_id() {
        let m = meta(1, None);
        assert!(get_packet_size(&m, 0).is_err());
    }

    #[test]
    fn qos0_rejects_packet_id() {
        let m = meta(0, Some(5));
        assert!(get_packet_size(&m, 0).is_err());
    }

    #[test]
    fn header_only_form_matches_full_form_prefix() {
        let m = meta(2, Some(99));
        let mut full = [0u8; 32];
        let n_full = serialize(&mut full, &m, b"xy").unwrap();

        let mut header = [0u8; 32];
        let n_header = serialize_header(&mut header, &m, 2).unwrap();
        assert_eq!(&header[..n_header], &full[..n_full - 2]);
    }

    #[test]
    fn empty_payload_is_legal() {
        let m = meta(0, None);
        let mut buf = [0u8; 16];
        let n = serialize(&mut buf, &m, b"").unwrap();
        let decoded = deserialize(buf[0] & 0x0F, &buf[2..n]).unwrap();
        assert!(decoded.payload.is_empty());
    }
}
