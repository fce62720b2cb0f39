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

//! CONNECT serialization. The client-to-broker direction only: a codec
//! on the broker side would need a symmetric deserializer, which is out
//! of scope here (this crate's CONNACK/PUBLISH/ACK/SUBACK/PINGRESP
//! deserializers are the client-side half of the protocol).

use crate::error::{CodecError, CodecResult};
use crate::fixed_header::{first_byte, PacketType};
use crate::primitive::{encode_length_prefixed, encode_u16_be, encode_vbi, vbi_size, VBI_MAX};

/// The Will message nested in a CONNECT payload, present only when the
/// client sets the Will Flag.
#[derive(Debug, Clone, Copy)]
pub struct ConnectWill<'a> {
    pub qos: u8,
    pub retain: bool,
    /// Pre-built Will property section (`PropertyContext::Will`).
    pub properties: &'a [u8],
    pub topic: &'a str,
    pub payload: &'a [u8],
}

/// Everything needed to serialize a CONNECT packet.
#[derive(Debug, Clone, Copy)]
pub struct ConnectRequest<'a> {
    pub client_id: &'a str,
    pub clean_start: bool,
    pub keep_alive: u16,
    /// Pre-built CONNECT property section (`PropertyContext::Connect`).
    pub properties: &'a [u8],
    pub will: Option<ConnectWill<'a>>,
    pub username: Option<&'a str>,
    pub password: Option<&'a [u8]>,
}

fn connect_flags(req: &ConnectRequest) -> u8 {
    let mut flags = 0u8;
    if req.clean_start {
        flags |= 0x02;
    }
    if let Some(will) = &req.will {
        flags |= 0x04;
        flags |= (will.qos & 0x03) << 3;
        if will.retain {
            flags |= 0x20;
        }
    }
    if req.password.is_some() {
        flags |= 0x40;
    }
    if req.username.is_some() {
        flags |= 0x80;
    }
    flags
}

fn validate(req: &ConnectRequest) -> CodecResult<()> {
    if req.client_id.len() > u16::MAX as usize {
        return Err(CodecError::BadParameter("client identifier exceeds 65535 bytes"));
    }
    if let Some(will) = &req.will {
        if will.qos > 2 {
            return Err(CodecError::BadParameter("will QoS must be 0, 1 or 2"));
        }
    }
    Ok(())
}

/// Precompute `(remaining_length, total_packet_size)`.
pub fn get_packet_size(req: &ConnectRequest) -> CodecResult<(usize, usize)> {
    validate(req)?;
    let variable_header =
        2 + 4 + 1 + 1 + 2 + vbi_size(req.properties.len() as u32) + req.properties.len();

    let mut payload = 2 + req.client_id.len();
    if let Some(will) = &req.will {
        payload += vbi_size(will.properties.len() as u32) + will.properties.len();
        payload += 2 + will.topic.len();
        payload += 2 + will.payload.len();
    }
    if let Some(username) = req.username {
        payload += 2 + username.len();
    }
    if let Some(password) = req.password {
        payload += 2 + password.len();
    }

    let remaining = variable_header + payload;
    if remaining as u32 > VBI_MAX {
        return Err(CodecError::BadParameter("CONNECT remaining length exceeds the protocol maximum"));
    }
    let total = 1 + vbi_size(remaining as u32) + remaining;
    Ok((remaining, total))
}

/// Serialize a CONNECT packet into `dst`. Fails with `NoMemory` if
/// `dst` cannot hold the packet computed by [`get_packet_size`].
pub fn serialize(dst: &mut [u8], req: &ConnectRequest) -> CodecResult<usize> {
    let (remaining, total) = get_packet_size(req)?;
    if dst.len() < total {
        return Err(CodecError::NoMemory);
    }

    let mut cursor = 0;
    dst[cursor] = first_byte(PacketType::Connect, 0);
    cursor += 1;
    cursor += encode_vbi(&mut dst[cursor..], remaining as u32)?;
    cursor += encode_length_prefixed(&mut dst[cursor..], b"MQTT")?;
    dst[cursor] = 5;
    cursor += 1;
    dst[cursor] = connect_flags(req);
    cursor += 1;
    cursor += encode_u16_be(&mut dst[cursor..], req.keep_alive)?;
    cursor += encode_vbi(&mut dst[cursor..], req.properties.len() as u32)?;
    dst[cursor..cursor + req.properties.len()].copy_from_slice(req.properties);
    cursor += req.properties.len();

    cursor += encode_length_prefixed(&mut dst[cursor..], req.client_id.as_bytes())?;
    if let Some(will) = &req.will {
        cursor += encode_vbi(&mut dst[cursor..], will.properties.len() as u32)?;
        dst[cursor..cursor + will.properties.len()].copy_from_slice(will.properties);
        cursor += will.properties.len();
        cursor += encode_length_prefixed(&mut dst[cursor..], will.topic.as_bytes())?;
        cursor += encode_length_prefixed(&mut dst[cursor..], will.payload)?;
    }
    if let Some(username) = req.username {
        cursor += encode_length_prefixed(&mut dst[cursor..], username.as_bytes())?;
    }
    if let Some(password) = req.password {
        cursor += encode_length_prefixed(&mut dst[cursor..], password)?;
    }

    debug_assert_eq!(cursor, total);
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_request() -> ConnectRequest<'static> {
        ConnectRequest {
            client_id: "client-1",
            clean_start: true,
            keep_alive: 60,
            properties: &[],
            will: None,
            username: None,
            password: None,
        }
    }

    #[test]
    fn minimal_connect_has_expected_shape() {
        let req = minimal_request();
        let mut buf = [0u8; 64];
        let n = serialize(&mut buf, &req).unwrap();
        assert_eq!(buf[0], 0x10);
        // Protocol name, version, flags.
        assert_eq!(&buf[2..8], b"\x00\x04MQTT");
        assert_eq!(buf[8], 5);
        assert_eq!(buf[9], 0x02); // clean start only
        assert!(n > 10);
    }

    #[test]
    fn will_sets_flags_and_qos_bits() {
        let mut req = minimal_request();
        req.will = Some(ConnectWill {
            qos: 2,
            retain: true,
            properties: &[],
            topic: "lwt/topic",
            payload: b"bye",
        });
        let mut buf = [0u8; 128];
        serialize(&mut buf, &req).unwrap();
        // bit2 will, bits3-4 qos=2 (0b10 << 3 = 0x10), bit5 retain (0x20)
        assert_eq!(buf[9], 0x02 | 0x04 | 0x10 | 0x20);
    }

    #[test]
    fn rejects_will_qos_above_two() {
        let mut req = minimal_request();
        req.will = Some(ConnectWill { qos: 3, retain: false, properties: &[], topic: "t", payload: b"" });
        assert!(get_packet_size(&req).is_err());
    }

    #[test]
    fn username_and_password_flags() {
        let mut req = minimal_request();
        req.username = Some("alice");
        req.password = Some(b"secret");
        let mut buf = [0u8; 64];
        serialize(&mut buf, &req).unwrap();
        assert_eq!(buf[9], 0x02 | 0x40 | 0x80);
    }
}
