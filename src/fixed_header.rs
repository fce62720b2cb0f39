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

//! The fixed header: the one-byte control-packet-type-and-flags octet,
//! and classification of the bytes a client may legally receive.

use crate::error::{CodecError, CodecResult};
use num_enum::TryFromPrimitive;
use serde::Serialize;

/// MQTT v5.0 control packet type, the high nibble of the fixed header's
/// first byte.
#[derive(Debug, Serialize, PartialEq, Eq, Copy, Clone, TryFromPrimitive)]
#[repr(u8)]
pub enum PacketType {
    Connect = 1,
    Connack = 2,
    Publish = 3,
    Puback = 4,
    Pubrec = 5,
    Pubrel = 6,
    Pubcomp = 7,
    Subscribe = 8,
    Suback = 9,
    Unsubscribe = 10,
    Unsuback = 11,
    Pingreq = 12,
    Pingresp = 13,
    Disconnect = 14,
    Auth = 15,
}

impl PacketType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PacketType::Connect => "connect",
            PacketType::Connack => "connack",
            PacketType::Publish => "publish",
            PacketType::Puback => "puback",
            PacketType::Pubrec => "pubrec",
            PacketType::Pubrel => "pubrel",
            PacketType::Pubcomp => "pubcomp",
            PacketType::Subscribe => "subscribe",
            PacketType::Suback => "suback",
            PacketType::Unsubscribe => "unsubscribe",
            PacketType::Unsuback => "unsuback",
            PacketType::Pingreq => "pingreq",
            PacketType::Pingresp => "pingresp",
            PacketType::Disconnect => "disconnect",
            PacketType::Auth => "auth",
        }
    }
}

/// Build the fixed header's first byte from a packet type and its
/// packet-specific low-nibble flags.
pub fn first_byte(packet_type: PacketType, flags: u8) -> u8 {
    (packet_type.as_u8() << 4) | (flags & 0x0F)
}

/// Flags carried in a PUBLISH packet's fixed-header low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishFlags {
    pub retain: bool,
    pub qos: u8,
    pub dup: bool,
}

impl PublishFlags {
    pub fn to_byte(self) -> u8 {
        (self.retain as u8) | (self.qos << 1) | ((self.dup as u8) << 3)
    }
}

/// Decode the PUBLISH fixed-header flags from the low nibble of the
/// first byte. Rejects QoS 3 and a DUP flag set with QoS 0.
pub fn decode_publish_flags(low_nibble: u8) -> CodecResult<PublishFlags> {
    let retain = low_nibble & 0x01 != 0;
    let qos = (low_nibble >> 1) & 0x03;
    let dup = low_nibble & 0x08 != 0;
    if qos == 3 {
        return Err(CodecError::BadResponse("PUBLISH QoS value of 3 is reserved"));
    }
    if qos == 0 && dup {
        return Err(CodecError::BadResponse("PUBLISH DUP flag set with QoS 0"));
    }
    Ok(PublishFlags { retain, qos, dup })
}

/// Classify the first byte of an inbound packet a client may receive
/// from a broker: CONNACK, PUBLISH, the PUBACK/PUBREC/PUBREL/PUBCOMP
/// family, SUBACK, UNSUBACK, PINGRESP. Any other high nibble, or a
/// reserved-bit violation in a packet type whose low nibble is fixed
/// (PUBREL must be `0b0010`), is a protocol error.
pub fn classify_inbound(first_byte: u8) -> CodecResult<(PacketType, u8)> {
    let type_bits = first_byte >> 4;
    let low_nibble = first_byte & 0x0F;
    let packet_type = PacketType::try_from_primitive(type_bits)
        .map_err(|_| CodecError::BadResponse("unrecognized inbound packet type"))?;
    match packet_type {
        PacketType::Connack
        | PacketType::Puback
        | PacketType::Pubrec
        | PacketType::Pubcomp
        | PacketType::Suback
        | PacketType::Unsuback
        | PacketType::Pingresp => {
            if low_nibble != 0 {
                return Err(CodecError::BadResponse("reserved fixed-header bits must be zero"));
            }
            Ok((packet_type, low_nibble))
        }
        PacketType::Pubrel => {
            if low_nibble != 0b0010 {
                return Err(CodecError::BadResponse("PUBREL reserved bits must be 0b0010"));
            }
            Ok((packet_type, low_nibble))
        }
        PacketType::Publish => Ok((packet_type, low_nibble)),
        _ => Err(CodecError::BadResponse(
            "packet type is not a valid inbound (broker-to-client) type",
        )),
    }
}
