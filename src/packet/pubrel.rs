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

//! PUBREL's fixed-header low nibble is `0b0010`, not zero, per the MQTT
//! v5 reserved-bits rule for this packet type.

use super::simple_ack;
use crate::error::CodecResult;
use crate::fixed_header::{first_byte, PacketType};
use crate::reason_code::PubRelReasonCode;
use num_enum::TryFromPrimitive;

const FLAGS: u8 = 0b0010;

/// A decoded PUBREL.
#[derive(Debug, Clone, Copy)]
pub struct PubRel<'a> {
    pub packet_id: u16,
    pub reason: PubRelReasonCode,
    pub properties: &'a [u8],
}

pub fn serialize(dst: &mut [u8], packet_id: u16) -> CodecResult<usize> {
    simple_ack::serialize_short(dst, first_byte(PacketType::Pubrel, FLAGS), packet_id)
}

pub fn serialize_long(dst: &mut [u8], packet_id: u16, reason: PubRelReasonCode, properties: &[u8]) -> CodecResult<usize> {
    simple_ack::serialize_long(dst, first_byte(PacketType::Pubrel, FLAGS), packet_id, reason.as_u8(), properties)
}

pub fn deserialize(remaining: &[u8]) -> CodecResult<PubRel<'_>> {
    let (packet_id, reason, properties) = simple_ack::deserialize(remaining, |b| {
        PubRelReasonCode::try_from_primitive(b)
            .map_err(|_| crate::error::CodecError::BadResponse("unrecognized PUBREL reason code"))
    })?;
    Ok(PubRel { packet_id, reason, properties })
}
