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

//! Literal-byte end-to-end scenarios spanning the length extractor and
//! the per-packet-type codecs together, the way a client actually drives
//! them: peel the fixed header off the stream, then hand the remaining
//! bytes to the matching packet deserializer.

use mqtt_v5_codec_core::error::{CodecError, Outcome};
use mqtt_v5_codec_core::fixed_header::PacketType;
use mqtt_v5_codec_core::length_extractor::{extract_from_buffer, Limits};
use mqtt_v5_codec_core::packet::{connack, pingreq, puback};
use mqtt_v5_codec_core::reason_code::ConnectReasonCode;

#[test]
fn pingreq_emit() {
    let mut buf = [0u8; 2];
    let n = pingreq::serialize(&mut buf).unwrap();
    assert_eq!(&buf[..n], &[0xC0, 0x00]);
}

#[test]
fn disconnect_emit() {
    use mqtt_v5_codec_core::packet::disconnect;
    let mut buf = [0u8; 2];
    let n = disconnect::serialize(&mut buf).unwrap();
    assert_eq!(&buf[..n], &[0xE0, 0x00]);
}

#[test]
fn puback_short_decode() {
    let raw = [0x40u8, 0x02, 0x12, 0x34];
    let header = extract_from_buffer(&raw, raw.len()).unwrap();
    assert_eq!(header.packet_type, PacketType::Puback);
    let ack = puback::deserialize(&raw[header.header_length..]).unwrap();
    assert_eq!(ack.packet_id, 0x1234);
    assert!(ack.reason.is_success());
    assert!(ack.properties.is_empty());
}

#[test]
fn connack_minimal() {
    let raw = [0x20u8, 0x03, 0x00, 0x00, 0x00];
    let header = extract_from_buffer(&raw, raw.len()).unwrap();
    let body = &raw[header.header_length..];
    let (ack, outcome) = connack::deserialize(body, raw.len(), &Limits::default(), false).unwrap();
    assert!(!ack.session_present);
    assert_eq!(ack.reason, ConnectReasonCode::Success);
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(ack.properties.receive_maximum, 65535);
    assert_eq!(ack.properties.maximum_qos, 2);
    assert!(ack.properties.retain_available);
}

#[test]
fn connack_with_receive_maximum_zero_is_bad_response() {
    let raw = [0x20u8, 0x06, 0x00, 0x00, 0x03, 0x21, 0x00, 0x00];
    let header = extract_from_buffer(&raw, raw.len()).unwrap();
    let body = &raw[header.header_length..];
    assert!(matches!(
        connack::deserialize(body, raw.len(), &Limits::default(), false),
        Err(CodecError::BadResponse(_))
    ));
}

#[test]
fn non_canonical_vbi_is_rejected_by_the_length_extractor() {
    let raw = [0xC0u8, 0x80, 0x00];
    assert!(matches!(extract_from_buffer(&raw, raw.len()), Err(CodecError::BadResponse(_))));
}

#[test]
fn property_duplicate_leaves_builder_cursor_unchanged() {
    use mqtt_v5_codec_core::property::{PropertyBuilder, PropertyContext};
    let mut buf = [0u8; 32];
    let mut b = PropertyBuilder::new(&mut buf);
    b.add_session_expiry_interval(30, Some(PropertyContext::Connect)).unwrap();
    let cursor_after_first = b.cursor();
    assert!(b.add_session_expiry_interval(60, Some(PropertyContext::Connect)).is_err());
    assert_eq!(b.cursor(), cursor_after_first);
}
