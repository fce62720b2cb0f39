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

//! PUBLISH serialize/deserialize round trips, including a property
//! section built with [`PropertyBuilder`] rather than hand-assembled
//! bytes, and the length-extractor handoff a real client performs.

use mqtt_v5_codec_core::fixed_header::PublishFlags;
use mqtt_v5_codec_core::length_extractor::extract_from_buffer;
use mqtt_v5_codec_core::packet::publish::{self, PublishMeta};
use mqtt_v5_codec_core::property::{PropertyBuilder, PropertyContext, PropertyValue};

#[test]
fn qos2_publish_with_properties_round_trips_through_the_extractor() {
    let mut pbuf = [0u8; 64];
    let mut b = PropertyBuilder::new(&mut pbuf);
    b.add_content_type("text/plain", Some(PropertyContext::Publish)).unwrap();
    b.add_topic_alias(7, Some(PropertyContext::Publish)).unwrap();
    let properties = b.as_bytes().to_vec();

    let meta = PublishMeta {
        flags: PublishFlags { retain: true, qos: 2, dup: false },
        topic: "sensors/temp",
        packet_id: Some(42),
        properties: &properties,
    };
    let payload = b"21.5C";

    let mut out = [0u8; 128];
    let n = publish::serialize(&mut out, &meta, payload).unwrap();

    let header = extract_from_buffer(&out, n).unwrap();
    assert_eq!(header.remaining_length as usize, n - header.header_length);

    let decoded = publish::deserialize(out[0] & 0x0F, &out[header.header_length..n]).unwrap();
    assert_eq!(decoded.topic, "sensors/temp");
    assert_eq!(decoded.packet_id, Some(42));
    assert_eq!(decoded.payload, payload);
    assert!(decoded.flags.retain);
    assert_eq!(decoded.flags.qos, 2);

    let mut reader = mqtt_v5_codec_core::property::PropertyReader::new(decoded.properties, PropertyContext::Publish);
    let first = reader.next().unwrap().unwrap();
    assert!(matches!(first.value, PropertyValue::ContentType("text/plain")));
    let second = reader.next().unwrap().unwrap();
    assert!(matches!(second.value, PropertyValue::TopicAlias(7)));
    assert!(reader.next().unwrap().is_none());
}

#[test]
fn qos0_publish_omits_packet_identifier_on_the_wire() {
    let meta = PublishMeta {
        flags: PublishFlags { retain: false, qos: 0, dup: false },
        topic: "a",
        packet_id: None,
        properties: &[],
    };
    let mut out = [0u8; 32];
    let n = publish::serialize(&mut out, &meta, b"x").unwrap();

    // fixed header(1) + remaining_length(1) + topic(2+1) + proplen(1) + payload(1)
    assert_eq!(n, 1 + 1 + 3 + 1 + 1);

    let decoded = publish::deserialize(out[0] & 0x0F, &out[2..n]).unwrap();
    assert_eq!(decoded.packet_id, None);
}

#[test]
fn streamed_header_only_form_matches_the_copying_form() {
    let meta = PublishMeta {
        flags: PublishFlags { retain: false, qos: 1, dup: true },
        topic: "t",
        packet_id: Some(5),
        properties: &[],
    };
    let mut full = [0u8; 32];
    let n_full = publish::serialize(&mut full, &meta, b"hello").unwrap();

    let mut header_only = [0u8; 32];
    let n_header = publish::serialize_header(&mut header_only, &meta, 5).unwrap();

    assert_eq!(&header_only[..n_header], &full[..n_full - 5]);
    assert_eq!(&full[n_full - 5..n_full], b"hello");
}
