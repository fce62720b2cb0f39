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

//! CONNACK deserialization: session-state plus the negotiated server
//! capabilities carried in its property section.

use crate::error::{CodecError, CodecResult, Outcome};
use crate::length_extractor::Limits;
use crate::primitive::decode_vbi;
use crate::property::{PropertyContext, PropertyReader, PropertyValue};
use crate::reason_code::ConnectReasonCode;
use crate::trace_shim::{trace, warn};
use num_enum::TryFromPrimitive;

/// Server capabilities negotiated by a CONNACK, seeded with the v5
/// defaults that apply when the corresponding property is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegotiatedProperties<'a> {
    pub session_expiry_interval: u32,
    pub receive_maximum: u16,
    pub maximum_qos: u8,
    pub retain_available: bool,
    pub maximum_packet_size: u32,
    pub assigned_client_identifier: Option<&'a str>,
    pub topic_alias_maximum: u16,
    pub reason_string: Option<&'a str>,
    pub wildcard_subscription_available: bool,
    pub subscription_identifier_available: bool,
    pub shared_subscription_available: bool,
    /// `None` means "use the keep-alive the client proposed in CONNECT".
    pub server_keep_alive: Option<u16>,
    pub response_information: Option<&'a str>,
    pub server_reference: Option<&'a str>,
    pub authentication_method: Option<&'a str>,
    pub authentication_data: Option<&'a [u8]>,
}

impl<'a> Default for NegotiatedProperties<'a> {
    fn default() -> Self {
        NegotiatedProperties {
            session_expiry_interval: 0,
            receive_maximum: 65535,
            maximum_qos: 2,
            retain_available: true,
            maximum_packet_size: u32::MAX,
            assigned_client_identifier: None,
            topic_alias_maximum: 0,
            reason_string: None,
            wildcard_subscription_available: true,
            subscription_identifier_available: true,
            shared_subscription_available: true,
            server_keep_alive: None,
            response_information: None,
            server_reference: None,
            authentication_method: None,
            authentication_data: None,
        }
    }
}

/// A decoded CONNACK.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnAck<'a> {
    pub session_present: bool,
    pub reason: ConnectReasonCode,
    pub properties: NegotiatedProperties<'a>,
}

/// Decode a CONNACK body (everything after the fixed header).
///
/// `total_packet_size` is `1 + vbi_size(remaining_length) + remaining_length`,
/// as produced by the length extractor; it is checked against
/// `limits.max_packet_size` before anything else is parsed.
/// `client_requested_response_info` is the client's own Request Response
/// Information choice from its CONNECT; a Response Information property
/// in this CONNACK is only legal when that was `true`. Returns
/// `Outcome::ServerRefused` alongside a fully-populated `ConnAck` when
/// the reason code is a recognized non-zero (refusal) code — properties
/// are still parsed and returned on that path, never discarded.
pub fn deserialize<'a>(
    remaining: &'a [u8],
    total_packet_size: usize,
    limits: &Limits,
    client_requested_response_info: bool,
) -> CodecResult<(ConnAck<'a>, Outcome)> {
    if remaining.len() < 3 {
        return Err(CodecError::BadResponse("CONNACK remaining length must be at least 3"));
    }
    if let Some(max) = limits.max_packet_size {
        if total_packet_size as u32 > max {
            warn!(total_packet_size, max, "CONNACK exceeds configured maximum packet size");
            return Err(CodecError::BadResponse("CONNACK exceeds configured maximum packet size"));
        }
    }

    let ack_flags = remaining[0];
    if ack_flags & 0xFE != 0 {
        return Err(CodecError::BadResponse("CONNACK acknowledge flags reserved bits must be zero"));
    }
    let session_present = ack_flags & 0x01 != 0;

    let reason = ConnectReasonCode::try_from_primitive(remaining[1])
        .map_err(|_| CodecError::BadResponse("unrecognized CONNACK reason code"))?;
    if session_present && reason != ConnectReasonCode::Success {
        return Err(CodecError::BadResponse(
            "session present must not be set alongside a nonzero reason code",
        ));
    }

    let (prop_len, vbi_len) = decode_vbi(&remaining[2..])?;
    let prop_start = 2 + vbi_len;
    let prop_end = prop_start + prop_len as usize;
    if remaining.len() != prop_end {
        return Err(CodecError::BadResponse("CONNACK has trailing bytes after its property section"));
    }

    let mut properties = NegotiatedProperties::default();
    let mut reader = PropertyReader::new(&remaining[prop_start..prop_end], PropertyContext::Connack);
    while let Some(entry) = reader.next()? {
        match entry.value {
            PropertyValue::SessionExpiryInterval(v) => properties.session_expiry_interval = v,
            PropertyValue::AssignedClientIdentifier(s) => properties.assigned_client_identifier = Some(s),
            PropertyValue::ServerKeepAlive(v) => properties.server_keep_alive = Some(v),
            PropertyValue::AuthenticationMethod(s) => properties.authentication_method = Some(s),
            PropertyValue::AuthenticationData(b) => properties.authentication_data = Some(b),
            PropertyValue::ResponseInformation(s) => {
                if !client_requested_response_info {
                    return Err(CodecError::BadResponse(
                        "Response Information is only legal if the client set Request Response Information",
                    ));
                }
                properties.response_information = Some(s);
            }
            PropertyValue::ServerReference(s) => properties.server_reference = Some(s),
            PropertyValue::ReasonString(s) => properties.reason_string = Some(s),
            PropertyValue::ReceiveMaximum(v) => properties.receive_maximum = v,
            PropertyValue::TopicAliasMaximum(v) => properties.topic_alias_maximum = v,
            PropertyValue::MaximumQos(v) => {
                if v > 1 {
                    return Err(CodecError::BadResponse("CONNACK maximum QoS must be 0 or 1"));
                }
                properties.maximum_qos = v;
            }
            PropertyValue::RetainAvailable(v) => properties.retain_available = v != 0,
            PropertyValue::MaximumPacketSize(v) => properties.maximum_packet_size = v,
            PropertyValue::WildcardSubscriptionAvailable(v) => properties.wildcard_subscription_available = v != 0,
            PropertyValue::SubscriptionIdentifierAvailable(v) => properties.subscription_identifier_available = v != 0,
            PropertyValue::SharedSubscriptionAvailable(v) => properties.shared_subscription_available = v != 0,
            PropertyValue::UserProperty(_, _) => {}
            _ => unreachable!("PropertyReader enforces CONNACK property legality before this match runs"),
        }
    }

    let connack = ConnAck { session_present, reason, properties };
    let outcome = if reason == ConnectReasonCode::Success {
        Outcome::Success
    } else {
        trace!(reason = ?reason, "CONNACK indicates server refusal");
        Outcome::ServerRefused
    };
    Ok((connack, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_connack_keeps_defaults() {
        // 20 03 00 00 00 -> flags=0 reason=00 proplen=0
        let remaining = [0x00u8, 0x00, 0x00];
        let (ack, outcome) = deserialize(&remaining, 5, &Limits::default(), false).unwrap();
        assert!(!ack.session_present);
        assert_eq!(ack.reason, ConnectReasonCode::Success);
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(ack.properties.receive_maximum, 65535);
        assert_eq!(ack.properties.maximum_qos, 2);
    }

    #[test]
    fn receive_maximum_zero_is_bad_response() {
        // flags=00 reason=00 proplen=3 [0x21 0x00 0x00]
        let remaining = [0x00u8, 0x00, 0x03, 0x21, 0x00, 0x00];
        assert!(matches!(
            deserialize(&remaining, 8, &Limits::default(), false),
            Err(CodecError::BadResponse(_))
        ));
    }

    #[test]
    fn session_present_with_nonzero_reason_is_rejected() {
        let remaining = [0x01u8, 0x87, 0x00];
        assert!(matches!(
            deserialize(&remaining, 5, &Limits::default(), false),
            Err(CodecError::BadResponse(_))
        ));
    }

    #[test]
    fn refusal_reason_still_parses_properties() {
        // reason=0x87 NotAuthorized, one Reason String property "no".
        let remaining = [0x00u8, 0x87, 0x05, 0x1F, 0x00, 0x02, b'n', b'o'];
        let (ack, outcome) = deserialize(&remaining, 10, &Limits::default(), false).unwrap();
        assert_eq!(outcome, Outcome::ServerRefused);
        assert_eq!(ack.properties.reason_string, Some("no"));
    }

    #[test]
    fn enforces_configured_max_packet_size() {
        let remaining = [0x00u8, 0x00, 0x00];
        let limits = Limits { max_packet_size: Some(4) };
        assert!(matches!(
            deserialize(&remaining, 5, &limits, false),
            Err(CodecError::BadResponse(_))
        ));
    }

    #[test]
    fn response_information_without_the_request_flag_is_bad_response() {
        // reason=00, one Response Information property "topic/".
        let remaining = [0x00u8, 0x00, 0x09, 0x1A, 0x00, 0x06, b't', b'o', b'p', b'i', b'c', b'/'];
        assert!(matches!(
            deserialize(&remaining, 12, &Limits::default(), false),
            Err(CodecError::BadResponse(_))
        ));
    }

    #[test]
    fn response_information_with_the_request_flag_is_accepted() {
        let remaining = [0x00u8, 0x00, 0x09, 0x1A, 0x00, 0x06, b't', b'o', b'p', b'i', b'c', b'/'];
        let (ack, outcome) = deserialize(&remaining, 12, &Limits::default(), true).unwrap();
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(ack.properties.response_information, Some("topic/"));
    }
}
