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

//! The MQTT v5.0 Property subsystem: identifiers, the per-packet-type
//! legality matrix (C8), the append-only builder (C3), and the
//! cursor-style reader (C4).

mod builder;
mod legality;
mod reader;

pub use builder::PropertyBuilder;
pub use legality::is_legal;
pub use reader::{BulkProperty, PropertyReader, PropertyValue};

use num_enum::TryFromPrimitive;
use serde::Serialize;

/// MQTT v5.0 property identifier.
#[derive(Debug, Serialize, PartialEq, Eq, Copy, Clone, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum PropertyId {
    PayloadFormatIndicator = 0x01,
    MessageExpiryInterval = 0x02,
    ContentType = 0x03,
    ResponseTopic = 0x08,
    CorrelationData = 0x09,
    SubscriptionIdentifier = 0x0B,
    SessionExpiryInterval = 0x11,
    AssignedClientIdentifier = 0x12,
    ServerKeepAlive = 0x13,
    AuthenticationMethod = 0x15,
    AuthenticationData = 0x16,
    RequestProblemInformation = 0x17,
    WillDelayInterval = 0x18,
    RequestResponseInformation = 0x19,
    ResponseInformation = 0x1A,
    ServerReference = 0x1C,
    ReasonString = 0x1F,
    ReceiveMaximum = 0x21,
    TopicAliasMaximum = 0x22,
    TopicAlias = 0x23,
    MaximumQos = 0x24,
    RetainAvailable = 0x25,
    UserProperty = 0x26,
    MaximumPacketSize = 0x27,
    WildcardSubscriptionAvailable = 0x28,
    SubscriptionIdentifierAvailable = 0x29,
    SharedSubscriptionAvailable = 0x2A,
}

impl PropertyId {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Bit position of this property within a [`PropertyBuilder`]'s
    /// `field_set` bitmap. `None` for [`PropertyId::UserProperty`],
    /// which is the only property allowed to repeat and therefore has
    /// no at-most-once slot to occupy.
    pub fn field_set_bit(self) -> Option<u32> {
        let bit = match self {
            PropertyId::PayloadFormatIndicator => 0,
            PropertyId::MessageExpiryInterval => 1,
            PropertyId::ContentType => 2,
            PropertyId::ResponseTopic => 3,
            PropertyId::CorrelationData => 4,
            PropertyId::SubscriptionIdentifier => 5,
            PropertyId::SessionExpiryInterval => 6,
            PropertyId::AssignedClientIdentifier => 7,
            PropertyId::ServerKeepAlive => 8,
            PropertyId::AuthenticationMethod => 9,
            PropertyId::AuthenticationData => 10,
            PropertyId::RequestProblemInformation => 11,
            PropertyId::WillDelayInterval => 12,
            PropertyId::RequestResponseInformation => 13,
            PropertyId::ResponseInformation => 14,
            PropertyId::ServerReference => 15,
            PropertyId::ReasonString => 16,
            PropertyId::ReceiveMaximum => 17,
            PropertyId::TopicAliasMaximum => 18,
            PropertyId::TopicAlias => 19,
            PropertyId::MaximumQos => 20,
            PropertyId::RetainAvailable => 21,
            PropertyId::MaximumPacketSize => 22,
            PropertyId::WildcardSubscriptionAvailable => 23,
            PropertyId::SubscriptionIdentifierAvailable => 24,
            PropertyId::SharedSubscriptionAvailable => 25,
            PropertyId::UserProperty => return None,
        };
        Some(bit)
    }
}

/// The packet context a property section belongs to, for the purposes
/// of the legality matrix (C8). `Will` is the pseudo-context for the
/// Will properties nested in a CONNECT payload, which have their own
/// legal property set distinct from CONNECT's own variable-header
/// properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyContext {
    Connect,
    Will,
    Connack,
    Publish,
    Subscribe,
    Unsubscribe,
    /// PUBACK, PUBREC, PUBREL, PUBCOMP, SUBACK, UNSUBACK: all share the
    /// same legal property set (Reason String, User Property).
    Ack,
    Disconnect,
    Auth,
    /// PINGREQ and PINGRESP carry no properties at all.
    PingOrPingResp,
}
