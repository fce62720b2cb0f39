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

//! Component C8: the property-legality matrix.
//!
//! A pure function of `(context, property)`. Each packet context's
//! allowed set is written once as a `match` arm rather than a
//! runtime-populated bitmask, so the historical bug class this crate's
//! C predecessor had — the CONNECT and CONNACK masks being defined
//! twice, in two translation units, and drifting apart — cannot occur
//! here: there is exactly one definition.
//!
//! The source's `AUTH` branch famously falls through to `default` for
//! lack of a `break`, which zeroes AUTH's allowed mask. That is a bug,
//! not a spec requirement; AUTH here gets the mask the v5 spec actually
//! grants it (Authentication Method, Authentication Data, Reason
//! String, User Property).

use super::{PropertyContext, PropertyId};

/// Is `property` legal in a property section belonging to `context`?
pub fn is_legal(context: PropertyContext, property: PropertyId) -> bool {
    use PropertyContext::*;
    use PropertyId::*;

    // User Property is legal everywhere a property section exists at all.
    if property == UserProperty {
        return !matches!(context, PingOrPingResp);
    }

    match context {
        Connect => matches!(
            property,
            SessionExpiryInterval
                | AuthenticationMethod
                | AuthenticationData
                | RequestProblemInformation
                | RequestResponseInformation
                | ReceiveMaximum
                | TopicAliasMaximum
                | MaximumPacketSize
        ),
        Will => matches!(
            property,
            PayloadFormatIndicator
                | MessageExpiryInterval
                | ContentType
                | ResponseTopic
                | CorrelationData
                | WillDelayInterval
        ),
        Connack => matches!(
            property,
            SessionExpiryInterval
                | AssignedClientIdentifier
                | ServerKeepAlive
                | AuthenticationMethod
                | AuthenticationData
                | ResponseInformation
                | ServerReference
                | ReasonString
                | ReceiveMaximum
                | TopicAliasMaximum
                | MaximumQos
                | RetainAvailable
                | MaximumPacketSize
                | WildcardSubscriptionAvailable
                | SubscriptionIdentifierAvailable
                | SharedSubscriptionAvailable
        ),
        Publish => matches!(
            property,
            PayloadFormatIndicator
                | MessageExpiryInterval
                | ContentType
                | ResponseTopic
                | CorrelationData
                | SubscriptionIdentifier
                | TopicAlias
        ),
        Subscribe => matches!(property, SubscriptionIdentifier),
        Unsubscribe => false,
        Ack => matches!(property, ReasonString),
        Disconnect => matches!(
            property,
            SessionExpiryInterval | ReasonString | ServerReference
        ),
        Auth => matches!(property, AuthenticationMethod | AuthenticationData | ReasonString),
        PingOrPingResp => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_property_legal_everywhere_but_ping() {
        assert!(is_legal(PropertyContext::Connect, PropertyId::UserProperty));
        assert!(is_legal(PropertyContext::Unsubscribe, PropertyId::UserProperty));
        assert!(!is_legal(PropertyContext::PingOrPingResp, PropertyId::UserProperty));
    }

    #[test]
    fn session_expiry_legal_in_connect_connack_disconnect_only() {
        assert!(is_legal(PropertyContext::Connect, PropertyId::SessionExpiryInterval));
        assert!(is_legal(PropertyContext::Connack, PropertyId::SessionExpiryInterval));
        assert!(is_legal(PropertyContext::Disconnect, PropertyId::SessionExpiryInterval));
        assert!(!is_legal(PropertyContext::Publish, PropertyId::SessionExpiryInterval));
        assert!(!is_legal(PropertyContext::Subscribe, PropertyId::SessionExpiryInterval));
    }

    #[test]
    fn topic_alias_legal_only_in_publish() {
        assert!(is_legal(PropertyContext::Publish, PropertyId::TopicAlias));
        assert!(!is_legal(PropertyContext::Connect, PropertyId::TopicAlias));
        assert!(!is_legal(PropertyContext::Connack, PropertyId::TopicAlias));
    }

    #[test]
    fn subscription_identifier_legal_in_publish_and_subscribe() {
        assert!(is_legal(PropertyContext::Publish, PropertyId::SubscriptionIdentifier));
        assert!(is_legal(PropertyContext::Subscribe, PropertyId::SubscriptionIdentifier));
        assert!(!is_legal(PropertyContext::Unsubscribe, PropertyId::SubscriptionIdentifier));
    }

    #[test]
    fn unsubscribe_and_ping_allow_nothing_but_user_property() {
        for id in [PropertyId::ReasonString, PropertyId::SessionExpiryInterval] {
            assert!(!is_legal(PropertyContext::Unsubscribe, id));
            assert!(!is_legal(PropertyContext::PingOrPingResp, id));
        }
    }
}
