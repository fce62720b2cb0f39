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

//! The closed v5.0 Reason Code enumerations, one per packet family.
//!
//! MQTT v5 reuses numeric reason-code values across packet types with
//! different legal subsets (e.g. `0x91 PacketIdentifierInUse` is legal
//! for SUBACK/UNSUBACK but not PUBACK), so each family gets its own
//! closed `TryFromPrimitive` enum rather than one shared table. Every
//! code below 0x80 is a success outcome; 0x80 and above is a failure.
//! [`is_failure`](ConnectReasonCode::is_failure) and friends implement
//! exactly that partition.

use num_enum::TryFromPrimitive;
use serde::Serialize;
use std::fmt;

macro_rules! reason_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $value:expr),+ $(,)? }
        success: [$($success:ident),+ $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Serialize)]
        #[repr(u8)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            /// Numeric value of this reason code as it appears on the wire.
            pub fn as_u8(self) -> u8 {
                self as u8
            }

            /// `true` for the small set of success-side codes this family
            /// defines (usually just `Success`, occasionally a few more,
            /// e.g. SUBACK's granted-QoS codes).
            pub fn is_success(self) -> bool {
                matches!(self, $(Self::$success)|+)
            }

            /// The complement of [`is_success`](Self::is_success); matches
            /// the v5 convention that byte values `>= 0x80` are failures.
            pub fn is_failure(self) -> bool {
                !self.is_success()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

reason_code_enum! {
    /// Reason codes legal in a CONNACK packet.
    ConnectReasonCode {
        Success = 0x00,
        UnspecifiedError = 0x80,
        MalformedPacket = 0x81,
        ProtocolError = 0x82,
        ImplementationSpecificError = 0x83,
        UnsupportedProtocolVersion = 0x84,
        ClientIdentifierNotValid = 0x85,
        BadUserNameOrPassword = 0x86,
        NotAuthorized = 0x87,
        ServerUnavailable = 0x88,
        ServerBusy = 0x89,
        Banned = 0x8A,
        BadAuthenticationMethod = 0x8C,
        TopicNameInvalid = 0x90,
        PacketTooLarge = 0x95,
        QuotaExceeded = 0x97,
        PayloadFormatInvalid = 0x99,
        RetainNotSupported = 0x9A,
        QosNotSupported = 0x9B,
        UseAnotherServer = 0x9C,
        ServerMoved = 0x9D,
        ConnectionRateExceeded = 0x9F,
    }
    success: [Success]
}

reason_code_enum! {
    /// Reason codes legal in PUBACK.
    PubAckReasonCode {
        Success = 0x00,
        NoMatchingSubscribers = 0x10,
        UnspecifiedError = 0x80,
        ImplementationSpecificError = 0x83,
        NotAuthorized = 0x87,
        TopicNameInvalid = 0x90,
        PacketIdentifierInUse = 0x91,
        QuotaExceeded = 0x97,
        PayloadFormatInvalid = 0x99,
    }
    success: [Success, NoMatchingSubscribers]
}

reason_code_enum! {
    /// Reason codes legal in PUBREC.
    PubRecReasonCode {
        Success = 0x00,
        NoMatchingSubscribers = 0x10,
        UnspecifiedError = 0x80,
        ImplementationSpecificError = 0x83,
        NotAuthorized = 0x87,
        TopicNameInvalid = 0x90,
        PacketIdentifierInUse = 0x91,
        QuotaExceeded = 0x97,
        PayloadFormatInvalid = 0x99,
    }
    success: [Success, NoMatchingSubscribers]
}

reason_code_enum! {
    /// Reason codes legal in PUBREL.
    PubRelReasonCode {
        Success = 0x00,
        PacketIdentifierNotFound = 0x92,
    }
    success: [Success]
}

reason_code_enum! {
    /// Reason codes legal in PUBCOMP.
    PubCompReasonCode {
        Success = 0x00,
        PacketIdentifierNotFound = 0x92,
    }
    success: [Success]
}

reason_code_enum! {
    /// Reason codes legal per-filter in SUBACK. The three "granted QoS"
    /// codes are success outcomes, not merely zero.
    SubAckReasonCode {
        GrantedQos0 = 0x00,
        GrantedQos1 = 0x01,
        GrantedQos2 = 0x02,
        UnspecifiedError = 0x80,
        ImplementationSpecificError = 0x83,
        NotAuthorized = 0x87,
        TopicFilterInvalid = 0x8F,
        PacketIdentifierInUse = 0x91,
        QuotaExceeded = 0x97,
        SharedSubscriptionsNotSupported = 0x9E,
        SubscriptionIdentifiersNotSupported = 0xA1,
        WildcardSubscriptionsNotSupported = 0xA2,
    }
    success: [GrantedQos0, GrantedQos1, GrantedQos2]
}

reason_code_enum! {
    /// Reason codes legal per-filter in UNSUBACK.
    UnsubAckReasonCode {
        Success = 0x00,
        NoSubscriptionExisted = 0x11,
        UnspecifiedError = 0x80,
        ImplementationSpecificError = 0x83,
        NotAuthorized = 0x87,
        TopicFilterInvalid = 0x8F,
        PacketIdentifierInUse = 0x91,
    }
    success: [Success, NoSubscriptionExisted]
}

reason_code_enum! {
    /// Reason codes legal in DISCONNECT.
    DisconnectReasonCode {
        NormalDisconnection = 0x00,
        DisconnectWithWillMessage = 0x04,
        UnspecifiedError = 0x80,
        MalformedPacket = 0x81,
        ProtocolError = 0x82,
        ImplementationSpecificError = 0x83,
        NotAuthorized = 0x87,
        ServerBusy = 0x89,
        ServerShuttingDown = 0x8B,
        KeepAliveTimeout = 0x8D,
        SessionTakenOver = 0x8E,
        TopicFilterInvalid = 0x8F,
        TopicNameInvalid = 0x90,
        ReceiveMaximumExceeded = 0x93,
        TopicAliasInvalid = 0x94,
        PacketTooLarge = 0x95,
        MessageRateTooHigh = 0x96,
        QuotaExceeded = 0x97,
        AdministrativeAction = 0x98,
        PayloadFormatInvalid = 0x99,
        RetainNotSupported = 0x9A,
        QosNotSupported = 0x9B,
        UseAnotherServer = 0x9C,
        ServerMoved = 0x9D,
        SharedSubscriptionsNotSupported = 0x9E,
        ConnectionRateExceeded = 0x9F,
        MaximumConnectTime = 0xA0,
        SubscriptionIdentifiersNotSupported = 0xA1,
        WildcardSubscriptionsNotSupported = 0xA2,
    }
    success: [NormalDisconnection, DisconnectWithWillMessage]
}

reason_code_enum! {
    /// Reason codes legal in AUTH.
    AuthReasonCode {
        Success = 0x00,
        ContinueAuthentication = 0x18,
        ReAuthenticate = 0x19,
    }
    success: [Success, ContinueAuthentication, ReAuthenticate]
}
