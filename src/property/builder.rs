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

//! Component C3: the append-only property builder.
//!
//! A `PropertyBuilder` wraps a caller-owned scratch buffer and never
//! allocates. Every `add_*` call either advances `cursor` and returns
//! `Ok(())`, or leaves the builder exactly as it was and returns an
//! `Err`; there is no partial-write state to clean up. Pointer-arithmetic
//! cursors from the source codec (`uint8_t *pIndex` walked across a
//! buffer) become an offset into an owning slice here, so every bound
//! check is slice-relative rather than a subtraction of two raw
//! pointers.

use super::{legality::is_legal, PropertyContext, PropertyId};
use crate::error::{CodecError, CodecResult};
use crate::primitive::{encode_length_prefixed, encode_u16_be, encode_u32_be, encode_vbi, vbi_size, VBI_MAX};

/// Append-only buffer accumulating `<id><payload>` property entries.
///
/// `field_set` tracks which at-most-once properties have already been
/// written so a second `add_*` call for the same property is rejected
/// before anything is mutated. User Property is exempt: it is the one
/// property MQTT v5 allows to repeat.
pub struct PropertyBuilder<'a> {
    buffer: &'a mut [u8],
    cursor: usize,
    field_set: u32,
}

impl<'a> PropertyBuilder<'a> {
    /// Wrap `buffer` as a fresh, empty property builder.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        PropertyBuilder {
            buffer,
            cursor: 0,
            field_set: 0,
        }
    }

    /// Reset to the empty state without touching the backing buffer's
    /// contents (they are simply no longer considered valid).
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.field_set = 0;
    }

    /// Bytes written so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total capacity of the backing buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// The encoded property section written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.cursor]
    }

    fn is_set(&self, id: PropertyId) -> bool {
        match id.field_set_bit() {
            Some(bit) => self.field_set & (1 << bit) != 0,
            None => false,
        }
    }

    fn mark_set(&mut self, id: PropertyId) {
        if let Some(bit) = id.field_set_bit() {
            self.field_set |= 1 << bit;
        }
    }

    /// Steps 2 and 3 of the append contract: duplicate detection and
    /// per-packet-type legality, performed before any byte is touched.
    fn pre_checks(&self, id: PropertyId, context: Option<PropertyContext>) -> CodecResult<()> {
        if self.is_set(id) {
            return Err(CodecError::BadParameter("property already present in this builder"));
        }
        if let Some(ctx) = context {
            if !is_legal(ctx, id) {
                return Err(CodecError::BadParameter("property is not legal for this packet type"));
            }
        }
        Ok(())
    }

    /// Writes the id byte and reserves `payload_len` bytes after it,
    /// returning the offset at which the caller should write the
    /// payload. Enforces both the buffer capacity and the MQTT
    /// Remaining Length sentinel (`spec.md` §3); neither check mutates
    /// `cursor` on failure.
    fn reserve(&mut self, id: PropertyId, payload_len: usize) -> CodecResult<usize> {
        let needed = 1 + payload_len;
        let end = self
            .cursor
            .checked_add(needed)
            .ok_or(CodecError::NoMemory)?;
        if end > self.buffer.len() || end > VBI_MAX as usize {
            return Err(CodecError::NoMemory);
        }
        self.buffer[self.cursor] = id.as_u8();
        Ok(self.cursor + 1)
    }

    fn add_u8(&mut self, id: PropertyId, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        self.pre_checks(id, context)?;
        let start = self.reserve(id, 1)?;
        self.buffer[start] = value;
        self.cursor = start + 1;
        self.mark_set(id);
        Ok(())
    }

    fn add_bool(&mut self, id: PropertyId, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        if value > 1 {
            return Err(CodecError::BadParameter("boolean property must be 0 or 1"));
        }
        self.add_u8(id, value, context)
    }

    fn add_u16(&mut self, id: PropertyId, value: u16, context: Option<PropertyContext>) -> CodecResult<()> {
        self.pre_checks(id, context)?;
        let start = self.reserve(id, 2)?;
        encode_u16_be(&mut self.buffer[start..], value)?;
        self.cursor = start + 2;
        self.mark_set(id);
        Ok(())
    }

    fn add_u32(&mut self, id: PropertyId, value: u32, context: Option<PropertyContext>) -> CodecResult<()> {
        self.pre_checks(id, context)?;
        let start = self.reserve(id, 4)?;
        encode_u32_be(&mut self.buffer[start..], value)?;
        self.cursor = start + 4;
        self.mark_set(id);
        Ok(())
    }

    fn add_vbi(&mut self, id: PropertyId, value: u32, context: Option<PropertyContext>) -> CodecResult<()> {
        self.pre_checks(id, context)?;
        let size = vbi_size(value);
        let start = self.reserve(id, size)?;
        encode_vbi(&mut self.buffer[start..], value)?;
        self.cursor = start + size;
        self.mark_set(id);
        Ok(())
    }

    fn add_utf8(&mut self, id: PropertyId, value: &str, context: Option<PropertyContext>) -> CodecResult<()> {
        if value.is_empty() {
            return Err(CodecError::BadParameter("property string must not be empty"));
        }
        self.pre_checks(id, context)?;
        let start = self.reserve(id, 2 + value.len())?;
        encode_length_prefixed(&mut self.buffer[start..], value.as_bytes())?;
        self.cursor = start + 2 + value.len();
        self.mark_set(id);
        Ok(())
    }

    fn add_binary(&mut self, id: PropertyId, value: &[u8], context: Option<PropertyContext>) -> CodecResult<()> {
        if value.is_empty() {
            return Err(CodecError::BadParameter("property data must not be empty"));
        }
        self.pre_checks(id, context)?;
        let start = self.reserve(id, 2 + value.len())?;
        encode_length_prefixed(&mut self.buffer[start..], value)?;
        self.cursor = start + 2 + value.len();
        self.mark_set(id);
        Ok(())
    }

    // ---- Public, one-per-property-kind API -------------------------------

    pub fn add_payload_format_indicator(&mut self, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_bool(PropertyId::PayloadFormatIndicator, value, context)
    }

    pub fn add_message_expiry_interval(&mut self, value: u32, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_u32(PropertyId::MessageExpiryInterval, value, context)
    }

    pub fn add_content_type(&mut self, value: &str, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_utf8(PropertyId::ContentType, value, context)
    }

    /// Response Topic may not contain wildcard characters.
    pub fn add_response_topic(&mut self, value: &str, context: Option<PropertyContext>) -> CodecResult<()> {
        if value.contains('+') || value.contains('#') {
            return Err(CodecError::BadParameter("response topic must not contain wildcards"));
        }
        self.add_utf8(PropertyId::ResponseTopic, value, context)
    }

    pub fn add_correlation_data(&mut self, value: &[u8], context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_binary(PropertyId::CorrelationData, value, context)
    }

    /// A Subscription Identifier of zero is meaningless (it cannot
    /// identify a subscription) and is rejected.
    pub fn add_subscription_identifier(&mut self, value: u32, context: Option<PropertyContext>) -> CodecResult<()> {
        if value == 0 {
            return Err(CodecError::BadParameter("subscription identifier must be nonzero"));
        }
        self.add_vbi(PropertyId::SubscriptionIdentifier, value, context)
    }

    pub fn add_session_expiry_interval(&mut self, value: u32, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_u32(PropertyId::SessionExpiryInterval, value, context)
    }

    pub fn add_assigned_client_identifier(&mut self, value: &str, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_utf8(PropertyId::AssignedClientIdentifier, value, context)
    }

    pub fn add_server_keep_alive(&mut self, value: u16, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_u16(PropertyId::ServerKeepAlive, value, context)
    }

    pub fn add_authentication_method(&mut self, value: &str, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_utf8(PropertyId::AuthenticationMethod, value, context)
    }

    /// Hygiene rule documented in `spec.md` §4.3 and §9: this codec
    /// requires Authentication Method to have been appended to the same
    /// builder before Authentication Data, even though MQTT v5 itself
    /// does not mandate an order between the two properties on the
    /// wire.
    pub fn add_authentication_data(&mut self, value: &[u8], context: Option<PropertyContext>) -> CodecResult<()> {
        if !self.is_set(PropertyId::AuthenticationMethod) {
            return Err(CodecError::BadParameter(
                "authentication data requires authentication method to be added first",
            ));
        }
        self.add_binary(PropertyId::AuthenticationData, value, context)
    }

    pub fn add_request_problem_information(&mut self, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_bool(PropertyId::RequestProblemInformation, value, context)
    }

    pub fn add_will_delay_interval(&mut self, value: u32, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_u32(PropertyId::WillDelayInterval, value, context)
    }

    pub fn add_request_response_information(&mut self, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_bool(PropertyId::RequestResponseInformation, value, context)
    }

    pub fn add_response_information(&mut self, value: &str, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_utf8(PropertyId::ResponseInformation, value, context)
    }

    pub fn add_server_reference(&mut self, value: &str, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_utf8(PropertyId::ServerReference, value, context)
    }

    pub fn add_reason_string(&mut self, value: &str, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_utf8(PropertyId::ReasonString, value, context)
    }

    /// A Receive Maximum of zero would mean the peer may never send a
    /// PUBLISH, which MQTT v5 forbids as a protocol value.
    pub fn add_receive_maximum(&mut self, value: u16, context: Option<PropertyContext>) -> CodecResult<()> {
        if value == 0 {
            return Err(CodecError::BadParameter("receive maximum must be nonzero"));
        }
        self.add_u16(PropertyId::ReceiveMaximum, value, context)
    }

    pub fn add_topic_alias_maximum(&mut self, value: u16, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_u16(PropertyId::TopicAliasMaximum, value, context)
    }

    /// A Topic Alias of zero is reserved and must not be used.
    pub fn add_topic_alias(&mut self, value: u16, context: Option<PropertyContext>) -> CodecResult<()> {
        if value == 0 {
            return Err(CodecError::BadParameter("topic alias must be nonzero"));
        }
        self.add_u16(PropertyId::TopicAlias, value, context)
    }

    pub fn add_maximum_qos(&mut self, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_bool(PropertyId::MaximumQos, value, context)
    }

    pub fn add_retain_available(&mut self, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_bool(PropertyId::RetainAvailable, value, context)
    }

    /// User Property may occur any number of times and never touches
    /// `field_set`.
    pub fn add_user_property(&mut self, key: &str, value: &str, context: Option<PropertyContext>) -> CodecResult<()> {
        if key.is_empty() || value.is_empty() {
            return Err(CodecError::BadParameter("user property key and value must not be empty"));
        }
        self.pre_checks(PropertyId::UserProperty, context)?;
        let needed = 2 + key.len() + 2 + value.len();
        let start = self.reserve(PropertyId::UserProperty, needed)?;
        let key_end = start + 2 + key.len();
        encode_length_prefixed(&mut self.buffer[start..], key.as_bytes())?;
        encode_length_prefixed(&mut self.buffer[key_end..], value.as_bytes())?;
        self.cursor = start + needed;
        Ok(())
    }

    /// A Maximum Packet Size of zero would forbid every packet.
    pub fn add_maximum_packet_size(&mut self, value: u32, context: Option<PropertyContext>) -> CodecResult<()> {
        if value == 0 {
            return Err(CodecError::BadParameter("maximum packet size must be nonzero"));
        }
        self.add_u32(PropertyId::MaximumPacketSize, value, context)
    }

    pub fn add_wildcard_subscription_available(&mut self, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_bool(PropertyId::WildcardSubscriptionAvailable, value, context)
    }

    pub fn add_subscription_identifier_available(&mut self, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_bool(PropertyId::SubscriptionIdentifierAvailable, value, context)
    }

    pub fn add_shared_subscription_available(&mut self, value: u8, context: Option<PropertyContext>) -> CodecResult<()> {
        self.add_bool(PropertyId::SharedSubscriptionAvailable, value, context)
    }
}
