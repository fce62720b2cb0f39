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

//! Component C4: the property-section reader.
//!
//! `PropertyReader` walks a borrowed property-section slice one entry
//! at a time, decoding each `<id><payload>` pair into a typed
//! [`PropertyValue`] without copying anything but the two-byte and
//! four-byte scalars. String and binary payloads borrow directly from
//! the caller's receive buffer, which is why every lifetime here is
//! tied to `'a`.

use super::{PropertyContext, PropertyId};
use crate::error::{CodecError, CodecResult};
use crate::primitive::{decode_length_prefixed, decode_u16_be, decode_u32_be, decode_utf8_str, decode_vbi};
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};

/// A single decoded property, tagged with its id for callers that want
/// to match generically instead of destructuring [`PropertyValue`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulkProperty<'a> {
    pub id: PropertyId,
    pub value: PropertyValue<'a>,
}

/// The decoded payload of one property entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue<'a> {
    PayloadFormatIndicator(u8),
    MessageExpiryInterval(u32),
    ContentType(&'a str),
    ResponseTopic(&'a str),
    CorrelationData(&'a [u8]),
    SubscriptionIdentifier(u32),
    SessionExpiryInterval(u32),
    AssignedClientIdentifier(&'a str),
    ServerKeepAlive(u16),
    AuthenticationMethod(&'a str),
    AuthenticationData(&'a [u8]),
    RequestProblemInformation(u8),
    WillDelayInterval(u32),
    RequestResponseInformation(u8),
    ResponseInformation(&'a str),
    ServerReference(&'a str),
    ReasonString(&'a str),
    ReceiveMaximum(u16),
    TopicAliasMaximum(u16),
    TopicAlias(u16),
    MaximumQos(u8),
    RetainAvailable(u8),
    UserProperty(&'a str, &'a str),
    MaximumPacketSize(u32),
    WildcardSubscriptionAvailable(u8),
    SubscriptionIdentifierAvailable(u8),
    SharedSubscriptionAvailable(u8),
}

/// A cursor over a borrowed property section.
pub struct PropertyReader<'a> {
    src: &'a [u8],
    cursor: usize,
    context: PropertyContext,
    field_set: u32,
}

impl<'a> PropertyReader<'a> {
    /// Wrap `src` (the property section only, length prefix already
    /// stripped by the caller) for decoding properties legal in
    /// `context`.
    pub fn new(src: &'a [u8], context: PropertyContext) -> Self {
        PropertyReader {
            src,
            cursor: 0,
            context,
            field_set: 0,
        }
    }

    /// Bytes consumed from the section so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// `true` once every byte of the section has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.src.len()
    }

    /// The identifier of the next property, without consuming it.
    /// `Ok(None)` once the section is exhausted.
    pub fn peek_next_property_type(&self) -> CodecResult<Option<PropertyId>> {
        if self.is_exhausted() {
            return Ok(None);
        }
        let id = PropertyId::try_from_primitive_or_err(self.src[self.cursor])?;
        Ok(Some(id))
    }

    fn remaining(&self) -> &'a [u8] {
        &self.src[self.cursor..]
    }

    fn mark_and_check_duplicate(&mut self, id: PropertyId) -> CodecResult<()> {
        if let Some(bit) = id.field_set_bit() {
            if self.field_set & (1 << bit) != 0 {
                return Err(CodecError::BadResponse("property appears more than once"));
            }
            self.field_set |= 1 << bit;
        }
        Ok(())
    }

    /// Decode and return the next property entry, or `Ok(None)` once the
    /// section is exhausted.
    ///
    /// Rejects unknown property ids, ids not legal for this reader's
    /// [`PropertyContext`], and a second occurrence of a property that
    /// is only allowed once (every property except User Property).
    pub fn next(&mut self) -> CodecResult<Option<BulkProperty<'a>>> {
        if self.is_exhausted() {
            return Ok(None);
        }
        let id = PropertyId::try_from_primitive_or_err(self.src[self.cursor])?;
        if !super::is_legal(self.context, id) {
            return Err(CodecError::BadResponse("property is not legal for this packet type"));
        }
        self.mark_and_check_duplicate(id)?;

        let body = &self.remaining()[1..];
        let (value, body_len) = decode_body(id, body)?;
        self.cursor += 1 + body_len;
        Ok(Some(BulkProperty { id, value }))
    }
}

fn decode_body(id: PropertyId, body: &[u8]) -> CodecResult<(PropertyValue<'_>, usize)> {
    use PropertyId::*;
    Ok(match id {
        PayloadFormatIndicator => (PropertyValue::PayloadFormatIndicator(decode_u8(body)?), 1),
        MessageExpiryInterval => (PropertyValue::MessageExpiryInterval(decode_u32_be(body)?), 4),
        ContentType => {
            let (s, n) = decode_utf8_str(body)?;
            (PropertyValue::ContentType(s), n)
        }
        ResponseTopic => {
            let (s, n) = decode_utf8_str(body)?;
            (PropertyValue::ResponseTopic(s), n)
        }
        CorrelationData => {
            let (b, n) = decode_length_prefixed(body)?;
            (PropertyValue::CorrelationData(b), n)
        }
        SubscriptionIdentifier => {
            let (v, n) = decode_vbi(body)?;
            if v == 0 {
                return Err(CodecError::BadResponse("subscription identifier of zero is invalid"));
            }
            (PropertyValue::SubscriptionIdentifier(v), n)
        }
        SessionExpiryInterval => (PropertyValue::SessionExpiryInterval(decode_u32_be(body)?), 4),
        AssignedClientIdentifier => {
            let (s, n) = decode_utf8_str(body)?;
            (PropertyValue::AssignedClientIdentifier(s), n)
        }
        ServerKeepAlive => (PropertyValue::ServerKeepAlive(decode_u16_be(body)?), 2),
        AuthenticationMethod => {
            let (s, n) = decode_utf8_str(body)?;
            (PropertyValue::AuthenticationMethod(s), n)
        }
        AuthenticationData => {
            let (b, n) = decode_length_prefixed(body)?;
            (PropertyValue::AuthenticationData(b), n)
        }
        RequestProblemInformation => (
            PropertyValue::RequestProblemInformation(decode_bool(body)?),
            1,
        ),
        WillDelayInterval => (PropertyValue::WillDelayInterval(decode_u32_be(body)?), 4),
        RequestResponseInformation => (
            PropertyValue::RequestResponseInformation(decode_bool(body)?),
            1,
        ),
        ResponseInformation => {
            let (s, n) = decode_utf8_str(body)?;
            (PropertyValue::ResponseInformation(s), n)
        }
        ServerReference => {
            let (s, n) = decode_utf8_str(body)?;
            (PropertyValue::ServerReference(s), n)
        }
        ReasonString => {
            let (s, n) = decode_utf8_str(body)?;
            (PropertyValue::ReasonString(s), n)
        }
        ReceiveMaximum => {
            let v = decode_u16_be(body)?;
            if v == 0 {
                return Err(CodecError::BadResponse("receive maximum of zero is invalid"));
            }
            (PropertyValue::ReceiveMaximum(v), 2)
        }
        TopicAliasMaximum => (PropertyValue::TopicAliasMaximum(decode_u16_be(body)?), 2),
        TopicAlias => {
            let v = decode_u16_be(body)?;
            if v == 0 {
                return Err(CodecError::BadResponse("topic alias of zero is invalid"));
            }
            (PropertyValue::TopicAlias(v), 2)
        }
        MaximumQos => {
            let v = decode_bool(body)?;
            (PropertyValue::MaximumQos(v), 1)
        }
        RetainAvailable => (PropertyValue::RetainAvailable(decode_bool(body)?), 1),
        UserProperty => {
            let (key, key_n) = decode_utf8_str(body)?;
            let (value, value_n) = decode_utf8_str(&body[key_n..])?;
            (PropertyValue::UserProperty(key, value), key_n + value_n)
        }
        MaximumPacketSize => {
            let v = decode_u32_be(body)?;
            if v == 0 {
                return Err(CodecError::BadResponse("maximum packet size of zero is invalid"));
            }
            (PropertyValue::MaximumPacketSize(v), 4)
        }
        WildcardSubscriptionAvailable => (
            PropertyValue::WildcardSubscriptionAvailable(decode_bool(body)?),
            1,
        ),
        SubscriptionIdentifierAvailable => (
            PropertyValue::SubscriptionIdentifierAvailable(decode_bool(body)?),
            1,
        ),
        SharedSubscriptionAvailable => (
            PropertyValue::SharedSubscriptionAvailable(decode_bool(body)?),
            1,
        ),
    })
}

fn decode_u8(body: &[u8]) -> CodecResult<u8> {
    body.first().copied().ok_or(CodecError::BadResponse("truncated property value"))
}

fn decode_bool(body: &[u8]) -> CodecResult<u8> {
    let v = decode_u8(body)?;
    if v > 1 {
        return Err(CodecError::BadResponse("boolean property must be 0 or 1"));
    }
    Ok(v)
}

trait TryFromPrimitiveOrErr: Sized {
    fn try_from_primitive_or_err(raw: u8) -> CodecResult<Self>;
}

impl TryFromPrimitiveOrErr for PropertyId {
    fn try_from_primitive_or_err(raw: u8) -> CodecResult<Self> {
        PropertyId::try_from_primitive(raw).map_err(|_: TryFromPrimitiveError<PropertyId>| {
            CodecError::BadResponse("unrecognized property identifier")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::builder::PropertyBuilder;

    #[test]
    fn reads_back_what_the_builder_wrote() {
        let mut buf = [0u8; 64];
        let mut b = PropertyBuilder::new(&mut buf);
        b.add_session_expiry_interval(300, Some(PropertyContext::Connect)).unwrap();
        b.add_receive_maximum(10, Some(PropertyContext::Connect)).unwrap();
        b.add_user_property("k", "v", Some(PropertyContext::Connect)).unwrap();
        let bytes = b.as_bytes().to_vec();

        let mut r = PropertyReader::new(&bytes, PropertyContext::Connect);
        let first = r.next().unwrap().unwrap();
        assert_eq!(first.id, PropertyId::SessionExpiryInterval);
        assert_eq!(first.value, PropertyValue::SessionExpiryInterval(300));

        let second = r.next().unwrap().unwrap();
        assert_eq!(second.value, PropertyValue::ReceiveMaximum(10));

        let third = r.next().unwrap().unwrap();
        assert_eq!(third.value, PropertyValue::UserProperty("k", "v"));

        assert!(r.next().unwrap().is_none());
        assert!(r.is_exhausted());
    }

    #[test]
    fn rejects_unknown_property_id() {
        let bytes = [0x7Fu8, 0x00];
        let mut r = PropertyReader::new(&bytes, PropertyContext::Connect);
        assert!(matches!(r.next(), Err(CodecError::BadResponse(_))));
    }

    #[test]
    fn rejects_property_illegal_for_context() {
        // Topic Alias (0x23) is legal only in PUBLISH.
        let bytes = [0x23u8, 0x00, 0x01];
        let mut r = PropertyReader::new(&bytes, PropertyContext::Connect);
        assert!(matches!(r.next(), Err(CodecError::BadResponse(_))));
    }

    #[test]
    fn rejects_duplicate_single_occurrence_property() {
        let mut buf = [0u8; 32];
        let mut b = PropertyBuilder::new(&mut buf);
        // Build two Session Expiry Interval entries by hand, bypassing
        // the builder's own duplicate guard, to exercise the reader's.
        b.add_session_expiry_interval(1, None).unwrap();
        let first_len = b.cursor();
        b.reset();
        b.add_session_expiry_interval(2, None).unwrap();
        let mut doubled = Vec::new();
        doubled.extend_from_slice(&buf[..first_len]);
        doubled.extend_from_slice(&buf[..b.cursor()]);

        let mut r = PropertyReader::new(&doubled, PropertyContext::Connect);
        r.next().unwrap();
        assert!(matches!(r.next(), Err(CodecError::BadResponse(_))));
    }

    #[test]
    fn user_property_may_repeat_without_error() {
        let mut buf = [0u8; 64];
        let mut b = PropertyBuilder::new(&mut buf);
        b.add_user_property("a", "1", None).unwrap();
        b.add_user_property("a", "2", None).unwrap();
        let bytes = b.as_bytes().to_vec();

        let mut r = PropertyReader::new(&bytes, PropertyContext::Connect);
        assert!(r.next().unwrap().is_some());
        assert!(r.next().unwrap().is_some());
        assert!(r.next().unwrap().is_none());
    }

    #[test]
    fn peek_does_not_advance() {
        let mut buf = [0u8; 16];
        let mut b = PropertyBuilder::new(&mut buf);
        b.add_session_expiry_interval(5, None).unwrap();
        let bytes = b.as_bytes().to_vec();

        let r = PropertyReader::new(&bytes, PropertyContext::Connect);
        assert_eq!(r.peek_next_property_type().unwrap(), Some(PropertyId::SessionExpiryInterval));
        assert_eq!(r.cursor(), 0);
    }
}
