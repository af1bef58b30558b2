// ABOUTME: Optional parameters (tag/length/value) appended after a PDU's mandatory fields
// ABOUTME: Parsing is lazy and keeps unknown tags as raw bytes so PDUs re-encode unchanged

use crate::codec::CodecError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Well known optional parameter tags.
pub mod tags {
    pub const DEST_ADDR_SUBUNIT: u16 = 0x0005;
    pub const DEST_NETWORK_TYPE: u16 = 0x0006;
    pub const SOURCE_ADDR_SUBUNIT: u16 = 0x000D;
    pub const PAYLOAD_TYPE: u16 = 0x0019;
    pub const ADDITIONAL_STATUS_INFO_TEXT: u16 = 0x001D;
    pub const RECEIPTED_MESSAGE_ID: u16 = 0x001E;
    pub const PRIVACY_INDICATOR: u16 = 0x0201;
    pub const USER_MESSAGE_REFERENCE: u16 = 0x0204;
    pub const USER_RESPONSE_CODE: u16 = 0x0205;
    pub const SOURCE_PORT: u16 = 0x020A;
    pub const DESTINATION_PORT: u16 = 0x020B;
    pub const SAR_MSG_REF_NUM: u16 = 0x020C;
    pub const LANGUAGE_INDICATOR: u16 = 0x020D;
    pub const SAR_TOTAL_SEGMENTS: u16 = 0x020E;
    pub const SAR_SEGMENT_SEQNUM: u16 = 0x020F;
    pub const SC_INTERFACE_VERSION: u16 = 0x0210;
    pub const DPF_RESULT: u16 = 0x0420;
    pub const SET_DPF: u16 = 0x0421;
    pub const MS_AVAILABILITY_STATUS: u16 = 0x0422;
    pub const NETWORK_ERROR_CODE: u16 = 0x0423;
    pub const MESSAGE_PAYLOAD: u16 = 0x0424;
    pub const DELIVERY_FAILURE_REASON: u16 = 0x0425;
    pub const MORE_MESSAGES_TO_SEND: u16 = 0x0426;
    pub const MESSAGE_STATE: u16 = 0x0427;
    pub const BROADCAST_CONTENT_TYPE: u16 = 0x0601;
    pub const BROADCAST_REP_NUM: u16 = 0x0604;
    pub const BROADCAST_FREQUENCY_INTERVAL: u16 = 0x0605;
    pub const BROADCAST_AREA_IDENTIFIER: u16 = 0x0606;
    pub const BROADCAST_AREA_SUCCESS: u16 = 0x0608;
    pub const BROADCAST_END_TIME: u16 = 0x0609;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tlv {
    /// The Tag field is used to uniquely identify the particular optional parameter in question.
    pub tag: u16,

    /// The Value field contains the actual data for the optional parameter in question.
    /// Its length is the wire Length field.
    pub value: Bytes,
}

impl Tlv {
    pub const HEADER_SIZE: usize = 4;

    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    pub fn from_u8(tag: u16, value: u8) -> Self {
        Self::new(tag, vec![value])
    }

    pub fn from_u16(tag: u16, value: u16) -> Self {
        Self::new(tag, value.to_be_bytes().to_vec())
    }

    /// A NUL terminated string value.
    pub fn from_cstring(tag: u16, value: &str) -> Self {
        let mut bytes = Vec::with_capacity(value.len() + 1);
        bytes.extend(value.chars().map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')));
        bytes.push(0);
        Self::new(tag, bytes)
    }

    pub fn encoded_size(&self) -> usize {
        Self::HEADER_SIZE + self.value.len()
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let length = u16::try_from(self.value.len()).map_err(|_| {
            CodecError::Tlv(format!(
                "value of tag {:#06x} is {} octets, more than a TLV can carry",
                self.tag,
                self.value.len()
            ))
        })?;
        buf.put_u16(self.tag);
        buf.put_u16(length);
        buf.put_slice(&self.value);
        Ok(())
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self.value.as_ref() {
            [b] => Some(*b),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self.value.as_ref() {
            [hi, lo] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }

    /// The value as a string, without its NUL terminator if present.
    pub fn as_cstring(&self) -> String {
        let raw = self.value.as_ref();
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        raw[..end].iter().map(|&b| char::from(b)).collect()
    }
}

/// Lazy TLV parser over the bytes trailing a PDU's mandatory fields.
///
/// Yields one TLV per iteration and stops when no bytes remain. A truncated
/// TLV yields a single error and ends the iteration.
pub struct TlvIter {
    remaining: Bytes,
    failed: bool,
}

impl TlvIter {
    pub fn new(bytes: Bytes) -> Self {
        Self {
            remaining: bytes,
            failed: false,
        }
    }
}

impl Iterator for TlvIter {
    type Item = Result<Tlv, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining.is_empty() {
            return None;
        }
        if self.remaining.len() < Tlv::HEADER_SIZE {
            self.failed = true;
            return Some(Err(CodecError::Tlv(format!(
                "{} trailing octets cannot hold a TLV header",
                self.remaining.len()
            ))));
        }

        let tag = self.remaining.get_u16();
        let length = self.remaining.get_u16() as usize;
        if self.remaining.len() < length {
            self.failed = true;
            return Some(Err(CodecError::Tlv(format!(
                "tag {tag:#06x} declares {length} octets but only {} remain",
                self.remaining.len()
            ))));
        }

        let value = self.remaining.split_to(length);
        Some(Ok(Tlv { tag, value }))
    }
}

/// The optional parameters of one PDU, in wire order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionalParameters {
    params: Vec<Tlv>,
}

impl OptionalParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(bytes: Bytes) -> Result<Self, CodecError> {
        let params = TlvIter::new(bytes).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { params })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        for tlv in &self.params {
            tlv.encode(buf)?;
        }
        Ok(())
    }

    pub fn encoded_size(&self) -> usize {
        self.params.iter().map(Tlv::encoded_size).sum()
    }

    pub fn push(&mut self, tlv: Tlv) {
        self.params.push(tlv);
    }

    /// Add a parameter, replacing an earlier one with the same tag.
    pub fn set(&mut self, tlv: Tlv) {
        match self.params.iter_mut().find(|p| p.tag == tlv.tag) {
            Some(existing) => *existing = tlv,
            None => self.params.push(tlv),
        }
    }

    pub fn with(mut self, tlv: Tlv) -> Self {
        self.set(tlv);
        self
    }

    pub fn get(&self, tag: u16) -> Option<&Tlv> {
        self.params.iter().find(|p| p.tag == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tlv> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn sc_interface_version(&self) -> Option<u8> {
        self.get(tags::SC_INTERFACE_VERSION).and_then(Tlv::as_u8)
    }

    pub fn message_payload(&self) -> Option<&Bytes> {
        self.get(tags::MESSAGE_PAYLOAD).map(|t| &t.value)
    }

    pub fn receipted_message_id(&self) -> Option<String> {
        self.get(tags::RECEIPTED_MESSAGE_ID).map(Tlv::as_cstring)
    }

    pub fn message_state(&self) -> Option<u8> {
        self.get(tags::MESSAGE_STATE).and_then(Tlv::as_u8)
    }
}

impl FromIterator<Tlv> for OptionalParameters {
    fn from_iter<I: IntoIterator<Item = Tlv>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_survive_round_trip() {
        let params: OptionalParameters = [
            Tlv::from_u8(tags::SC_INTERFACE_VERSION, 0x34),
            Tlv::new(0x1400, vec![0xDE, 0xAD, 0xBE, 0xEF]),
            Tlv::new(tags::MESSAGE_PAYLOAD, Bytes::new()),
        ]
        .into_iter()
        .collect();

        let mut buf = BytesMut::new();
        params.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), params.encoded_size());

        let decoded = OptionalParameters::decode(buf.freeze()).unwrap();
        assert_eq!(decoded, params);
        assert_eq!(decoded.get(0x1400).unwrap().value.as_ref(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(decoded.sc_interface_version(), Some(0x34));
    }

    #[test]
    fn iterator_is_lazy_and_stops_on_truncation() {
        let mut buf = BytesMut::new();
        Tlv::from_u16(tags::USER_MESSAGE_REFERENCE, 7).encode(&mut buf).unwrap();
        buf.put_u16(tags::MESSAGE_STATE);
        buf.put_u16(4);
        buf.put_u8(1);

        let mut iter = TlvIter::new(buf.freeze());
        assert_eq!(iter.next().unwrap().unwrap().as_u16(), Some(7));
        assert!(matches!(iter.next(), Some(Err(CodecError::Tlv(_)))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn typed_accessors() {
        let params = OptionalParameters::new()
            .with(Tlv::from_cstring(tags::RECEIPTED_MESSAGE_ID, "abc123"))
            .with(Tlv::from_u8(tags::MESSAGE_STATE, 2));
        assert_eq!(params.receipted_message_id().as_deref(), Some("abc123"));
        assert_eq!(params.message_state(), Some(2));
        assert!(params.message_payload().is_none());
    }

    #[test]
    fn set_replaces_existing_tag() {
        let mut params = OptionalParameters::new();
        params.set(Tlv::from_u8(tags::SC_INTERFACE_VERSION, 0x33));
        params.set(Tlv::from_u8(tags::SC_INTERFACE_VERSION, 0x34));
        assert_eq!(params.len(), 1);
        assert_eq!(params.sc_interface_version(), Some(0x34));
    }
}
