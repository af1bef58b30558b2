use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_short_message, decode_u8,
    encode_cstring, encode_short_message,
};
use crate::datatypes::string_rules::{
    MESSAGE_ID, SCHEDULE_DELIVERY_TIME, SOURCE_ADDR, VALIDITY_PERIOD,
};
use crate::datatypes::{Address, CommandId, CommandStatus};
use crate::macros::{impl_complete_header_only_pdu, impl_frame_conversions};
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// replace_sm replaces a previously submitted message that is still
/// pending delivery.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaceSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
    pub source: Address,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,
}

impl ReplaceSm {
    pub fn new(
        message_id: impl Into<String>,
        source: impl Into<Address>,
        short_message: impl Into<Bytes>,
    ) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            message_id: message_id.into(),
            source: source.into(),
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            registered_delivery: 0,
            sm_default_msg_id: 0,
            short_message: short_message.into(),
        }
    }
}

impl Encodable for ReplaceSm {
    fn command_id(&self) -> CommandId {
        CommandId::ReplaceSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::ReplaceSm, self.command_status, self.sequence_number)
            .encode(buf);
        encode_cstring(buf, &self.message_id, MESSAGE_ID)?;
        self.source.encode(buf, SOURCE_ADDR)?;
        encode_cstring(buf, &self.schedule_delivery_time, SCHEDULE_DELIVERY_TIME)?;
        encode_cstring(buf, &self.validity_period, VALIDITY_PERIOD)?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.sm_default_msg_id);
        encode_short_message(buf, &self.short_message)
    }
}

impl Decodable for ReplaceSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::ReplaceSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id: decode_cstring(buf, MESSAGE_ID)?,
            source: Address::decode(buf, SOURCE_ADDR)?,
            schedule_delivery_time: decode_cstring(buf, SCHEDULE_DELIVERY_TIME)?,
            validity_period: decode_cstring(buf, VALIDITY_PERIOD)?,
            registered_delivery: decode_u8(buf)?,
            sm_default_msg_id: decode_u8(buf)?,
            short_message: decode_short_message(buf)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReplaceSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(ReplaceSmResponse, CommandId::ReplaceSmResp);
impl_frame_conversions!(boxed ReplaceSm, ReplaceSm);
impl_frame_conversions!(ReplaceSmResp, ReplaceSmResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_pdu;

    #[test]
    fn replace_sm_round_trip() {
        let mut pdu = ReplaceSm::new("abc", "1111", b"updated text".to_vec());
        pdu.sequence_number = 2;
        pdu.schedule_delivery_time = "000000010000000R".into();
        let decoded = ReplaceSm::try_from(decode_pdu(&pdu.to_bytes().unwrap()).unwrap()).unwrap();
        assert_eq!(decoded, pdu);
    }

    #[test]
    fn replace_sm_resp_failure() {
        let resp = ReplaceSmResponse::error(2, CommandStatus::ReplaceSmFailed);
        let decoded = ReplaceSmResponse::try_from(decode_pdu(&resp.to_bytes().unwrap()).unwrap());
        assert_eq!(decoded.unwrap(), resp);
    }
}
