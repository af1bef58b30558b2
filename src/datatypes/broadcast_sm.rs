// ABOUTME: SMPP 5.0 broadcast_sm, which asks the SMSC to broadcast a message to a set of cell areas
// ABOUTME: The broadcast area, content type, repetition count and frequency travel as mandatory TLVs

use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_tlvs, decode_u8,
    encode_cstring,
};
use crate::datatypes::string_rules::{
    MESSAGE_ID, SCHEDULE_DELIVERY_TIME, SERVICE_TYPE, SOURCE_ADDR, VALIDITY_PERIOD,
};
use crate::datatypes::tlv::{Tlv, tags};
use crate::datatypes::{Address, CommandId, CommandStatus, OptionalParameters};
use crate::macros::{impl_frame_conversions, impl_message_id_response};
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

#[derive(Clone, Debug, PartialEq)]
pub struct BroadcastSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub service_type: String,
    pub source: Address,
    /// Message id to replace when replace_if_present_flag is set, otherwise empty
    pub message_id: String,
    pub priority_flag: u8,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    /// broadcast_area_identifier, broadcast_content_type, broadcast_rep_num and
    /// broadcast_frequency_interval plus any optional TLVs
    pub optional_parameters: OptionalParameters,
}

impl BroadcastSm {
    pub fn new(
        source: impl Into<Address>,
        area_identifier: impl Into<Bytes>,
        content_type: u16,
        rep_num: u16,
        frequency_interval: [u8; 3],
    ) -> Self {
        let optional_parameters = OptionalParameters::new()
            .with(Tlv::new(tags::BROADCAST_AREA_IDENTIFIER, area_identifier))
            .with(Tlv::from_u16(tags::BROADCAST_CONTENT_TYPE, content_type))
            .with(Tlv::from_u16(tags::BROADCAST_REP_NUM, rep_num))
            .with(Tlv::new(tags::BROADCAST_FREQUENCY_INTERVAL, frequency_interval.to_vec()));

        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            service_type: String::new(),
            source: source.into(),
            message_id: String::new(),
            priority_flag: 0,
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            replace_if_present_flag: 0,
            data_coding: 0,
            sm_default_msg_id: 0,
            optional_parameters,
        }
    }

    pub fn broadcast_rep_num(&self) -> Option<u16> {
        self.optional_parameters
            .get(tags::BROADCAST_REP_NUM)
            .and_then(Tlv::as_u16)
    }
}

impl Encodable for BroadcastSm {
    fn command_id(&self) -> CommandId {
        CommandId::BroadcastSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::BroadcastSm, self.command_status, self.sequence_number)
            .encode(buf);
        encode_cstring(buf, &self.service_type, SERVICE_TYPE)?;
        self.source.encode(buf, SOURCE_ADDR)?;
        encode_cstring(buf, &self.message_id, MESSAGE_ID)?;
        buf.put_u8(self.priority_flag);
        encode_cstring(buf, &self.schedule_delivery_time, SCHEDULE_DELIVERY_TIME)?;
        encode_cstring(buf, &self.validity_period, VALIDITY_PERIOD)?;
        buf.put_u8(self.replace_if_present_flag);
        buf.put_u8(self.data_coding);
        buf.put_u8(self.sm_default_msg_id);
        self.optional_parameters.encode(buf)
    }
}

impl Decodable for BroadcastSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::BroadcastSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let pdu = Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            service_type: decode_cstring(buf, SERVICE_TYPE)?,
            source: Address::decode(buf, SOURCE_ADDR)?,
            message_id: decode_cstring(buf, MESSAGE_ID)?,
            priority_flag: decode_u8(buf)?,
            schedule_delivery_time: decode_cstring(buf, SCHEDULE_DELIVERY_TIME)?,
            validity_period: decode_cstring(buf, VALIDITY_PERIOD)?,
            replace_if_present_flag: decode_u8(buf)?,
            data_coding: decode_u8(buf)?,
            sm_default_msg_id: decode_u8(buf)?,
            optional_parameters: decode_tlvs(buf)?,
        };

        if pdu.optional_parameters.get(tags::BROADCAST_AREA_IDENTIFIER).is_none() {
            return Err(CodecError::InvalidFieldValue {
                field: "broadcast_area_identifier",
                value: tags::BROADCAST_AREA_IDENTIFIER.into(),
                status: CommandStatus::ExpectedOptionalParameterMissing,
            });
        }
        Ok(pdu)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BroadcastSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
    pub optional_parameters: OptionalParameters,
}

impl_message_id_response!(BroadcastSmResponse, CommandId::BroadcastSmResp);
impl_frame_conversions!(boxed BroadcastSm, BroadcastSm);
impl_frame_conversions!(BroadcastSmResp, BroadcastSmResponse);
