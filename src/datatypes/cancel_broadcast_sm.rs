use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_tlvs, encode_cstring,
};
use crate::datatypes::string_rules::{MESSAGE_ID, SERVICE_TYPE, SOURCE_ADDR};
use crate::datatypes::{Address, CommandId, CommandStatus, OptionalParameters};
use crate::macros::{impl_complete_header_only_pdu, impl_frame_conversions};
use bytes::BytesMut;
use std::io::Cursor;

/// cancel_broadcast_sm cancels one or more outstanding broadcast messages.
#[derive(Clone, Debug, PartialEq)]
pub struct CancelBroadcastSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub service_type: String,
    pub message_id: String,
    pub source: Address,
    pub optional_parameters: OptionalParameters,
}

impl CancelBroadcastSm {
    pub fn new(message_id: impl Into<String>, source: impl Into<Address>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            service_type: String::new(),
            message_id: message_id.into(),
            source: source.into(),
            optional_parameters: OptionalParameters::new(),
        }
    }
}

impl Encodable for CancelBroadcastSm {
    fn command_id(&self) -> CommandId {
        CommandId::CancelBroadcastSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::CancelBroadcastSm, self.command_status, self.sequence_number)
            .encode(buf);
        encode_cstring(buf, &self.service_type, SERVICE_TYPE)?;
        encode_cstring(buf, &self.message_id, MESSAGE_ID)?;
        self.source.encode(buf, SOURCE_ADDR)?;
        self.optional_parameters.encode(buf)
    }
}

impl Decodable for CancelBroadcastSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::CancelBroadcastSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            service_type: decode_cstring(buf, SERVICE_TYPE)?,
            message_id: decode_cstring(buf, MESSAGE_ID)?,
            source: Address::decode(buf, SOURCE_ADDR)?,
            optional_parameters: decode_tlvs(buf)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CancelBroadcastSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(CancelBroadcastSmResponse, CommandId::CancelBroadcastSmResp);
impl_frame_conversions!(CancelBroadcastSm, CancelBroadcastSm);
impl_frame_conversions!(CancelBroadcastSmResp, CancelBroadcastSmResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_pdu;

    #[test]
    fn cancel_broadcast_round_trip() {
        let mut pdu = CancelBroadcastSm::new("b-1", "1111");
        pdu.service_type = "CBS".into();
        pdu.sequence_number = 6;
        let decoded =
            CancelBroadcastSm::try_from(decode_pdu(&pdu.to_bytes().unwrap()).unwrap()).unwrap();
        assert_eq!(decoded, pdu);
    }
}
