use crate::codec::{CodecError, Decodable, Encodable, PduHeader, decode_cstring, encode_cstring};
use crate::datatypes::string_rules::{DESTINATION_ADDR, MESSAGE_ID, SERVICE_TYPE, SOURCE_ADDR};
use crate::datatypes::{Address, CommandId, CommandStatus};
use crate::macros::{impl_complete_header_only_pdu, impl_frame_conversions};
use bytes::BytesMut;
use std::io::Cursor;

/// cancel_sm cancels one or more outstanding short messages.
///
/// With a message_id only that message is cancelled; with an empty
/// message_id every message matching the addresses (and service_type, if
/// given) is cancelled.
#[derive(Clone, Debug, PartialEq)]
pub struct CancelSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub service_type: String,
    pub message_id: String,
    pub source: Address,
    pub destination: Address,
}

impl CancelSm {
    pub fn new(
        message_id: impl Into<String>,
        source: impl Into<Address>,
        destination: impl Into<Address>,
    ) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            service_type: String::new(),
            message_id: message_id.into(),
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl Encodable for CancelSm {
    fn command_id(&self) -> CommandId {
        CommandId::CancelSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::CancelSm, self.command_status, self.sequence_number).encode(buf);
        encode_cstring(buf, &self.service_type, SERVICE_TYPE)?;
        encode_cstring(buf, &self.message_id, MESSAGE_ID)?;
        self.source.encode(buf, SOURCE_ADDR)?;
        self.destination.encode(buf, DESTINATION_ADDR)
    }
}

impl Decodable for CancelSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::CancelSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            service_type: decode_cstring(buf, SERVICE_TYPE)?,
            message_id: decode_cstring(buf, MESSAGE_ID)?,
            source: Address::decode(buf, SOURCE_ADDR)?,
            destination: Address::decode(buf, DESTINATION_ADDR)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CancelSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(CancelSmResponse, CommandId::CancelSmResp);
impl_frame_conversions!(CancelSm, CancelSm);
impl_frame_conversions!(CancelSmResp, CancelSmResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_pdu;

    #[test]
    fn cancel_sm_round_trip() {
        let mut pdu = CancelSm::new("", "1111", "2222");
        pdu.service_type = "WAP".into();
        pdu.sequence_number = 40;
        let decoded = CancelSm::try_from(decode_pdu(&pdu.to_bytes().unwrap()).unwrap()).unwrap();
        assert_eq!(decoded, pdu);
    }
}
