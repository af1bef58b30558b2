use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_tlvs, decode_u8,
    encode_cstring,
};
use crate::datatypes::string_rules::{DESTINATION_ADDR_65, SERVICE_TYPE, SOURCE_ADDR_65};
use crate::datatypes::{Address, CommandId, CommandStatus, OptionalParameters};
use crate::macros::{impl_frame_conversions, impl_message_id_response};
use bytes::{BufMut, BytesMut};
use std::io::Cursor;

/// data_sm transfers data between the SMSC and the ESME in either
/// direction. User data travels in the message_payload TLV.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub service_type: String,
    pub source: Address,
    pub destination: Address,
    pub esm_class: u8,
    pub registered_delivery: u8,
    pub data_coding: u8,
    pub optional_parameters: OptionalParameters,
}

impl DataSm {
    pub fn new(source: impl Into<Address>, destination: impl Into<Address>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            service_type: String::new(),
            source: source.into(),
            destination: destination.into(),
            esm_class: 0,
            registered_delivery: 0,
            data_coding: 0,
            optional_parameters: OptionalParameters::new(),
        }
    }
}

impl Encodable for DataSm {
    fn command_id(&self) -> CommandId {
        CommandId::DataSm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::DataSm, self.command_status, self.sequence_number).encode(buf);
        encode_cstring(buf, &self.service_type, SERVICE_TYPE)?;
        self.source.encode(buf, SOURCE_ADDR_65)?;
        self.destination.encode(buf, DESTINATION_ADDR_65)?;
        buf.put_u8(self.esm_class);
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.data_coding);
        self.optional_parameters.encode(buf)
    }
}

impl Decodable for DataSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::DataSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            service_type: decode_cstring(buf, SERVICE_TYPE)?,
            source: Address::decode(buf, SOURCE_ADDR_65)?,
            destination: Address::decode(buf, DESTINATION_ADDR_65)?,
            esm_class: decode_u8(buf)?,
            registered_delivery: decode_u8(buf)?,
            data_coding: decode_u8(buf)?,
            optional_parameters: decode_tlvs(buf)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
    pub optional_parameters: OptionalParameters,
}

impl_message_id_response!(DataSmResponse, CommandId::DataSmResp);
impl_frame_conversions!(boxed DataSm, DataSm);
impl_frame_conversions!(DataSmResp, DataSmResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_pdu;
    use crate::datatypes::tlv::{Tlv, tags};

    #[test]
    fn data_sm_allows_long_addresses() {
        let mut pdu = DataSm::new("a".repeat(64).as_str(), "b".repeat(64).as_str());
        pdu.sequence_number = 8;
        pdu.optional_parameters =
            OptionalParameters::new().with(Tlv::new(tags::MESSAGE_PAYLOAD, vec![0x41; 300]));

        let decoded = DataSm::try_from(decode_pdu(&pdu.to_bytes().unwrap()).unwrap()).unwrap();
        assert_eq!(decoded.optional_parameters.message_payload().map(|p| p.len()), Some(300));
        assert_eq!(decoded, pdu);
    }

    #[test]
    fn data_sm_resp_with_delivery_failure() {
        let mut resp = DataSmResponse::new(8, "m1");
        resp.command_status = CommandStatus::DeliveryFailed;
        resp.optional_parameters = OptionalParameters::new()
            .with(Tlv::from_u8(tags::DELIVERY_FAILURE_REASON, 1));

        let decoded = DataSmResponse::try_from(decode_pdu(&resp.to_bytes().unwrap()).unwrap());
        assert_eq!(decoded.unwrap(), resp);
    }
}
