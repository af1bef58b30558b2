use crate::datatypes::{Address, CommandId, CommandStatus, OptionalParameters};
use crate::macros::{impl_frame_conversions, impl_message_id_response, impl_short_message_pdu};
use bytes::Bytes;

const ESM_CLASS_TYPE_MASK: u8 = 0b0011_1100;
const ESM_CLASS_DELIVERY_RECEIPT: u8 = 0b0000_0100;

/// deliver_sm is issued by the SMSC to send a message to an ESME: mobile
/// originated traffic or a delivery receipt for an earlier submission.
///
/// The body layout is the one used by submit_sm; schedule_delivery_time,
/// validity_period and replace_if_present_flag are unused and left empty.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub service_type: String,
    pub source: Address,
    pub destination: Address,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,
    pub optional_parameters: OptionalParameters,
}

impl DeliverSm {
    pub fn new(
        source: impl Into<Address>,
        destination: impl Into<Address>,
        short_message: impl Into<Bytes>,
    ) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            service_type: String::new(),
            source: source.into(),
            destination: destination.into(),
            esm_class: 0,
            protocol_id: 0,
            priority_flag: 0,
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            registered_delivery: 0,
            replace_if_present_flag: 0,
            data_coding: 0,
            sm_default_msg_id: 0,
            short_message: short_message.into(),
            optional_parameters: OptionalParameters::new(),
        }
    }

    /// Whether esm_class marks this as an SMSC delivery receipt.
    pub fn is_delivery_receipt(&self) -> bool {
        self.esm_class & ESM_CLASS_TYPE_MASK == ESM_CLASS_DELIVERY_RECEIPT
    }
}

/// deliver_sm_resp. The message_id field is unused and normally empty.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
    pub optional_parameters: OptionalParameters,
}

impl_short_message_pdu!(DeliverSm, CommandId::DeliverSm);
impl_message_id_response!(DeliverSmResponse, CommandId::DeliverSmResp);
impl_frame_conversions!(boxed DeliverSm, DeliverSm);
impl_frame_conversions!(DeliverSmResp, DeliverSmResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Encodable, decode_pdu};
    use crate::datatypes::tlv::{Tlv, tags};

    #[test]
    fn delivery_receipt_round_trip() {
        let mut pdu = DeliverSm::new("447700900002", "447700900001", b"id:abc stat:DELIVRD".to_vec());
        pdu.sequence_number = 3;
        pdu.esm_class = 0x04;
        pdu.optional_parameters = OptionalParameters::new()
            .with(Tlv::from_cstring(tags::RECEIPTED_MESSAGE_ID, "abc"))
            .with(Tlv::from_u8(tags::MESSAGE_STATE, 2));

        let decoded = DeliverSm::try_from(decode_pdu(&pdu.to_bytes().unwrap()).unwrap()).unwrap();
        assert!(decoded.is_delivery_receipt());
        assert_eq!(decoded.optional_parameters.receipted_message_id().as_deref(), Some("abc"));
        assert_eq!(decoded, pdu);
    }

    #[test]
    fn empty_response_body() {
        let resp = DeliverSmResponse::new(3, "");
        let bytes = resp.to_bytes().unwrap();
        // header plus the NUL of an empty message_id
        assert_eq!(bytes.len(), 17);
        assert_eq!(DeliverSmResponse::try_from(decode_pdu(&bytes).unwrap()).unwrap(), resp);
    }
}
