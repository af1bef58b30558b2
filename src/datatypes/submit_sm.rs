use crate::datatypes::{Address, CommandId, CommandStatus, OptionalParameters};
use crate::macros::{impl_frame_conversions, impl_message_id_response, impl_short_message_pdu};
use bytes::Bytes;

/// This operation is used by an ESME to submit a short message to the SMSC for onward transmission
/// to a specified short message entity (SME).
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// 4.1.1 service_type: SMS application service associated with the message. Empty for the
    ///       SMSC default.
    pub service_type: String,

    /// 4.1.2-4.1.4 source_addr_ton, source_addr_npi, source_addr.
    pub source: Address,

    /// 4.1.5-4.1.7 dest_addr_ton, dest_addr_npi, destination_addr.
    pub destination: Address,

    /// 4.1.8 esm_class: message mode and message type.
    pub esm_class: u8,

    /// 4.1.9 protocol_id: network specific protocol identifier.
    pub protocol_id: u8,

    /// 4.1.10 priority_flag: level 0 (lowest) to 3 (highest).
    pub priority_flag: u8,

    /// 4.1.11 schedule_delivery_time: empty for immediate delivery, otherwise a 16 character
    ///        absolute or relative time.
    pub schedule_delivery_time: String,

    /// 4.1.12 validity_period: empty for the SMSC default, same format as
    ///        schedule_delivery_time.
    pub validity_period: String,

    /// 4.1.13 registered_delivery: receipt and acknowledgement requests.
    pub registered_delivery: u8,

    /// 4.1.14 replace_if_present_flag
    pub replace_if_present_flag: u8,

    /// 4.1.15 data_coding: encoding scheme of the short message user data.
    pub data_coding: u8,

    /// 4.1.16 sm_default_msg_id: index of a canned message, 0 if not used.
    pub sm_default_msg_id: u8,

    /// 4.1.18 short_message: up to 254 octets of user data. Longer payloads go in the
    ///        message_payload TLV with an empty short_message.
    pub short_message: Bytes,

    pub optional_parameters: OptionalParameters,
}

impl SubmitSm {
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

    /// Request an SMSC delivery receipt.
    pub fn with_delivery_receipt(mut self) -> Self {
        self.registered_delivery |= 0x01;
        self
    }
}

/// submit_sm_resp carries the SMSC assigned message_id.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
    pub optional_parameters: OptionalParameters,
}

impl_short_message_pdu!(SubmitSm, CommandId::SubmitSm);
impl_message_id_response!(SubmitSmResponse, CommandId::SubmitSmResp);
impl_frame_conversions!(boxed SubmitSm, SubmitSm);
impl_frame_conversions!(SubmitSmResp, SubmitSmResponse);
