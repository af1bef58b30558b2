use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_short_message,
    decode_tlvs, decode_u8, decode_u32, encode_cstring, encode_short_message,
    response_body_absent,
};
use crate::datatypes::string_rules::{
    DESTINATION_ADDR, DL_NAME, MESSAGE_ID, SCHEDULE_DELIVERY_TIME, SERVICE_TYPE, SOURCE_ADDR,
    VALIDITY_PERIOD,
};
use crate::datatypes::{Address, CommandId, CommandStatus, OptionalParameters};
use crate::macros::impl_frame_conversions;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// Upper bound on destinations in one submit_multi.
pub const MAX_DESTINATIONS: usize = 254;

const DEST_FLAG_SME_ADDRESS: u8 = 0x01;
const DEST_FLAG_DISTRIBUTION_LIST: u8 = 0x02;

/// One entry of the dest_address list.
#[derive(Clone, Debug, PartialEq)]
pub enum Destination {
    SmeAddress(Address),
    DistributionList(String),
}

impl Destination {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        match self {
            Destination::SmeAddress(address) => {
                buf.put_u8(DEST_FLAG_SME_ADDRESS);
                address.encode(buf, DESTINATION_ADDR)
            }
            Destination::DistributionList(name) => {
                buf.put_u8(DEST_FLAG_DISTRIBUTION_LIST);
                encode_cstring(buf, name, DL_NAME)
            }
        }
    }

    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        match decode_u8(buf)? {
            DEST_FLAG_SME_ADDRESS => Ok(Destination::SmeAddress(Address::decode(
                buf,
                DESTINATION_ADDR,
            )?)),
            DEST_FLAG_DISTRIBUTION_LIST => {
                Ok(Destination::DistributionList(decode_cstring(buf, DL_NAME)?))
            }
            other => Err(CodecError::FieldValidation {
                field: "dest_flag",
                reason: format!("unknown dest_flag {other:#04x}"),
            }),
        }
    }
}

/// submit_multi submits one short message to several destinations,
/// SME addresses or SMSC distribution lists.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitMulti {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub service_type: String,
    pub source: Address,
    pub destinations: Vec<Destination>,
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

impl SubmitMulti {
    pub fn new(
        source: impl Into<Address>,
        destinations: Vec<Destination>,
        short_message: impl Into<Bytes>,
    ) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            service_type: String::new(),
            source: source.into(),
            destinations,
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
}

impl Encodable for SubmitMulti {
    fn command_id(&self) -> CommandId {
        CommandId::SubmitMulti
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        if self.destinations.is_empty() || self.destinations.len() > MAX_DESTINATIONS {
            return Err(CodecError::FieldValidation {
                field: "number_of_dests",
                reason: format!(
                    "{} destinations, must be 1-{MAX_DESTINATIONS}",
                    self.destinations.len()
                ),
            });
        }

        PduHeader::new(CommandId::SubmitMulti, self.command_status, self.sequence_number)
            .encode(buf);
        encode_cstring(buf, &self.service_type, SERVICE_TYPE)?;
        self.source.encode(buf, SOURCE_ADDR)?;
        buf.put_u8(self.destinations.len() as u8);
        for destination in &self.destinations {
            destination.encode(buf)?;
        }
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag);
        encode_cstring(buf, &self.schedule_delivery_time, SCHEDULE_DELIVERY_TIME)?;
        encode_cstring(buf, &self.validity_period, VALIDITY_PERIOD)?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.replace_if_present_flag);
        buf.put_u8(self.data_coding);
        buf.put_u8(self.sm_default_msg_id);
        encode_short_message(buf, &self.short_message)?;
        self.optional_parameters.encode(buf)
    }
}

impl Decodable for SubmitMulti {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::SubmitMulti]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let service_type = decode_cstring(buf, SERVICE_TYPE)?;
        let source = Address::decode(buf, SOURCE_ADDR)?;

        let number_of_dests = decode_u8(buf)? as usize;
        if number_of_dests == 0 || number_of_dests > MAX_DESTINATIONS {
            return Err(CodecError::FieldValidation {
                field: "number_of_dests",
                reason: format!("{number_of_dests} destinations, must be 1-{MAX_DESTINATIONS}"),
            });
        }
        let destinations = (0..number_of_dests)
            .map(|_| Destination::decode(buf))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            service_type,
            source,
            destinations,
            esm_class: decode_u8(buf)?,
            protocol_id: decode_u8(buf)?,
            priority_flag: decode_u8(buf)?,
            schedule_delivery_time: decode_cstring(buf, SCHEDULE_DELIVERY_TIME)?,
            validity_period: decode_cstring(buf, VALIDITY_PERIOD)?,
            registered_delivery: decode_u8(buf)?,
            replace_if_present_flag: decode_u8(buf)?,
            data_coding: decode_u8(buf)?,
            sm_default_msg_id: decode_u8(buf)?,
            short_message: decode_short_message(buf)?,
            optional_parameters: decode_tlvs(buf)?,
        })
    }
}

/// A destination the SMSC could not accept, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct UnsuccessfulDelivery {
    pub address: Address,
    pub error_status_code: CommandStatus,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitMultiResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
    pub unsuccessful: Vec<UnsuccessfulDelivery>,
    pub optional_parameters: OptionalParameters,
}

impl SubmitMultiResponse {
    pub fn new(sequence_number: u32, message_id: impl Into<String>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: message_id.into(),
            unsuccessful: Vec::new(),
            optional_parameters: OptionalParameters::new(),
        }
    }

    pub fn error(sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            ..Self::new(sequence_number, "")
        }
    }
}

impl Encodable for SubmitMultiResponse {
    fn command_id(&self) -> CommandId {
        CommandId::SubmitMultiResp
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::SubmitMultiResp, self.command_status, self.sequence_number)
            .encode(buf);
        if !self.command_status.is_ok() && self.message_id.is_empty() && self.unsuccessful.is_empty()
        {
            return Ok(());
        }
        if self.unsuccessful.len() > MAX_DESTINATIONS {
            return Err(CodecError::FieldValidation {
                field: "no_unsuccess",
                reason: format!("{} entries, at most {MAX_DESTINATIONS}", self.unsuccessful.len()),
            });
        }
        encode_cstring(buf, &self.message_id, MESSAGE_ID)?;
        buf.put_u8(self.unsuccessful.len() as u8);
        for entry in &self.unsuccessful {
            entry.address.encode(buf, DESTINATION_ADDR)?;
            buf.put_u32(entry.error_status_code.code());
        }
        self.optional_parameters.encode(buf)
    }
}

impl Decodable for SubmitMultiResponse {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::SubmitMultiResp]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if response_body_absent(&header, buf) {
            return Ok(Self::error(header.sequence_number, header.command_status));
        }
        let message_id = decode_cstring(buf, MESSAGE_ID)?;
        let no_unsuccess = decode_u8(buf)?;
        let unsuccessful = (0..no_unsuccess)
            .map(|_| {
                Ok(UnsuccessfulDelivery {
                    address: Address::decode(buf, DESTINATION_ADDR)?,
                    error_status_code: CommandStatus::from_code(decode_u32(buf)?),
                })
            })
            .collect::<Result<Vec<_>, CodecError>>()?;

        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
            unsuccessful,
            optional_parameters: decode_tlvs(buf)?,
        })
    }
}

impl_frame_conversions!(boxed SubmitMulti, SubmitMulti);
impl_frame_conversions!(SubmitMultiResp, SubmitMultiResponse);
