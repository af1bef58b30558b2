use crate::codec::{CodecError, Decodable, Encodable, PduHeader, decode_tlvs};
use crate::datatypes::string_rules::{ESME_ADDR, SOURCE_ADDR_65};
use crate::datatypes::{Address, CommandId, CommandStatus, OptionalParameters};
use crate::macros::impl_frame_conversions;
use bytes::BytesMut;
use std::io::Cursor;

/// alert_notification is sent by the SMSC when a mobile subscriber it had
/// flagged (set_dpf) becomes available again. It has no response.
#[derive(Clone, Debug, PartialEq)]
pub struct AlertNotification {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    /// The mobile station that became available
    pub source: Address,
    /// The ESME that asked to be alerted
    pub esme: Address,
    /// Usually carries ms_availability_status
    pub optional_parameters: OptionalParameters,
}

impl AlertNotification {
    pub fn new(source: impl Into<Address>, esme: impl Into<Address>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            source: source.into(),
            esme: esme.into(),
            optional_parameters: OptionalParameters::new(),
        }
    }
}

impl Encodable for AlertNotification {
    fn command_id(&self) -> CommandId {
        CommandId::AlertNotification
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::AlertNotification, self.command_status, self.sequence_number)
            .encode(buf);
        self.source.encode(buf, SOURCE_ADDR_65)?;
        self.esme.encode(buf, ESME_ADDR)?;
        self.optional_parameters.encode(buf)
    }
}

impl Decodable for AlertNotification {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::AlertNotification]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            source: Address::decode(buf, SOURCE_ADDR_65)?,
            esme: Address::decode(buf, ESME_ADDR)?,
            optional_parameters: decode_tlvs(buf)?,
        })
    }
}

impl_frame_conversions!(AlertNotification, AlertNotification);
