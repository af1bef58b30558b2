use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_tlvs, decode_u8,
    encode_cstring, response_body_absent,
};
use crate::datatypes::string_rules::{ADDRESS_RANGE, PASSWORD, SYSTEM_ID, SYSTEM_TYPE};
use crate::datatypes::tlv::{Tlv, tags};
use crate::datatypes::{Address, CommandId, CommandStatus, InterfaceVersion, OptionalParameters};
use crate::macros::impl_frame_conversions;
use bytes::{BufMut, BytesMut};
use std::fmt;
use std::io::Cursor;

/// Which of the three bind commands was used, and so which direction of
/// traffic the session carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindType {
    Transmitter,
    Receiver,
    Transceiver,
}

impl BindType {
    pub fn command_id(&self) -> CommandId {
        match self {
            BindType::Transmitter => CommandId::BindTransmitter,
            BindType::Receiver => CommandId::BindReceiver,
            BindType::Transceiver => CommandId::BindTransceiver,
        }
    }

    pub fn response_command_id(&self) -> CommandId {
        match self {
            BindType::Transmitter => CommandId::BindTransmitterResp,
            BindType::Receiver => CommandId::BindReceiverResp,
            BindType::Transceiver => CommandId::BindTransceiverResp,
        }
    }

    pub fn from_command_id(command_id: CommandId) -> Option<Self> {
        match command_id {
            CommandId::BindTransmitter | CommandId::BindTransmitterResp => {
                Some(BindType::Transmitter)
            }
            CommandId::BindReceiver | CommandId::BindReceiverResp => Some(BindType::Receiver),
            CommandId::BindTransceiver | CommandId::BindTransceiverResp => {
                Some(BindType::Transceiver)
            }
            _ => None,
        }
    }

    /// Whether the ESME may submit messages on this bind.
    pub fn can_transmit(&self) -> bool {
        matches!(self, BindType::Transmitter | BindType::Transceiver)
    }

    /// Whether the SMSC may deliver messages to the ESME on this bind.
    pub fn can_receive(&self) -> bool {
        matches!(self, BindType::Receiver | BindType::Transceiver)
    }
}

impl fmt::Display for BindType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BindType::Transmitter => "transmitter",
            BindType::Receiver => "receiver",
            BindType::Transceiver => "transceiver",
        };
        f.write_str(name)
    }
}

/// bind_transmitter, bind_receiver or bind_transceiver. The three commands
/// share one body layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Bind {
    pub bind_type: BindType,
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// 5.2.1 system_id: identification of the ESME requesting to bind.
    pub system_id: String,

    /// 5.2.2 password used by the SMSC to authenticate the ESME.
    pub password: String,

    /// 5.2.3 system_type: categorizes the type of ESME, e.g. "VMS" or "OTA".
    pub system_type: String,

    /// 5.2.4 interface_version: SMPP version supported by the ESME.
    pub interface_version: InterfaceVersion,

    /// 5.2.5-5.2.7 addr_ton, addr_npi and address_range of the SMEs served
    /// by the ESME.
    pub address_range: Address,
}

impl Bind {
    pub fn new(
        bind_type: BindType,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            bind_type,
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            system_id: system_id.into(),
            password: password.into(),
            system_type: String::new(),
            interface_version: InterfaceVersion::SmppV34,
            address_range: Address::default(),
        }
    }
}

impl Encodable for Bind {
    fn command_id(&self) -> CommandId {
        self.bind_type.command_id()
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(self.command_id(), self.command_status, self.sequence_number).encode(buf);
        encode_cstring(buf, &self.system_id, SYSTEM_ID)?;
        encode_cstring(buf, &self.password, PASSWORD)?;
        encode_cstring(buf, &self.system_type, SYSTEM_TYPE)?;
        buf.put_u8(self.interface_version as u8);
        self.address_range.encode(buf, ADDRESS_RANGE)
    }
}

impl Decodable for Bind {
    fn command_ids() -> &'static [CommandId] {
        &[
            CommandId::BindTransmitter,
            CommandId::BindReceiver,
            CommandId::BindTransceiver,
        ]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let bind_type = BindType::from_command_id(header.command_id).ok_or(
            CodecError::UnexpectedCommandId {
                expected: Self::command_ids(),
                actual: header.command_id,
            },
        )?;

        Ok(Self {
            bind_type,
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id: decode_cstring(buf, SYSTEM_ID)?,
            password: decode_cstring(buf, PASSWORD)?,
            system_type: decode_cstring(buf, SYSTEM_TYPE)?,
            interface_version: InterfaceVersion::from_octet(decode_u8(buf)?),
            address_range: Address::decode(buf, ADDRESS_RANGE)?,
        })
    }
}

/// Response to any of the bind commands.
///
/// A negative response usually arrives header-only; `system_id` is then
/// empty.
#[derive(Clone, Debug, PartialEq)]
pub struct BindResponse {
    pub bind_type: BindType,
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// Identifies the SMSC to the ESME.
    pub system_id: String,

    /// Carries sc_interface_version when the SMSC supports 3.4 or later.
    pub optional_parameters: OptionalParameters,
}

impl BindResponse {
    pub fn new(bind_type: BindType, sequence_number: u32, system_id: impl Into<String>) -> Self {
        Self {
            bind_type,
            command_status: CommandStatus::Ok,
            sequence_number,
            system_id: system_id.into(),
            optional_parameters: OptionalParameters::new(),
        }
    }

    pub fn error(bind_type: BindType, sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            ..Self::new(bind_type, sequence_number, "")
        }
    }

    pub fn with_interface_version(mut self, version: InterfaceVersion) -> Self {
        self.optional_parameters
            .set(Tlv::from_u8(tags::SC_INTERFACE_VERSION, version as u8));
        self
    }

    /// The version advertised by the SMSC, if any.
    pub fn sc_interface_version(&self) -> Option<InterfaceVersion> {
        self.optional_parameters
            .sc_interface_version()
            .map(InterfaceVersion::from_octet)
    }
}

impl Encodable for BindResponse {
    fn command_id(&self) -> CommandId {
        self.bind_type.response_command_id()
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(self.command_id(), self.command_status, self.sequence_number).encode(buf);
        if !self.command_status.is_ok() && self.system_id.is_empty() {
            return Ok(());
        }
        encode_cstring(buf, &self.system_id, SYSTEM_ID)?;
        self.optional_parameters.encode(buf)
    }
}

impl Decodable for BindResponse {
    fn command_ids() -> &'static [CommandId] {
        &[
            CommandId::BindTransmitterResp,
            CommandId::BindReceiverResp,
            CommandId::BindTransceiverResp,
        ]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let bind_type = BindType::from_command_id(header.command_id).ok_or(
            CodecError::UnexpectedCommandId {
                expected: Self::command_ids(),
                actual: header.command_id,
            },
        )?;
        if response_body_absent(&header, buf) {
            return Ok(Self::error(bind_type, header.sequence_number, header.command_status));
        }

        Ok(Self {
            bind_type,
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id: decode_cstring(buf, SYSTEM_ID)?,
            optional_parameters: decode_tlvs(buf)?,
        })
    }
}

impl_frame_conversions!(Bind, Bind);
impl_frame_conversions!(BindResp, BindResponse);

impl Default for Bind {
    fn default() -> Self {
        Self::new(BindType::Transceiver, "", "")
    }
}
