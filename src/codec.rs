// SMPP codec - separates parsing/encoding logic from domain models
//
// Each PDU implements Encodable/Decodable rather than having all parsing
// logic in a monolithic frame parser. The registry maps command ids to body
// decoders and `decode_pdu` is the single entry point used by the session
// reader.

use crate::datatypes::string_rules::{self, StringRule, StringValidationError};
use crate::datatypes::{CommandId, CommandStatus, OptionalParameters};
use crate::frame::Frame;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::LazyLock;
use thiserror::Error;

/// Maximum allowed PDU size to prevent memory exhaustion attacks
pub const MAX_PDU_SIZE: u32 = 65536; // 64KB

/// PDU header (16 bytes, common to all PDUs)
#[derive(Debug, Clone, PartialEq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: CommandId,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = 16;

    /// Header for a PDU about to be encoded; the length is backpatched later.
    pub fn new(command_id: CommandId, command_status: CommandStatus, sequence_number: u32) -> Self {
        Self {
            command_length: 0,
            command_id,
            command_status,
            sequence_number,
        }
    }

    /// Decode PDU header from buffer.
    ///
    /// An unknown command id is reported together with the sequence number
    /// so the receiver can still answer it with a generic_nack.
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::Incomplete);
        }

        let command_length = buf.get_u32();
        let command_id_raw = buf.get_u32();
        let command_status_raw = buf.get_u32();
        let sequence_number = buf.get_u32();

        if command_length < Self::SIZE as u32 || command_length > MAX_PDU_SIZE {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: Self::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }

        let command_id =
            CommandId::try_from(command_id_raw).map_err(|_| CodecError::InvalidCommandId {
                command_id: command_id_raw,
                sequence_number,
            })?;

        Ok(PduHeader {
            command_length,
            command_id,
            command_status: CommandStatus::from_code(command_status_raw),
            sequence_number,
        })
    }

    /// Encode PDU header to buffer
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.command_length);
        buf.put_u32(self.command_id as u32);
        buf.put_u32(self.command_status as u32);
        buf.put_u32(self.sequence_number);
    }
}

/// Trait for types that can be encoded to bytes
pub trait Encodable {
    /// The command_id written into the header
    fn command_id(&self) -> CommandId;

    /// Encode this PDU (header and body) to the buffer
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError>;

    /// Convert this PDU to wire bytes.
    ///
    /// Encodes with a placeholder command_length and backpatches it once the
    /// body size is known.
    fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::with_capacity(64);
        self.encode(&mut buf)?;

        let length = buf.len();
        if length < PduHeader::SIZE || length > MAX_PDU_SIZE as usize {
            return Err(CodecError::InvalidPduLength {
                length: length as u32,
                min: PduHeader::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }
        buf[0..4].copy_from_slice(&(length as u32).to_be_bytes());

        Ok(buf.freeze())
    }
}

/// Trait for types that can be decoded from bytes
pub trait Decodable: Sized {
    /// Decode this PDU from the buffer after header
    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError>;

    /// The command_ids this type decodes
    fn command_ids() -> &'static [CommandId];

    /// Validate the header is appropriate for this PDU type
    fn validate_header(header: &PduHeader) -> Result<(), CodecError> {
        if !Self::command_ids().contains(&header.command_id) {
            return Err(CodecError::UnexpectedCommandId {
                expected: Self::command_ids(),
                actual: header.command_id,
            });
        }
        Ok(())
    }
}

/// Codec errors with detailed context for debugging
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Incomplete PDU: need more data")]
    Incomplete,

    #[error("Invalid command_id: {command_id:#010x} (sequence {sequence_number})")]
    InvalidCommandId {
        command_id: u32,
        sequence_number: u32,
    },

    #[error("Invalid PDU length: {length}, must be {min}-{max}")]
    InvalidPduLength { length: u32, min: u32, max: u32 },

    #[error("command_length {declared} does not match the {actual} bytes read")]
    LengthMismatch { declared: u32, actual: usize },

    #[error("Unexpected command_id: expected one of {expected:?}, got {actual:?}")]
    UnexpectedCommandId {
        expected: &'static [CommandId],
        actual: CommandId,
    },

    #[error("Field '{field}' has invalid value {value:#x}")]
    InvalidFieldValue {
        field: &'static str,
        value: u32,
        status: CommandStatus,
    },

    #[error("Field '{field}' validation failed: {reason}")]
    FieldValidation { field: &'static str, reason: String },

    #[error(transparent)]
    StringValidation(#[from] StringValidationError),

    #[error("TLV parsing error: {0}")]
    Tlv(String),
}

/// Convert codec errors to appropriate SMPP command_status codes
impl CodecError {
    pub fn to_command_status(&self) -> CommandStatus {
        match self {
            CodecError::InvalidPduLength { .. } | CodecError::LengthMismatch { .. } => {
                CommandStatus::InvalidCommandLength
            }
            CodecError::Incomplete => CommandStatus::InvalidCommandLength,
            CodecError::InvalidCommandId { .. } => CommandStatus::InvalidCommandId,
            CodecError::InvalidFieldValue { status, .. } => *status,
            CodecError::StringValidation(err) => err.command_status(),
            CodecError::Tlv(_) => CommandStatus::ErrorInOptionalPartofPduBody,
            CodecError::FieldValidation { field, .. } => match *field {
                "number_of_dests" => CommandStatus::InvalidNumberOfDestinations,
                "dest_flag" => CommandStatus::InvalidDestinationFlag,
                _ => CommandStatus::SystemError,
            },
            CodecError::UnexpectedCommandId { .. } => CommandStatus::SystemError,
        }
    }
}

/// Decode a NUL terminated Latin-1 string, enforcing the field rule.
pub fn decode_cstring(buf: &mut Cursor<&[u8]>, rule: StringRule) -> Result<String, CodecError> {
    let chunk = buf.chunk();
    let window = &chunk[..chunk.len().min(rule.max)];
    let Some(end) = window.iter().position(|&b| b == 0) else {
        return Err(StringValidationError::Unterminated {
            field: rule.field,
            max: rule.max,
        }
        .into());
    };

    rule.check_len(end)?;
    let value = string_rules::from_latin1(&chunk[..end]);
    buf.advance(end + 1);
    Ok(value)
}

/// Encode a NUL terminated Latin-1 string, enforcing the field rule.
pub fn encode_cstring(buf: &mut BytesMut, value: &str, rule: StringRule) -> Result<(), CodecError> {
    let bytes = rule.encode(value)?;
    buf.put_slice(&bytes);
    buf.put_u8(0);
    Ok(())
}

/// Decode sm_length followed by that many octets of short_message.
pub fn decode_short_message(buf: &mut Cursor<&[u8]>) -> Result<Bytes, CodecError> {
    let sm_length = decode_u8(buf)? as usize;
    string_rules::SHORT_MESSAGE.check_len(sm_length)?;
    if buf.remaining() < sm_length {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.copy_to_bytes(sm_length))
}

pub fn encode_short_message(buf: &mut BytesMut, message: &[u8]) -> Result<(), CodecError> {
    string_rules::SHORT_MESSAGE.check_len(message.len())?;
    buf.put_u8(message.len() as u8);
    buf.put_slice(message);
    Ok(())
}

/// Decode a single byte
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer
pub fn decode_u16(buf: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u16())
}

/// Decode a 32-bit big-endian integer
pub fn decode_u32(buf: &mut Cursor<&[u8]>) -> Result<u32, CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u32())
}

/// Everything left in the PDU body, parsed as optional parameters.
pub fn decode_tlvs(buf: &mut Cursor<&[u8]>) -> Result<OptionalParameters, CodecError> {
    let rest = buf.copy_to_bytes(buf.remaining());
    OptionalParameters::decode(rest)
}

/// Negative responses are header-only on the wire, so a response body is
/// only required when the status is ESME_ROK.
pub fn response_body_absent(header: &PduHeader, buf: &Cursor<&[u8]>) -> bool {
    !header.command_status.is_ok() && !buf.has_remaining()
}

/// Header-only PDU for a raw command id, used to answer requests whose body
/// could not be decoded.
pub fn header_only_bytes(command_id: u32, command_status: CommandStatus, sequence_number: u32) -> Bytes {
    let mut buf = BytesMut::with_capacity(PduHeader::SIZE);
    buf.put_u32(PduHeader::SIZE as u32);
    buf.put_u32(command_id);
    buf.put_u32(command_status as u32);
    buf.put_u32(sequence_number);
    buf.freeze()
}

/// Decode one complete PDU.
///
/// The declared command_length must equal the number of bytes supplied; the
/// body is not touched otherwise.
pub fn decode_pdu(bytes: &[u8]) -> Result<Frame, CodecError> {
    if bytes.len() < 4 {
        return Err(CodecError::Incomplete);
    }
    let declared = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if declared as usize != bytes.len() {
        return Err(CodecError::LengthMismatch {
            declared,
            actual: bytes.len(),
        });
    }

    let mut cursor = Cursor::new(bytes);
    let header = PduHeader::decode(&mut cursor)?;
    registry().decode_pdu(header, &mut cursor)
}

/// Registry of PDU decoders for extensible parsing
type DecoderFn =
    Box<dyn Fn(PduHeader, &mut Cursor<&[u8]>) -> Result<Frame, CodecError> + Send + Sync>;

pub struct PduRegistry {
    decoders: HashMap<CommandId, DecoderFn>,
}

static REGISTRY: LazyLock<PduRegistry> = LazyLock::new(PduRegistry::new);

/// The process-wide registry with every known PDU registered.
pub fn registry() -> &'static PduRegistry {
    &REGISTRY
}

impl PduRegistry {
    /// Create a new registry with every SMPP 3.4 and 5.0 broadcast PDU registered
    pub fn new() -> Self {
        use crate::datatypes::*;

        let mut registry = Self {
            decoders: HashMap::new(),
        };

        registry.register_pdu::<GenericNack, _>(Frame::GenericNack);
        registry.register_pdu::<EnquireLink, _>(Frame::EnquireLink);
        registry.register_pdu::<EnquireLinkResponse, _>(Frame::EnquireLinkResp);
        registry.register_pdu::<Unbind, _>(Frame::Unbind);
        registry.register_pdu::<UnbindResponse, _>(Frame::UnbindResp);
        registry.register_pdu::<Outbind, _>(Frame::Outbind);

        registry.register_pdu::<Bind, _>(Frame::Bind);
        registry.register_pdu::<BindResponse, _>(Frame::BindResp);

        registry.register_pdu::<SubmitSm, _>(|pdu| Frame::SubmitSm(Box::new(pdu)));
        registry.register_pdu::<SubmitSmResponse, _>(Frame::SubmitSmResp);
        registry.register_pdu::<DeliverSm, _>(|pdu| Frame::DeliverSm(Box::new(pdu)));
        registry.register_pdu::<DeliverSmResponse, _>(Frame::DeliverSmResp);
        registry.register_pdu::<DataSm, _>(|pdu| Frame::DataSm(Box::new(pdu)));
        registry.register_pdu::<DataSmResponse, _>(Frame::DataSmResp);
        registry.register_pdu::<SubmitMulti, _>(|pdu| Frame::SubmitMulti(Box::new(pdu)));
        registry.register_pdu::<SubmitMultiResponse, _>(Frame::SubmitMultiResp);

        registry.register_pdu::<QuerySm, _>(Frame::QuerySm);
        registry.register_pdu::<QuerySmResponse, _>(Frame::QuerySmResp);
        registry.register_pdu::<CancelSm, _>(Frame::CancelSm);
        registry.register_pdu::<CancelSmResponse, _>(Frame::CancelSmResp);
        registry.register_pdu::<ReplaceSm, _>(|pdu| Frame::ReplaceSm(Box::new(pdu)));
        registry.register_pdu::<ReplaceSmResponse, _>(Frame::ReplaceSmResp);

        registry.register_pdu::<AlertNotification, _>(Frame::AlertNotification);

        registry.register_pdu::<BroadcastSm, _>(|pdu| Frame::BroadcastSm(Box::new(pdu)));
        registry.register_pdu::<BroadcastSmResponse, _>(Frame::BroadcastSmResp);
        registry.register_pdu::<QueryBroadcastSm, _>(Frame::QueryBroadcastSm);
        registry.register_pdu::<QueryBroadcastSmResponse, _>(Frame::QueryBroadcastSmResp);
        registry.register_pdu::<CancelBroadcastSm, _>(Frame::CancelBroadcastSm);
        registry.register_pdu::<CancelBroadcastSmResponse, _>(Frame::CancelBroadcastSmResp);

        registry
    }

    /// Register a PDU type under every command id it decodes
    fn register_pdu<T, F>(&mut self, frame_constructor: F)
    where
        T: Decodable + 'static,
        F: Fn(T) -> Frame + Clone + Send + Sync + 'static,
    {
        for &command_id in T::command_ids() {
            let constructor = frame_constructor.clone();
            let decoder = Box::new(move |header: PduHeader, buf: &mut Cursor<&[u8]>| {
                T::validate_header(&header)?;
                let pdu = T::decode(header, buf)?;
                Ok(constructor(pdu))
            });
            self.decoders.insert(command_id, decoder);
        }
    }

    /// Decode a PDU given its header and body
    pub fn decode_pdu(
        &self,
        header: PduHeader,
        buf: &mut Cursor<&[u8]>,
    ) -> Result<Frame, CodecError> {
        let body_len = header.command_length as usize - PduHeader::SIZE;
        if buf.remaining() < body_len {
            return Err(CodecError::Incomplete);
        }

        match self.decoders.get(&header.command_id) {
            Some(decoder) => decoder(header, buf),
            None => Err(CodecError::InvalidCommandId {
                command_id: header.command_id as u32,
                sequence_number: header.sequence_number,
            }),
        }
    }

    /// Check if a command_id is registered
    pub fn is_registered(&self, command_id: CommandId) -> bool {
        self.decoders.contains_key(&command_id)
    }

    /// Get all registered command_ids
    pub fn registered_commands(&self) -> Vec<CommandId> {
        self.decoders.keys().copied().collect()
    }
}

impl Default for PduRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::string_rules::{PASSWORD, SYSTEM_ID};
    use crate::datatypes::{EnquireLink, EnquireLinkResponse, GenericNack, Outbind, Unbind};

    #[test]
    fn pdu_header_encode_decode() {
        let header = PduHeader {
            command_length: 16,
            command_id: CommandId::EnquireLink,
            command_status: CommandStatus::Ok,
            sequence_number: 42,
        };

        let mut buf = BytesMut::new();
        header.encode(&mut buf);

        let mut cursor = Cursor::new(buf.as_ref());
        let decoded = PduHeader::decode(&mut cursor).unwrap();

        assert_eq!(header, decoded);
    }

    #[test]
    fn decode_cstring_normal() {
        let data = b"hello\0rest";
        let mut cursor = Cursor::new(&data[..]);
        let result = decode_cstring(&mut cursor, SYSTEM_ID).unwrap();
        assert_eq!(result, "hello");
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn decode_cstring_too_long_reports_field() {
        let data = b"0123456789\0";
        let mut cursor = Cursor::new(&data[..]);
        let err = decode_cstring(&mut cursor, PASSWORD).unwrap_err();
        assert_eq!(err.to_command_status(), CommandStatus::InvalidPassword);
    }

    #[test]
    fn encode_cstring_normal() {
        let mut buf = BytesMut::new();
        encode_cstring(&mut buf, "hello", SYSTEM_ID).unwrap();
        assert_eq!(buf.as_ref(), b"hello\0");
    }

    #[test]
    fn short_message_length_prefix() {
        let mut buf = BytesMut::new();
        encode_short_message(&mut buf, b"hi").unwrap();
        assert_eq!(buf.as_ref(), &[2, b'h', b'i']);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(decode_short_message(&mut cursor).unwrap().as_ref(), b"hi");

        let err = encode_short_message(&mut BytesMut::new(), &[0u8; 255]).unwrap_err();
        assert_eq!(err.to_command_status(), CommandStatus::InvalidMsgLength);
    }

    #[test]
    fn to_bytes_backpatches_length() {
        let bytes = Outbind::new(7, "smsc", "pw").to_bytes().unwrap();
        let declared = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(declared as usize, bytes.len());
    }

    #[test]
    fn decode_pdu_rejects_length_mismatch() {
        let mut bytes = BytesMut::from(EnquireLink::new(1).to_bytes().unwrap().as_ref());
        bytes.put_u8(0);
        let err = decode_pdu(&bytes).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LengthMismatch {
                declared: 16,
                actual: 17
            }
        ));
        assert_eq!(err.to_command_status(), CommandStatus::InvalidCommandLength);

        // Declared length larger than the buffer is rejected the same way
        let err = decode_pdu(&bytes[..12]).unwrap_err();
        assert!(matches!(err, CodecError::LengthMismatch { .. }));
    }

    #[test]
    fn decode_pdu_unknown_command_id_keeps_sequence() {
        let bytes = header_only_bytes(0x0000_000A, CommandStatus::Ok, 99);
        match decode_pdu(&bytes) {
            Err(CodecError::InvalidCommandId {
                command_id,
                sequence_number,
            }) => {
                assert_eq!(command_id, 0x0000_000A);
                assert_eq!(sequence_number, 99);
            }
            other => panic!("expected InvalidCommandId, got {other:?}"),
        }
    }

    #[test]
    fn pdu_header_length_validation() {
        let data: &[u8] = &[
            0x00, 0x00, 0x00, 0x08, // command_length too small
            0x00, 0x00, 0x00, 0x15, // command_id
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x01, // sequence_number
        ];
        let mut cursor = Cursor::new(data);
        let result = PduHeader::decode(&mut cursor);
        assert!(matches!(result, Err(CodecError::InvalidPduLength { .. })));
    }

    #[test]
    fn unknown_status_maps_to_unknown_error() {
        let bytes = header_only_bytes(CommandId::EnquireLinkResp as u32, CommandStatus::Ok, 3);
        let mut raw = BytesMut::from(bytes.as_ref());
        raw[8..12].copy_from_slice(&0x0000_0401u32.to_be_bytes());

        let frame = decode_pdu(&raw).unwrap();
        assert_eq!(frame.command_status(), CommandStatus::UnknownError);
    }

    #[test]
    fn registry_decode_all_simple_pdus() {
        let frame = decode_pdu(&EnquireLink::new(1).to_bytes().unwrap()).unwrap();
        assert!(matches!(frame, Frame::EnquireLink(_)));

        let frame = decode_pdu(&EnquireLinkResponse::new(1).to_bytes().unwrap()).unwrap();
        assert!(matches!(frame, Frame::EnquireLinkResp(_)));

        let frame = decode_pdu(&Unbind::new(2).to_bytes().unwrap()).unwrap();
        assert!(matches!(frame, Frame::Unbind(_)));

        let frame = decode_pdu(&GenericNack::system_error(3).to_bytes().unwrap()).unwrap();
        assert!(matches!(frame, Frame::GenericNack(_)));
    }

    #[test]
    fn registry_has_every_command() {
        let registry = PduRegistry::new();
        for command_id in [
            CommandId::GenericNack,
            CommandId::BindTransceiver,
            CommandId::BindReceiverResp,
            CommandId::Outbind,
            CommandId::SubmitMulti,
            CommandId::AlertNotification,
            CommandId::CancelBroadcastSmResp,
        ] {
            assert!(registry.is_registered(command_id), "{command_id} missing");
        }
        assert_eq!(registry.registered_commands().len(), 33);
    }

    #[test]
    fn unknown_tlv_survives_every_tlv_carrying_pdu() {
        use crate::datatypes::*;

        let unknown = || OptionalParameters::new().with(Tlv::new(0x1400, vec![0xCA, 0xFE]));

        let mut submit = SubmitSm::new("1111", "2222", b"hi".to_vec());
        submit.sequence_number = 1;
        submit.optional_parameters = unknown();
        let mut submit_resp = SubmitSmResponse::new(1, "m1");
        submit_resp.optional_parameters = unknown();

        let mut deliver = DeliverSm::new("2222", "1111", b"hi".to_vec());
        deliver.sequence_number = 2;
        deliver.optional_parameters = unknown();
        let mut deliver_resp = DeliverSmResponse::new(2, "");
        deliver_resp.optional_parameters = unknown();

        let mut data = DataSm::new("1111", "2222");
        data.sequence_number = 3;
        data.optional_parameters = unknown();
        let mut data_resp = DataSmResponse::new(3, "d3");
        data_resp.optional_parameters = unknown();

        let mut multi = SubmitMulti::new(
            "1111",
            vec![
                Destination::SmeAddress("2222".into()),
                Destination::DistributionList("friends".into()),
            ],
            b"hi".to_vec(),
        );
        multi.sequence_number = 4;
        multi.optional_parameters = unknown();
        let mut multi_resp = SubmitMultiResponse::new(4, "mm4");
        multi_resp.unsuccessful.push(UnsuccessfulDelivery {
            address: "3333".into(),
            error_status_code: CommandStatus::InvalidDestinationAddress,
        });
        multi_resp.optional_parameters = unknown();

        let mut broadcast = BroadcastSm::new("1111", vec![0x00, 0x01], 0x0001, 2, [0, 0, 1]);
        broadcast.sequence_number = 5;
        broadcast.optional_parameters.push(Tlv::new(0x1400, vec![0xCA, 0xFE]));
        let mut broadcast_resp = BroadcastSmResponse::new(5, "b5");
        broadcast_resp.optional_parameters = unknown();

        let mut query_broadcast = QueryBroadcastSm::new("b5", "1111");
        query_broadcast.sequence_number = 6;
        query_broadcast.optional_parameters = unknown();
        let mut query_broadcast_resp = QueryBroadcastSmResponse::new(6, "b5");
        query_broadcast_resp.optional_parameters = unknown();

        let mut cancel_broadcast = CancelBroadcastSm::new("b5", "1111");
        cancel_broadcast.sequence_number = 7;
        cancel_broadcast.optional_parameters = unknown();

        let mut bind_resp = BindResponse::new(BindType::Transceiver, 8, "smsc");
        bind_resp.optional_parameters = unknown();

        let mut alert = AlertNotification::new("1111", "2222");
        alert.sequence_number = 9;
        alert.optional_parameters = unknown();

        let frames: Vec<Frame> = vec![
            submit.into(),
            submit_resp.into(),
            deliver.into(),
            deliver_resp.into(),
            data.into(),
            data_resp.into(),
            multi.into(),
            multi_resp.into(),
            broadcast.into(),
            broadcast_resp.into(),
            query_broadcast.into(),
            query_broadcast_resp.into(),
            cancel_broadcast.into(),
            bind_resp.into(),
            alert.into(),
        ];
        for frame in frames {
            let bytes = frame.to_bytes().unwrap();
            let decoded = decode_pdu(&bytes)
                .unwrap_or_else(|err| panic!("{} did not decode: {err}", frame.command_id()));
            assert_eq!(decoded, frame, "{} changed on the wire", frame.command_id());
        }
    }
}
