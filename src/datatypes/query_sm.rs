use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_u8, encode_cstring,
    response_body_absent,
};
use crate::datatypes::string_rules::{FINAL_DATE, MESSAGE_ID, SOURCE_ADDR};
use crate::datatypes::{Address, CommandId, CommandStatus};
use crate::macros::impl_frame_conversions;
use bytes::{BufMut, BytesMut};
use std::io::Cursor;

/// query_sm asks the SMSC for the state of a previously submitted message.
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    /// message_id returned by the SMSC in submit_sm_resp
    pub message_id: String,
    /// Must match the source address of the original submission
    pub source: Address,
}

impl QuerySm {
    pub fn new(message_id: impl Into<String>, source: impl Into<Address>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            message_id: message_id.into(),
            source: source.into(),
        }
    }
}

impl Encodable for QuerySm {
    fn command_id(&self) -> CommandId {
        CommandId::QuerySm
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::QuerySm, self.command_status, self.sequence_number).encode(buf);
        encode_cstring(buf, &self.message_id, MESSAGE_ID)?;
        self.source.encode(buf, SOURCE_ADDR)
    }
}

impl Decodable for QuerySm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::QuerySm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id: decode_cstring(buf, MESSAGE_ID)?,
            source: Address::decode(buf, SOURCE_ADDR)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuerySmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
    /// Date and time the message reached its final state, empty if it has not.
    pub final_date: String,
    pub message_state: u8,
    /// Network specific error code for a failed message.
    pub error_code: u8,
}

impl QuerySmResponse {
    pub fn new(sequence_number: u32, message_id: impl Into<String>, message_state: u8) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: message_id.into(),
            final_date: String::new(),
            message_state,
            error_code: 0,
        }
    }

    pub fn error(sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            ..Self::new(sequence_number, "", 0)
        }
    }
}

impl Encodable for QuerySmResponse {
    fn command_id(&self) -> CommandId {
        CommandId::QuerySmResp
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::QuerySmResp, self.command_status, self.sequence_number)
            .encode(buf);
        if !self.command_status.is_ok() && self.message_id.is_empty() {
            return Ok(());
        }
        encode_cstring(buf, &self.message_id, MESSAGE_ID)?;
        encode_cstring(buf, &self.final_date, FINAL_DATE)?;
        buf.put_u8(self.message_state);
        buf.put_u8(self.error_code);
        Ok(())
    }
}

impl Decodable for QuerySmResponse {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::QuerySmResp]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if response_body_absent(&header, buf) {
            return Ok(Self::error(header.sequence_number, header.command_status));
        }
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id: decode_cstring(buf, MESSAGE_ID)?,
            final_date: decode_cstring(buf, FINAL_DATE)?,
            message_state: decode_u8(buf)?,
            error_code: decode_u8(buf)?,
        })
    }
}

impl_frame_conversions!(QuerySm, QuerySm);
impl_frame_conversions!(QuerySmResp, QuerySmResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_pdu;

    #[test]
    fn query_sm_round_trip() {
        let mut pdu = QuerySm::new("abc123", Address::international("447700900001"));
        pdu.sequence_number = 21;
        let decoded = QuerySm::try_from(decode_pdu(&pdu.to_bytes().unwrap()).unwrap()).unwrap();
        assert_eq!(decoded, pdu);
    }

    #[test]
    fn query_sm_resp_round_trip() {
        let mut resp = QuerySmResponse::new(21, "abc123", 2);
        resp.final_date = "260101120000000+".into();
        let decoded = QuerySmResponse::try_from(decode_pdu(&resp.to_bytes().unwrap()).unwrap());
        assert_eq!(decoded.unwrap(), resp);
    }

    #[test]
    fn final_date_must_be_full_length() {
        let mut resp = QuerySmResponse::new(21, "abc123", 2);
        resp.final_date = "2601".into();
        let err = resp.to_bytes().unwrap_err();
        assert_eq!(err.to_command_status(), CommandStatus::UnknownError);
    }
}
