//! The purpose of the outbind operation is to allow the SMSC signal an ESME to
//! originate a bind_receiver request to the SMSC. An example of where such a
//! facility might be applicable would be where the SMSC had outstanding
//! messages for delivery to the ESME.
//!
//! The SMSC establishes the network connection and sends outbind; the ESME
//! answers with a bind request (there is no outbind_resp). If the ESME does
//! not accept the outbind it disconnects.

use crate::codec::{CodecError, Decodable, Encodable, PduHeader, decode_cstring, encode_cstring};
use crate::datatypes::string_rules::{PASSWORD, SYSTEM_ID};
use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::impl_frame_conversions;
use bytes::BytesMut;
use std::io::Cursor;

#[derive(Clone, Debug, PartialEq)]
pub struct Outbind {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    /// Identifies the SMSC to the ESME.
    pub system_id: String,
    /// Lets the ESME authenticate the SMSC; empty if not used.
    pub password: String,
}

impl Outbind {
    pub fn new(sequence_number: u32, system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            system_id: system_id.into(),
            password: password.into(),
        }
    }
}

impl Encodable for Outbind {
    fn command_id(&self) -> CommandId {
        CommandId::Outbind
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::new(CommandId::Outbind, self.command_status, self.sequence_number).encode(buf);
        encode_cstring(buf, &self.system_id, SYSTEM_ID)?;
        encode_cstring(buf, &self.password, PASSWORD)
    }
}

impl Decodable for Outbind {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::Outbind]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id: decode_cstring(buf, SYSTEM_ID)?,
            password: decode_cstring(buf, PASSWORD)?,
        })
    }
}

impl_frame_conversions!(Outbind, Outbind);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_pdu;

    #[test]
    fn outbind_round_trip() {
        let original = Outbind::new(789, "TEST", "secret");
        let decoded = Outbind::try_from(decode_pdu(&original.to_bytes().unwrap()).unwrap());
        assert_eq!(decoded.unwrap(), original);
    }

    #[test]
    fn outbind_without_password() {
        let bytes = Outbind::new(4, "TEST", "").to_bytes().unwrap();
        // header + "TEST\0" + "\0"
        assert_eq!(bytes.len(), 16 + 5 + 1);
    }
}
