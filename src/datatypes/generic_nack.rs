use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::{impl_frame_conversions, impl_header_only_pdu};

/// GenericNack acknowledges a PDU the receiver could not process at all:
/// an unknown command_id, or a header whose command_length cannot be
/// trusted.
///
/// The generic_nack PDU has no message body and only contains the standard
/// SMPP header.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericNack {
    /// The reason for the generic_nack
    pub command_status: CommandStatus,
    /// The sequence_number from the offending PDU, or 0 when it could not be
    /// determined.
    pub sequence_number: u32,
}

impl GenericNack {
    pub fn new(command_status: CommandStatus, sequence_number: u32) -> Self {
        Self {
            command_status,
            sequence_number,
        }
    }

    pub fn invalid_command_id(sequence_number: u32) -> Self {
        Self::new(CommandStatus::InvalidCommandId, sequence_number)
    }

    pub fn invalid_command_length(sequence_number: u32) -> Self {
        Self::new(CommandStatus::InvalidCommandLength, sequence_number)
    }

    pub fn system_error(sequence_number: u32) -> Self {
        Self::new(CommandStatus::SystemError, sequence_number)
    }

    /// The nack sent when a header's length is unusable; the sequence number
    /// of the broken PDU is unknown.
    pub fn unknown_sequence() -> Self {
        Self::new(CommandStatus::InvalidCommandLength, 0)
    }
}

impl_header_only_pdu!(GenericNack, CommandId::GenericNack);
impl_frame_conversions!(GenericNack, GenericNack);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Encodable, decode_pdu};
    use crate::frame::Frame;

    #[test]
    fn generic_nack_to_bytes() {
        let bytes = GenericNack::invalid_command_id(42).to_bytes().unwrap();

        let expected = vec![
            0x00, 0x00, 0x00, 0x10, // command_length (16)
            0x80, 0x00, 0x00, 0x00, // command_id (GenericNack = 0x80000000)
            0x00, 0x00, 0x00, 0x03, // command_status (InvalidCommandId = 3)
            0x00, 0x00, 0x00, 0x2A, // sequence_number (42)
        ];

        assert_eq!(bytes.as_ref(), expected.as_slice());
    }

    #[test]
    fn unknown_sequence_uses_zero() {
        let nack = GenericNack::unknown_sequence();
        assert_eq!(nack.command_status, CommandStatus::InvalidCommandLength);
        assert_eq!(nack.sequence_number, 0);

        match decode_pdu(&nack.to_bytes().unwrap()).unwrap() {
            Frame::GenericNack(parsed) => assert_eq!(parsed, nack),
            other => panic!("Expected GenericNack frame, got {other:?}"),
        }
    }
}
