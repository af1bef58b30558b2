use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::{impl_complete_header_only_pdu, impl_frame_conversions};

/// The purpose of the SMPP unbind operation is to deregister an instance of an ESME from the SMSC
/// and inform the SMSC that the ESME no longer wishes to use this network connection for the
/// submission or delivery of messages.
///
/// Thus, the unbind operation may be viewed as a form of SMSC logoff request to close the current
/// SMPP session.
#[derive(Clone, Debug, PartialEq)]
pub struct Unbind {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnbindResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(Unbind, CommandId::Unbind);
impl_complete_header_only_pdu!(UnbindResponse, CommandId::UnbindResp);
impl_frame_conversions!(Unbind, Unbind);
impl_frame_conversions!(UnbindResp, UnbindResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Encodable, decode_pdu};

    #[test]
    fn unbind_with_body_is_rejected() {
        let mut bytes = Unbind::new(3).to_bytes().unwrap().to_vec();
        bytes.push(0);
        bytes[3] = 17;
        assert!(decode_pdu(&bytes).is_err());
    }

    #[test]
    fn unbind_resp_round_trip() {
        let original = UnbindResponse::new(3);
        let frame = decode_pdu(&original.to_bytes().unwrap()).unwrap();
        assert_eq!(UnbindResponse::try_from(frame).unwrap(), original);
    }
}
