use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::{impl_complete_header_only_pdu, impl_frame_conversions};

/// Keep-alive check. Either peer may send it in any state after the
/// connection is up; the receiver answers with enquire_link_resp.
#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLink {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLinkResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(EnquireLink, CommandId::EnquireLink);
impl_complete_header_only_pdu!(EnquireLinkResponse, CommandId::EnquireLinkResp);
impl_frame_conversions!(EnquireLink, EnquireLink);
impl_frame_conversions!(EnquireLinkResp, EnquireLinkResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Encodable, decode_pdu};
    use crate::frame::Frame;

    #[test]
    fn enquire_link_is_header_only() {
        let bytes = EnquireLink::new(7).to_bytes().unwrap();
        assert_eq!(
            bytes.as_ref(),
            &[0, 0, 0, 16, 0, 0, 0, 0x15, 0, 0, 0, 0, 0, 0, 0, 7]
        );
    }

    #[test]
    fn enquire_link_resp_keeps_error_status() {
        let original = EnquireLinkResponse::error(123, CommandStatus::SystemError);
        let frame = decode_pdu(&original.to_bytes().unwrap()).unwrap();
        assert_eq!(frame, Frame::EnquireLinkResp(original));
    }
}
