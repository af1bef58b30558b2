//! SMPP Protocol Frame
//!
//! `Frame` holds any decoded PDU. The session reader works on frames; callers
//! of the session work on the typed PDUs and convert through `From`/`TryFrom`.

use crate::codec::{CodecError, Encodable};
use crate::datatypes::*;
use crate::macros::with_pdu;
use bytes::{Bytes, BytesMut};

/// Generic frame type that can hold any PDU
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    GenericNack(GenericNack),

    // Session management PDUs
    Bind(Bind),
    BindResp(BindResponse),
    Outbind(Outbind),
    Unbind(Unbind),
    UnbindResp(UnbindResponse),
    EnquireLink(EnquireLink),
    EnquireLinkResp(EnquireLinkResponse),

    // Message PDUs
    SubmitSm(Box<SubmitSm>),
    SubmitSmResp(SubmitSmResponse),
    DeliverSm(Box<DeliverSm>),
    DeliverSmResp(DeliverSmResponse),
    DataSm(Box<DataSm>),
    DataSmResp(DataSmResponse),
    SubmitMulti(Box<SubmitMulti>),
    SubmitMultiResp(SubmitMultiResponse),
    QuerySm(QuerySm),
    QuerySmResp(QuerySmResponse),
    CancelSm(CancelSm),
    CancelSmResp(CancelSmResponse),
    ReplaceSm(Box<ReplaceSm>),
    ReplaceSmResp(ReplaceSmResponse),

    // Notification PDUs
    AlertNotification(AlertNotification),

    // SMPP 5.0 broadcast PDUs
    BroadcastSm(Box<BroadcastSm>),
    BroadcastSmResp(BroadcastSmResponse),
    QueryBroadcastSm(QueryBroadcastSm),
    QueryBroadcastSmResp(QueryBroadcastSmResponse),
    CancelBroadcastSm(CancelBroadcastSm),
    CancelBroadcastSmResp(CancelBroadcastSmResponse),
}

impl Frame {
    /// Get the command_id for this frame
    pub fn command_id(&self) -> CommandId {
        with_pdu!(self, pdu => pdu.command_id())
    }

    pub fn command_status(&self) -> CommandStatus {
        with_pdu!(self, pdu => pdu.command_status)
    }

    /// Get the sequence number for this frame
    pub fn sequence_number(&self) -> u32 {
        with_pdu!(self, pdu => pdu.sequence_number)
    }

    pub fn set_sequence_number(&mut self, sequence_number: u32) {
        with_pdu!(self, pdu => pdu.sequence_number = sequence_number)
    }

    /// Check if this frame is a response PDU
    pub fn is_response(&self) -> bool {
        self.command_id().is_response()
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        with_pdu!(self, pdu => pdu.encode(buf))
    }

    pub fn to_bytes(&self) -> Result<Bytes, CodecError> {
        with_pdu!(self, pdu => pdu.to_bytes())
    }
}

/// A request PDU the session can send and correlate with its response.
pub trait Request: Encodable + Into<Frame> + Send + 'static {
    type Response: TryFrom<Frame, Error = Frame> + Send + 'static;

    fn sequence_number(&self) -> u32;

    fn set_sequence_number(&mut self, sequence_number: u32);
}

crate::macros::impl_request! {
    Bind => BindResponse,
    Unbind => UnbindResponse,
    EnquireLink => EnquireLinkResponse,
    SubmitSm => SubmitSmResponse,
    DeliverSm => DeliverSmResponse,
    DataSm => DataSmResponse,
    SubmitMulti => SubmitMultiResponse,
    QuerySm => QuerySmResponse,
    CancelSm => CancelSmResponse,
    ReplaceSm => ReplaceSmResponse,
    BroadcastSm => BroadcastSmResponse,
    QueryBroadcastSm => QueryBroadcastSmResponse,
    CancelBroadcastSm => CancelBroadcastSmResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_accessors() {
        let frame = Frame::from(EnquireLink::new(42));
        assert_eq!(frame.command_id(), CommandId::EnquireLink);
        assert_eq!(frame.sequence_number(), 42);
        assert!(!frame.is_response());

        let frame = Frame::from(EnquireLinkResponse::error(43, CommandStatus::SystemError));
        assert_eq!(frame.command_id(), CommandId::EnquireLinkResp);
        assert_eq!(frame.command_status(), CommandStatus::SystemError);
        assert!(frame.is_response());
    }

    #[test]
    fn set_sequence_number_reaches_boxed_pdus() {
        let mut frame = Frame::from(SubmitSm::new("1234", "5678", b"hi".to_vec()));
        frame.set_sequence_number(9);
        assert_eq!(frame.sequence_number(), 9);
    }

    #[test]
    fn try_from_returns_frame_on_mismatch() {
        let frame = Frame::from(Unbind::new(5));
        let back = EnquireLinkResponse::try_from(frame).unwrap_err();
        assert_eq!(back.command_id(), CommandId::Unbind);
    }
}
