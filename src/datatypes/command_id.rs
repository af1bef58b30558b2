use num_enum::TryFromPrimitive;
use std::fmt;

const RESPONSE_MASK: u32 = 0x8000_0000;

#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandId {
    GenericNack = 0x8000_0000,
    BindReceiver = 0x0000_0001,
    BindReceiverResp = 0x8000_0001,
    BindTransmitter = 0x0000_0002,
    BindTransmitterResp = 0x8000_0002,
    QuerySm = 0x0000_0003,
    QuerySmResp = 0x8000_0003,
    SubmitSm = 0x0000_0004,
    SubmitSmResp = 0x8000_0004,
    DeliverSm = 0x0000_0005,
    DeliverSmResp = 0x8000_0005,
    Unbind = 0x0000_0006,
    UnbindResp = 0x8000_0006,
    ReplaceSm = 0x0000_0007,
    ReplaceSmResp = 0x8000_0007,
    CancelSm = 0x0000_0008,
    CancelSmResp = 0x8000_0008,
    BindTransceiver = 0x0000_0009,
    BindTransceiverResp = 0x8000_0009,
    // Reserved 0x0000000A - 0x8000000A
    Outbind = 0x0000_000B,
    // Reserved 0x0000000C - 0x00000014
    //          0x8000000B - 0x80000014
    EnquireLink = 0x0000_0015,
    EnquireLinkResp = 0x8000_0015,
    // Reserved 0x00000016 - 0x00000020
    //          0x80000016 - 0x80000020
    SubmitMulti = 0x0000_0021,
    SubmitMultiResp = 0x8000_0021,
    // Reserved 0x00000022 - 0x000000FF
    //          0x80000022 - 0x800000FF
    // Reserved 0x00000100
    // Reserved 0x80000100
    // Reserved 0x00000101 - 0x80000101
    AlertNotification = 0x0000_0102,
    // Reserved 0x80000102
    DataSm = 0x0000_0103,
    DataSmResp = 0x8000_0103,
    // Reserved 0x00000104 - 0x00000110
    // SMPP v5.0 broadcast operations
    BroadcastSm = 0x0000_0111,
    BroadcastSmResp = 0x8000_0111,
    QueryBroadcastSm = 0x0000_0112,
    QueryBroadcastSmResp = 0x8000_0112,
    CancelBroadcastSm = 0x0000_0113,
    CancelBroadcastSmResp = 0x8000_0113,
    // Reserved for SMSC Vendor
    //          0x00010200 - 0x000102FF
    //          0x80010200 - 0x800102FF
}

impl CommandId {
    /// Check if this command_id represents a response PDU
    pub fn is_response(&self) -> bool {
        (*self as u32) & RESPONSE_MASK != 0
    }

    /// The response command_id paired with a request command_id.
    ///
    /// Returns `None` for responses and for requests that are never answered
    /// (outbind, alert_notification).
    pub fn response(&self) -> Option<CommandId> {
        if self.is_response() || matches!(self, CommandId::Outbind | CommandId::AlertNotification)
        {
            return None;
        }
        CommandId::try_from((*self as u32) | RESPONSE_MASK).ok()
    }

    /// Raw response id for any request id, including ones this crate does not know.
    pub fn response_id_of(raw: u32) -> u32 {
        raw | RESPONSE_MASK
    }

    /// The bind request command ids.
    pub fn is_bind(&self) -> bool {
        matches!(
            self,
            CommandId::BindReceiver | CommandId::BindTransmitter | CommandId::BindTransceiver
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            CommandId::GenericNack => "generic_nack",
            CommandId::BindReceiver => "bind_receiver",
            CommandId::BindReceiverResp => "bind_receiver_resp",
            CommandId::BindTransmitter => "bind_transmitter",
            CommandId::BindTransmitterResp => "bind_transmitter_resp",
            CommandId::QuerySm => "query_sm",
            CommandId::QuerySmResp => "query_sm_resp",
            CommandId::SubmitSm => "submit_sm",
            CommandId::SubmitSmResp => "submit_sm_resp",
            CommandId::DeliverSm => "deliver_sm",
            CommandId::DeliverSmResp => "deliver_sm_resp",
            CommandId::Unbind => "unbind",
            CommandId::UnbindResp => "unbind_resp",
            CommandId::ReplaceSm => "replace_sm",
            CommandId::ReplaceSmResp => "replace_sm_resp",
            CommandId::CancelSm => "cancel_sm",
            CommandId::CancelSmResp => "cancel_sm_resp",
            CommandId::BindTransceiver => "bind_transceiver",
            CommandId::BindTransceiverResp => "bind_transceiver_resp",
            CommandId::Outbind => "outbind",
            CommandId::EnquireLink => "enquire_link",
            CommandId::EnquireLinkResp => "enquire_link_resp",
            CommandId::SubmitMulti => "submit_multi",
            CommandId::SubmitMultiResp => "submit_multi_resp",
            CommandId::AlertNotification => "alert_notification",
            CommandId::DataSm => "data_sm",
            CommandId::DataSmResp => "data_sm_resp",
            CommandId::BroadcastSm => "broadcast_sm",
            CommandId::BroadcastSmResp => "broadcast_sm_resp",
            CommandId::QueryBroadcastSm => "query_broadcast_sm",
            CommandId::QueryBroadcastSmResp => "query_broadcast_sm_resp",
            CommandId::CancelBroadcastSm => "cancel_broadcast_sm",
            CommandId::CancelBroadcastSmResp => "cancel_broadcast_sm_resp",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
