// ABOUTME: Session lifecycle states, legal transitions and per-state inbound handler tables
// ABOUTME: Legality of each command is decided from the state, the local role and the command's flow

use crate::datatypes::{BindType, CommandId};
use std::fmt;

/// Lifecycle of one SMPP session.
///
/// ```text
/// OPEN --(bind accepted)--> BOUND_TX | BOUND_RX | BOUND_TRX
/// OPEN --(outbind)--> OUTBOUND --(bind accepted)--> BOUND_*
/// BOUND_* --(unbind exchanged)--> UNBOUND --> CLOSED
/// any --(fatal error or close)--> CLOSED
/// ```
///
/// Transitions never go back to an earlier phase and CLOSED is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    Open,
    Outbound,
    BoundTx,
    BoundRx,
    BoundTrx,
    Unbound,
    Closed,
}

/// Which end of the protocol this session plays.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionRole {
    /// Client side: binds to an SMSC
    Esme,
    /// Server side: accepts binds
    Smsc,
}

impl SessionRole {
    pub fn peer(&self) -> SessionRole {
        match self {
            SessionRole::Esme => SessionRole::Smsc,
            SessionRole::Smsc => SessionRole::Esme,
        }
    }
}

/// Direction a business command travels in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// ESME to SMSC
    Transmit,
    /// SMSC to ESME
    Receive,
    /// Either way
    Both,
}

impl Flow {
    /// Flow of a business request, `None` for session management commands.
    pub fn of(command_id: CommandId) -> Option<Flow> {
        match command_id {
            CommandId::SubmitSm
            | CommandId::SubmitMulti
            | CommandId::QuerySm
            | CommandId::CancelSm
            | CommandId::ReplaceSm
            | CommandId::BroadcastSm
            | CommandId::QueryBroadcastSm
            | CommandId::CancelBroadcastSm => Some(Flow::Transmit),
            CommandId::DeliverSm | CommandId::AlertNotification => Some(Flow::Receive),
            CommandId::DataSm => Some(Flow::Both),
            _ => None,
        }
    }
}

/// What the reader does with an inbound PDU.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Match against the pending-response table
    Response,
    /// A bind response that moves this ESME into a bound state
    BindResponse,
    /// Answer inline
    EnquireLink,
    /// Answer inline, then tear down
    Unbind,
    /// Publish to the bind rendezvous
    Bind,
    /// Reject with ESME_RALYBND
    AlreadyBound,
    /// Publish to the outbind rendezvous
    Outbind,
    /// Run the application callback on the worker pool
    Business,
}

type Table = &'static [(CommandId, Action)];

const RESPONSES: Table = &[
    (CommandId::GenericNack, Action::Response),
    (CommandId::BindReceiverResp, Action::Response),
    (CommandId::BindTransmitterResp, Action::Response),
    (CommandId::BindTransceiverResp, Action::Response),
    (CommandId::UnbindResp, Action::Response),
    (CommandId::EnquireLinkResp, Action::Response),
    (CommandId::SubmitSmResp, Action::Response),
    (CommandId::DeliverSmResp, Action::Response),
    (CommandId::DataSmResp, Action::Response),
    (CommandId::SubmitMultiResp, Action::Response),
    (CommandId::QuerySmResp, Action::Response),
    (CommandId::CancelSmResp, Action::Response),
    (CommandId::ReplaceSmResp, Action::Response),
    (CommandId::BroadcastSmResp, Action::Response),
    (CommandId::QueryBroadcastSmResp, Action::Response),
    (CommandId::CancelBroadcastSmResp, Action::Response),
];

const BIND_RESPONSES: Table = &[
    (CommandId::BindReceiverResp, Action::BindResponse),
    (CommandId::BindTransmitterResp, Action::BindResponse),
    (CommandId::BindTransceiverResp, Action::BindResponse),
];

const KEEP_ALIVE: Table = &[(CommandId::EnquireLink, Action::EnquireLink)];

const UNBIND: Table = &[(CommandId::Unbind, Action::Unbind)];

const BIND_REQUESTS: Table = &[
    (CommandId::BindReceiver, Action::Bind),
    (CommandId::BindTransmitter, Action::Bind),
    (CommandId::BindTransceiver, Action::Bind),
];

const ALREADY_BOUND: Table = &[
    (CommandId::BindReceiver, Action::AlreadyBound),
    (CommandId::BindTransmitter, Action::AlreadyBound),
    (CommandId::BindTransceiver, Action::AlreadyBound),
];

const OUTBIND: Table = &[(CommandId::Outbind, Action::Outbind)];

const BUSINESS: Table = &[
    (CommandId::SubmitSm, Action::Business),
    (CommandId::SubmitMulti, Action::Business),
    (CommandId::QuerySm, Action::Business),
    (CommandId::CancelSm, Action::Business),
    (CommandId::ReplaceSm, Action::Business),
    (CommandId::BroadcastSm, Action::Business),
    (CommandId::QueryBroadcastSm, Action::Business),
    (CommandId::CancelBroadcastSm, Action::Business),
    (CommandId::DeliverSm, Action::Business),
    (CommandId::AlertNotification, Action::Business),
    (CommandId::DataSm, Action::Business),
];

// Earlier tables win, so BIND_RESPONSES must precede RESPONSES.
const SMSC_OPEN: &[Table] = &[RESPONSES, KEEP_ALIVE, BIND_REQUESTS];
const ESME_OPEN: &[Table] = &[BIND_RESPONSES, RESPONSES, KEEP_ALIVE, OUTBIND];
const ESME_OUTBOUND: &[Table] = &[BIND_RESPONSES, RESPONSES, KEEP_ALIVE];
const BOUND: &[Table] = &[RESPONSES, KEEP_ALIVE, UNBIND, ALREADY_BOUND, BUSINESS];
const UNBOUND: &[Table] = &[RESPONSES];
const CLOSED: &[Table] = &[];

impl SessionState {
    pub fn bound(bind_type: BindType) -> SessionState {
        match bind_type {
            BindType::Transmitter => SessionState::BoundTx,
            BindType::Receiver => SessionState::BoundRx,
            BindType::Transceiver => SessionState::BoundTrx,
        }
    }

    pub fn bind_type(&self) -> Option<BindType> {
        match self {
            SessionState::BoundTx => Some(BindType::Transmitter),
            SessionState::BoundRx => Some(BindType::Receiver),
            SessionState::BoundTrx => Some(BindType::Transceiver),
            _ => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bind_type().is_some()
    }

    fn phase(&self) -> u8 {
        match self {
            SessionState::Open => 0,
            SessionState::Outbound => 1,
            SessionState::BoundTx | SessionState::BoundRx | SessionState::BoundTrx => 2,
            SessionState::Unbound => 3,
            SessionState::Closed => 4,
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        match (self, next) {
            (SessionState::Closed, _) => false,
            (_, SessionState::Closed) => true,
            (SessionState::Open, SessionState::Outbound) => true,
            (SessionState::Open | SessionState::Outbound, next) if next.is_bound() => true,
            (current, SessionState::Unbound) => current.is_bound(),
            _ => false,
        }
    }

    /// Whether a session with `role` in this state may send a request with `command_id`.
    pub fn can_send(&self, role: SessionRole, command_id: CommandId) -> bool {
        match command_id {
            CommandId::BindReceiver | CommandId::BindTransmitter | CommandId::BindTransceiver => {
                role == SessionRole::Esme
                    && matches!(self, SessionState::Open | SessionState::Outbound)
            }
            CommandId::Outbind => role == SessionRole::Smsc && *self == SessionState::Open,
            CommandId::EnquireLink => matches!(
                self,
                SessionState::Open
                    | SessionState::Outbound
                    | SessionState::BoundTx
                    | SessionState::BoundRx
                    | SessionState::BoundTrx
            ),
            CommandId::Unbind => self.is_bound(),
            other => match (Flow::of(other), self.bind_type()) {
                (Some(flow), Some(bind_type)) => match (role, flow) {
                    (SessionRole::Esme, Flow::Transmit | Flow::Both) => bind_type.can_transmit(),
                    (SessionRole::Smsc, Flow::Receive | Flow::Both) => bind_type.can_receive(),
                    _ => false,
                },
                _ => false,
            },
        }
    }

    /// Whether the peer of a session with `role` may send us `command_id` now.
    pub fn can_receive(&self, role: SessionRole, command_id: CommandId) -> bool {
        self.can_send(role.peer(), command_id)
    }

    fn tables(&self, role: SessionRole) -> &'static [Table] {
        match (self, role) {
            (SessionState::Open, SessionRole::Smsc) => SMSC_OPEN,
            (SessionState::Open, SessionRole::Esme) => ESME_OPEN,
            (SessionState::Outbound, SessionRole::Smsc) => SMSC_OPEN,
            (SessionState::Outbound, SessionRole::Esme) => ESME_OUTBOUND,
            (SessionState::BoundTx | SessionState::BoundRx | SessionState::BoundTrx, _) => BOUND,
            (SessionState::Unbound, _) => UNBOUND,
            (SessionState::Closed, _) => CLOSED,
        }
    }

    /// How an inbound PDU is handled in this state, or `None` if it is not
    /// acceptable here.
    pub fn handler(&self, role: SessionRole, command_id: CommandId) -> Option<Action> {
        let action = self
            .tables(role)
            .iter()
            .flat_map(|table| table.iter())
            .find(|(id, _)| *id == command_id)
            .map(|(_, action)| *action)?;

        if action == Action::Business && !self.can_receive(role, command_id) {
            return None;
        }
        Some(action)
    }
}

impl PartialOrd for SessionState {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self == other {
            return Some(std::cmp::Ordering::Equal);
        }
        match self.phase().cmp(&other.phase()) {
            // The three bound states are peers, not ordered against each other
            std::cmp::Ordering::Equal => None,
            ordering => Some(ordering),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Open => "OPEN",
            SessionState::Outbound => "OUTBOUND",
            SessionState::BoundTx => "BOUND_TX",
            SessionState::BoundRx => "BOUND_RX",
            SessionState::BoundTrx => "BOUND_TRX",
            SessionState::Unbound => "UNBOUND",
            SessionState::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionRole::Esme => f.write_str("ESME"),
            SessionRole::Smsc => f.write_str("SMSC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SessionState; 7] = [
        SessionState::Open,
        SessionState::Outbound,
        SessionState::BoundTx,
        SessionState::BoundRx,
        SessionState::BoundTrx,
        SessionState::Unbound,
        SessionState::Closed,
    ];

    #[test]
    fn transitions_never_go_backwards() {
        for from in ALL {
            for to in ALL {
                if from.can_transition_to(to) {
                    assert!(from < to, "{from} -> {to} goes backwards");
                }
            }
        }
        assert!(SessionState::Open.can_transition_to(SessionState::BoundTrx));
        assert!(SessionState::Outbound.can_transition_to(SessionState::BoundRx));
        assert!(SessionState::BoundTx.can_transition_to(SessionState::Unbound));
        assert!(!SessionState::BoundTx.can_transition_to(SessionState::BoundTrx));
        assert!(!SessionState::Open.can_transition_to(SessionState::Unbound));
        assert!(!SessionState::Closed.can_transition_to(SessionState::Closed));
    }

    #[test]
    fn receiver_cannot_submit() {
        let esme = SessionRole::Esme;
        assert!(!SessionState::BoundRx.can_send(esme, CommandId::SubmitSm));
        assert!(SessionState::BoundTx.can_send(esme, CommandId::SubmitSm));
        assert!(SessionState::BoundTrx.can_send(esme, CommandId::DataSm));
        assert!(!SessionState::BoundTx.can_send(esme, CommandId::DeliverSm));
        assert!(!SessionState::Open.can_send(esme, CommandId::SubmitSm));
    }

    #[test]
    fn smsc_delivers_only_to_receivers() {
        let smsc = SessionRole::Smsc;
        assert!(SessionState::BoundRx.can_send(smsc, CommandId::DeliverSm));
        assert!(SessionState::BoundTrx.can_send(smsc, CommandId::AlertNotification));
        assert!(!SessionState::BoundTx.can_send(smsc, CommandId::DeliverSm));
        assert!(!SessionState::BoundTrx.can_send(smsc, CommandId::SubmitSm));
        assert!(!SessionState::Open.can_send(smsc, CommandId::BindTransceiver));
        assert!(SessionState::Open.can_send(smsc, CommandId::Outbind));
    }

    #[test]
    fn handler_tables() {
        use SessionRole::{Esme, Smsc};

        assert_eq!(
            SessionState::Open.handler(Smsc, CommandId::BindTransceiver),
            Some(Action::Bind)
        );
        assert_eq!(
            SessionState::BoundTrx.handler(Smsc, CommandId::BindTransceiver),
            Some(Action::AlreadyBound)
        );
        assert_eq!(
            SessionState::Open.handler(Esme, CommandId::BindTransceiverResp),
            Some(Action::BindResponse)
        );
        assert_eq!(
            SessionState::BoundTrx.handler(Esme, CommandId::BindTransceiverResp),
            Some(Action::Response)
        );
        assert_eq!(SessionState::Open.handler(Esme, CommandId::Outbind), Some(Action::Outbind));
        assert_eq!(SessionState::Open.handler(Smsc, CommandId::SubmitSm), None);
        assert_eq!(
            SessionState::BoundTx.handler(Smsc, CommandId::SubmitSm),
            Some(Action::Business)
        );
        assert_eq!(SessionState::BoundRx.handler(Smsc, CommandId::SubmitSm), None);
        assert_eq!(
            SessionState::BoundRx.handler(Esme, CommandId::DeliverSm),
            Some(Action::Business)
        );
        assert_eq!(
            SessionState::BoundTx.handler(Esme, CommandId::EnquireLink),
            Some(Action::EnquireLink)
        );
        assert_eq!(SessionState::Unbound.handler(Esme, CommandId::UnbindResp), Some(Action::Response));
        assert_eq!(SessionState::Closed.handler(Esme, CommandId::UnbindResp), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(SessionState::BoundTrx.to_string(), "BOUND_TRX");
        assert_eq!(SessionState::bound(BindType::Receiver), SessionState::BoundRx);
    }
}
