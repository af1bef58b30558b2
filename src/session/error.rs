// ABOUTME: Session error types covering every outcome a caller of the session can observe
// ABOUTME: Timeouts, negative responses and invalid responses stay distinguishable from I/O failures

use crate::codec::CodecError;
use crate::connection::ConnectionError;
use crate::datatypes::{CommandId, CommandStatus};
use crate::session::state::SessionState;
use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The peer answered with a non-zero command_status (or generic_nack)
    #[error("{command_id} rejected by peer: {status}")]
    NegativeResponse {
        command_id: CommandId,
        status: CommandStatus,
    },

    /// No response arrived before the deadline. The session stays usable.
    #[error("no response to {command_id} (sequence {sequence_number}) within {timeout:?}")]
    ResponseTimeout {
        command_id: CommandId,
        sequence_number: u32,
        timeout: Duration,
    },

    /// A response arrived but is not what the request expects
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The operation is not allowed in the current state. Nothing was sent.
    #[error("{operation} not allowed in state {state}")]
    IllegalState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("no bind or outbind received within {0:?}")]
    BindTimeout(Duration),

    #[error("the handshake request has already been waited for")]
    AlreadyWaited,

    #[error("sequence number {0} already has an outstanding request")]
    DuplicateSequence(u32),

    #[error("Connection error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("session closed")]
    Closed,
}

pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// The command_status carried by a negative response, if this is one.
    pub fn command_status(&self) -> Option<CommandStatus> {
        match self {
            SessionError::NegativeResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}
