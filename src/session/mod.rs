// ABOUTME: SMPP session engine: lifecycle state machine, request correlation, reader and keep-alive
// ABOUTME: Exports the Session handle together with its configuration, callbacks and errors

//! SMPP Session Module
//!
//! One `Session` per connection, for either side of the protocol:
//!
//! * **Correlation** - requests get a fresh sequence number and wait on a
//!   pending slot; responses may complete in any order
//! * **State machine** - OPEN, OUTBOUND, BOUND_TX/RX/TRX, UNBOUND, CLOSED,
//!   with per-state handler tables deciding what each inbound PDU does
//! * **Reader and workers** - one read loop per session, business callbacks
//!   on a worker pool that grows once the session is bound
//! * **Keep-alive** - an enquire_link when the link goes idle; the session
//!   closes if it is not answered
//! * **Handshakes** - `wait_for_bind` / `wait_for_outbind` hand the peer's
//!   proposal to the application, which accepts or rejects it
//!
//! ## SMSC side
//!
//! ```rust,no_run
//! use smpp_session::datatypes::CommandStatus;
//! use smpp_session::session::{DefaultMessageHandler, Session, SessionConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio::net::TcpListener;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let listener = TcpListener::bind("0.0.0.0:2775").await?;
//! let (socket, _) = listener.accept().await?;
//!
//! let session = Session::accept(socket, SessionConfig::default(), Arc::new(DefaultMessageHandler));
//! let request = session.wait_for_bind(Duration::from_secs(10)).await?;
//! if request.password() == "secret" {
//!     request.accept("smsc1").await?;
//! } else {
//!     request.reject(CommandStatus::InvalidPassword).await?;
//!     session.close().await;
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod handle;
mod handler;
mod keepalive;
mod pending;
mod pool;
mod reader;
mod rendezvous;
mod sequence;
mod state;

pub use config::{BindParameters, KeepAliveConfig, OutbindParameters, SessionConfig};
pub use error::{SessionError, SessionResult};
pub use handle::Session;
pub use handler::{
    DefaultMessageHandler, MessageHandler, ProcessRequestError, ProcessResult, QuerySmResult,
    SessionStateListener, SubmitMultiResult,
};
pub use pending::{PendingResponses, PendingSlot};
pub use rendezvous::{BindRequest, OutbindRequest};
pub use sequence::SequenceGenerator;
pub use state::{Action, Flow, SessionRole, SessionState};
