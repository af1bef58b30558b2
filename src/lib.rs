//! SMPP session engine
//!
//! A tokio implementation of the SMPP 3.4 session layer, with the SMPP 5.0
//! broadcast commands:
//!
//! * [`codec`] and [`datatypes`] - the binary PDU format, field validation and TLVs
//! * [`frame`] - any decoded PDU, and the pairing of requests with responses
//! * [`connection`] - framed reading and writing over a byte stream
//! * [`session`] - bind/outbind handshakes, request correlation, the
//!   per-state dispatch of inbound PDUs and the enquire_link keep-alive
//!
//! # Examples
//!
//! ## Sending a message as an ESME
//!
//! ```rust,no_run
//! use smpp_session::datatypes::SubmitSm;
//! use smpp_session::session::{BindParameters, DefaultMessageHandler, Session, SessionConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (session, _smsc) = Session::connect_and_bind(
//!         "localhost:2775",
//!         BindParameters::transmitter("system_id", "password"),
//!         SessionConfig::default(),
//!         Arc::new(DefaultMessageHandler),
//!     )
//!     .await?;
//!
//!     let submit = SubmitSm::new("0987654321", "1234567890", b"Hello, World!".to_vec());
//!     let response = session.send(submit).await?;
//!     println!("Message sent with ID: {}", response.message_id);
//!
//!     session.unbind_and_close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Receiving messages
//!
//! ```rust,no_run
//! use smpp_session::datatypes::DeliverSm;
//! use smpp_session::session::{
//!     BindParameters, MessageHandler, ProcessResult, Session, SessionConfig,
//! };
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl MessageHandler for Printer {
//!     fn on_deliver_sm(&self, deliver: &DeliverSm) -> ProcessResult<()> {
//!         println!("from {}: {:?}", deliver.source, deliver.short_message);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (session, _smsc) = Session::connect_and_bind(
//!         "localhost:2775",
//!         BindParameters::receiver("system_id", "password"),
//!         SessionConfig::default(),
//!         Arc::new(Printer),
//!     )
//!     .await?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
//!     session.unbind_and_close().await?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod connection;
pub mod datatypes;
pub mod frame;
pub mod ids;
mod macros;
pub mod session;


pub use codec::{CodecError, Decodable, Encodable, PduHeader, PduRegistry, decode_pdu};
pub use connection::{Connection, ConnectionError};
pub use frame::{Frame, Request};
pub use session::{
    BindParameters, BindRequest, KeepAliveConfig, MessageHandler, OutbindParameters,
    OutbindRequest, Session, SessionConfig, SessionError, SessionRole, SessionState,
};
