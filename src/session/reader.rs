// ABOUTME: Per-session read loop that frames, decodes and dispatches inbound PDUs
// ABOUTME: Responses complete pending requests; business requests go to the worker pool

use crate::codec::{CodecError, decode_pdu, header_only_bytes};
use crate::connection::{ConnectionError, PduReader, ReadEvent};
use crate::datatypes::{
    BindResponse, BindType, CommandId, CommandStatus, EnquireLinkResponse, GenericNack,
    UnbindResponse,
};
use crate::frame::Frame;
use crate::session::error::SessionError;
use crate::session::handle::SessionInner;
use crate::session::handler::process_request;
use crate::session::state::{Action, SessionState};
use bytes::Bytes;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const RESPONSE_BIT: u32 = 0x8000_0000;

/// How long teardown waits to flush what is still buffered for the peer.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Read PDUs until the session closes.
pub(crate) async fn run(inner: Arc<SessionInner>, mut reader: PduReader) {
    loop {
        let idle = inner.enquire_link_interval();
        let event = tokio::select! {
            _ = inner.cancelled() => break,
            event = reader.read_pdu(idle) => event,
        };

        match event {
            Ok(ReadEvent::Pdu(bytes)) => {
                inner.activity().touch();
                // Answering may block on a peer that stopped reading
                let processed = tokio::select! {
                    _ = inner.cancelled() => break,
                    processed = process(&inner, bytes) => processed,
                };
                if let Err(err) = processed {
                    warn!(%err, "could not answer PDU");
                }
            }
            Ok(ReadEvent::Idle) => {
                if inner.config().keep_alive.enabled {
                    inner.keep_alive_trigger().signal();
                }
            }
            Ok(ReadEvent::Eof) => {
                info!("connection closed by peer");
                inner.terminate();
                break;
            }
            Err(ConnectionError::InvalidLength { length, .. }) => {
                // The PDU boundary is lost; nothing after this can be framed
                warn!(length, "invalid command_length, sending generic_nack and closing");
                let nack = Frame::from(GenericNack::unknown_sequence());
                if let Err(err) = inner.write_frame(&nack).await {
                    debug!(%err, "generic_nack not delivered");
                }
                inner.terminate();
                break;
            }
            Err(err) => {
                error!(%err, "read failed, closing session");
                inner.terminate();
                break;
            }
        }
    }

    if let Err(err) = inner.writer().shutdown(SHUTDOWN_GRACE).await {
        debug!(%err, "connection shutdown failed");
    }
    debug!("reader stopped");
}

/// Decode one PDU and act on it.
async fn process(inner: &Arc<SessionInner>, bytes: Bytes) -> Result<(), SessionError> {
    let raw_command_id = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let sequence_number = u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let frame = match decode_pdu(&bytes) {
        Ok(frame) => frame,
        Err(CodecError::InvalidCommandId { command_id, .. }) => {
            warn!(command_id = %format!("{command_id:#010x}"), sequence_number, "unknown command_id");
            let nack = Frame::from(GenericNack::invalid_command_id(sequence_number));
            return inner.write_frame(&nack).await;
        }
        Err(err) if raw_command_id & RESPONSE_BIT != 0 => {
            warn!(%err, sequence_number, "undecodable response");
            if !inner
                .pending()
                .fail(sequence_number, SessionError::InvalidResponse(err.to_string()))
            {
                warn!(sequence_number, "undecodable response matches no request");
            }
            return Ok(());
        }
        Err(err) => {
            let status = err.to_command_status();
            warn!(%err, %status, sequence_number, "rejecting malformed request");
            if matches!(
                CommandId::try_from(raw_command_id),
                Ok(CommandId::Outbind | CommandId::AlertNotification)
            ) {
                return Ok(());
            }
            let response = header_only_bytes(
                CommandId::response_id_of(raw_command_id),
                status,
                sequence_number,
            );
            return inner.write_bytes(&response).await;
        }
    };

    dispatch(inner, frame).await
}

async fn dispatch(inner: &Arc<SessionInner>, frame: Frame) -> Result<(), SessionError> {
    let command_id = frame.command_id();
    let sequence_number = frame.sequence_number();
    let state = inner.state();
    debug!(command = %command_id, sequence_number, %state, "received PDU");

    let Some(action) = state.handler(inner.role(), command_id) else {
        return reject_in_state(inner, command_id, sequence_number, state).await;
    };

    match action {
        Action::Response => {
            if !inner.pending().fulfil(sequence_number, frame) {
                warn!(command = %command_id, sequence_number, "dropping unmatched response");
            }
            Ok(())
        }
        Action::BindResponse => {
            // Bind before waking the caller so PDUs right behind the
            // response are handled in the bound state. Only a positive
            // response to the bind type that was requested counts.
            let requested = inner.pending().command_id(sequence_number);
            let bind_type = BindType::from_command_id(command_id)
                .filter(|bind_type| requested == Some(bind_type.command_id()));
            if let (true, Some(bind_type)) = (frame.command_status().is_ok(), bind_type) {
                inner.transition(SessionState::bound(bind_type))?;
                inner.on_bound();
            }
            if !inner.pending().fulfil(sequence_number, frame) {
                warn!(command = %command_id, sequence_number, "dropping unmatched bind response");
            }
            Ok(())
        }
        Action::EnquireLink => {
            if let Frame::EnquireLink(enquire_link) = &frame {
                let handler = inner.handler();
                if catch_unwind(AssertUnwindSafe(|| handler.on_enquire_link(enquire_link))).is_err() {
                    error!("enquire_link hook panicked");
                }
            }
            inner
                .write_frame(&EnquireLinkResponse::new(sequence_number).into())
                .await
        }
        Action::Unbind => {
            info!(sequence_number, "unbind received");
            inner.transition(SessionState::Unbound)?;
            let result = inner
                .write_frame(&UnbindResponse::new(sequence_number).into())
                .await;
            inner.terminate();
            result
        }
        Action::Bind => {
            let Frame::Bind(bind) = frame else {
                return Ok(());
            };
            let bind_type = bind.bind_type;
            info!(system_id = %bind.system_id, %bind_type, "bind received");
            if inner.bind_rendezvous().publish(bind) {
                return Ok(());
            }
            warn!(sequence_number, "bind already received or nobody is waiting for it");
            let response = BindResponse::error(bind_type, sequence_number, CommandStatus::IncorrectBindStatus);
            inner.write_frame(&response.into()).await
        }
        Action::AlreadyBound => {
            let response = header_only_bytes(
                CommandId::response_id_of(command_id as u32),
                CommandStatus::AlreadyBoundState,
                sequence_number,
            );
            inner.write_bytes(&response).await
        }
        Action::Outbind => {
            let Frame::Outbind(outbind) = frame else {
                return Ok(());
            };
            info!(system_id = %outbind.system_id, "outbind received");
            inner.transition(SessionState::Outbound)?;
            if !inner.outbind_rendezvous().publish(outbind) {
                warn!("outbind arrived but nobody is waiting for it");
            }
            Ok(())
        }
        Action::Business => {
            let worker = Arc::clone(inner);
            let spawned = inner.pool().spawn(run_callback(worker, frame)).await;
            if !spawned {
                debug!(command = %command_id, sequence_number, "session closing, request dropped");
            }
            Ok(())
        }
    }
}

/// Answer a request the current state does not accept.
async fn reject_in_state(
    inner: &Arc<SessionInner>,
    command_id: CommandId,
    sequence_number: u32,
    state: SessionState,
) -> Result<(), SessionError> {
    if command_id.is_response() {
        warn!(command = %command_id, sequence_number, %state, "dropping response not expected in this state");
        return Ok(());
    }
    let Some(response_id) = command_id.response() else {
        warn!(command = %command_id, sequence_number, %state, "dropping PDU not allowed in this state");
        return Ok(());
    };
    warn!(command = %command_id, sequence_number, %state, "rejecting request not allowed in this state");
    let response = header_only_bytes(
        response_id as u32,
        CommandStatus::IncorrectBindStatus,
        sequence_number,
    );
    inner.write_bytes(&response).await
}

/// Worker body: run the callback on the blocking pool and send its response.
async fn run_callback(inner: Arc<SessionInner>, frame: Frame) {
    let command_id = frame.command_id();
    let sequence_number = frame.sequence_number();
    let handler = Arc::clone(inner.handler());

    let outcome = tokio::task::spawn_blocking(move || process_request(handler.as_ref(), frame)).await;
    let written = match outcome {
        Ok(Some(response)) => inner.write_frame(&response).await,
        Ok(None) => return,
        Err(err) => {
            error!(command = %command_id, sequence_number, %err, "callback failed");
            let Some(response_id) = command_id.response() else {
                return;
            };
            let response =
                header_only_bytes(response_id as u32, CommandStatus::SystemError, sequence_number);
            inner.write_bytes(&response).await
        }
    };
    if let Err(err) = written {
        warn!(command = %command_id, sequence_number, %err, "response not sent");
    }
}
