// ABOUTME: Application callback contracts invoked by the session for inbound business PDUs
// ABOUTME: Maps callback outcomes onto the matching response PDU, negative responses included

use crate::datatypes::*;
use crate::frame::Frame;
use crate::session::state::SessionState;
use thiserror::Error;
use tracing::warn;

/// A callback refused a request; the peer gets a negative response with `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request rejected with {status}")]
pub struct ProcessRequestError {
    pub status: CommandStatus,
}

impl ProcessRequestError {
    pub fn new(status: CommandStatus) -> Self {
        Self { status }
    }
}

impl From<CommandStatus> for ProcessRequestError {
    fn from(status: CommandStatus) -> Self {
        Self { status }
    }
}

pub type ProcessResult<T> = Result<T, ProcessRequestError>;

fn unsupported<T>() -> ProcessResult<T> {
    Err(ProcessRequestError::new(CommandStatus::InvalidCommandId))
}

/// Accepted submit_multi: the assigned message id and the destinations
/// that could not be served.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitMultiResult {
    pub message_id: String,
    pub unsuccessful: Vec<UnsuccessfulDelivery>,
}

/// Answer to query_sm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySmResult {
    pub final_date: String,
    pub message_state: u8,
    pub error_code: u8,
}

/// Callbacks for inbound business requests.
///
/// Every request callback defaults to rejecting with ESME_RINVCMDID, so an
/// implementation only overrides what its side of the protocol handles.
/// Callbacks run on the blocking thread pool and may block.
///
/// # Example
///
/// ```rust
/// use smpp_session::datatypes::SubmitSm;
/// use smpp_session::session::{MessageHandler, ProcessResult};
///
/// struct Accepting;
///
/// impl MessageHandler for Accepting {
///     fn on_submit_sm(&self, _submit: &SubmitSm) -> ProcessResult<String> {
///         Ok("msg-1".to_string())
///     }
/// }
/// ```
pub trait MessageHandler: Send + Sync + 'static {
    /// Returns the assigned message id
    fn on_submit_sm(&self, _submit: &SubmitSm) -> ProcessResult<String> {
        unsupported()
    }

    fn on_submit_multi(&self, _submit: &SubmitMulti) -> ProcessResult<SubmitMultiResult> {
        unsupported()
    }

    fn on_deliver_sm(&self, _deliver: &DeliverSm) -> ProcessResult<()> {
        unsupported()
    }

    /// Returns the assigned message id
    fn on_data_sm(&self, _data: &DataSm) -> ProcessResult<String> {
        unsupported()
    }

    fn on_query_sm(&self, _query: &QuerySm) -> ProcessResult<QuerySmResult> {
        unsupported()
    }

    fn on_cancel_sm(&self, _cancel: &CancelSm) -> ProcessResult<()> {
        unsupported()
    }

    fn on_replace_sm(&self, _replace: &ReplaceSm) -> ProcessResult<()> {
        unsupported()
    }

    /// alert_notification has no response.
    fn on_alert_notification(&self, _alert: &AlertNotification) {}

    /// Returns the assigned message id
    fn on_broadcast_sm(&self, _broadcast: &BroadcastSm) -> ProcessResult<String> {
        unsupported()
    }

    /// Returns the optional parameters of the response (message_state,
    /// broadcast_area_identifier, broadcast_area_success)
    fn on_query_broadcast_sm(&self, _query: &QueryBroadcastSm) -> ProcessResult<OptionalParameters> {
        unsupported()
    }

    fn on_cancel_broadcast_sm(&self, _cancel: &CancelBroadcastSm) -> ProcessResult<()> {
        unsupported()
    }

    /// Called from the read loop for every enquire_link; keep it short.
    fn on_enquire_link(&self, _enquire_link: &EnquireLink) {}
}

/// A handler that accepts nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMessageHandler;

impl MessageHandler for DefaultMessageHandler {}

/// Observer of session state changes.
pub trait SessionStateListener: Send + Sync + 'static {
    fn on_state_change(&self, new_state: SessionState, old_state: SessionState, session_id: &str);
}

impl<F> SessionStateListener for F
where
    F: Fn(SessionState, SessionState, &str) + Send + Sync + 'static,
{
    fn on_state_change(&self, new_state: SessionState, old_state: SessionState, session_id: &str) {
        self(new_state, old_state, session_id)
    }
}

/// Run the callback for one inbound request and build its response.
///
/// Returns `None` for requests that are never answered.
pub(crate) fn process_request(handler: &dyn MessageHandler, frame: Frame) -> Option<Frame> {
    let seq = frame.sequence_number();
    let response = match frame {
        Frame::SubmitSm(submit) => match handler.on_submit_sm(&submit) {
            Ok(message_id) => SubmitSmResponse::new(seq, message_id).into(),
            Err(err) => SubmitSmResponse::error(seq, err.status).into(),
        },
        Frame::SubmitMulti(submit) => match handler.on_submit_multi(&submit) {
            Ok(result) => {
                let mut response = SubmitMultiResponse::new(seq, result.message_id);
                response.unsuccessful = result.unsuccessful;
                response.into()
            }
            Err(err) => SubmitMultiResponse::error(seq, err.status).into(),
        },
        Frame::DeliverSm(deliver) => match handler.on_deliver_sm(&deliver) {
            Ok(()) => DeliverSmResponse::new(seq, "").into(),
            Err(err) => DeliverSmResponse::error(seq, err.status).into(),
        },
        Frame::DataSm(data) => match handler.on_data_sm(&data) {
            Ok(message_id) => DataSmResponse::new(seq, message_id).into(),
            Err(err) => DataSmResponse::error(seq, err.status).into(),
        },
        Frame::QuerySm(query) => match handler.on_query_sm(&query) {
            Ok(result) => {
                let mut response =
                    QuerySmResponse::new(seq, query.message_id.clone(), result.message_state);
                response.final_date = result.final_date;
                response.error_code = result.error_code;
                response.into()
            }
            Err(err) => QuerySmResponse::error(seq, err.status).into(),
        },
        Frame::CancelSm(cancel) => match handler.on_cancel_sm(&cancel) {
            Ok(()) => CancelSmResponse::new(seq).into(),
            Err(err) => CancelSmResponse::error(seq, err.status).into(),
        },
        Frame::ReplaceSm(replace) => match handler.on_replace_sm(&replace) {
            Ok(()) => ReplaceSmResponse::new(seq).into(),
            Err(err) => ReplaceSmResponse::error(seq, err.status).into(),
        },
        Frame::AlertNotification(alert) => {
            handler.on_alert_notification(&alert);
            return None;
        }
        Frame::BroadcastSm(broadcast) => match handler.on_broadcast_sm(&broadcast) {
            Ok(message_id) => BroadcastSmResponse::new(seq, message_id).into(),
            Err(err) => BroadcastSmResponse::error(seq, err.status).into(),
        },
        Frame::QueryBroadcastSm(query) => match handler.on_query_broadcast_sm(&query) {
            Ok(optional_parameters) => {
                let mut response = QueryBroadcastSmResponse::new(seq, query.message_id.clone());
                response.optional_parameters = optional_parameters;
                response.into()
            }
            Err(err) => QueryBroadcastSmResponse::error(seq, err.status).into(),
        },
        Frame::CancelBroadcastSm(cancel) => match handler.on_cancel_broadcast_sm(&cancel) {
            Ok(()) => CancelBroadcastSmResponse::new(seq).into(),
            Err(err) => CancelBroadcastSmResponse::error(seq, err.status).into(),
        },
        other => {
            warn!(command = %other.command_id(), "no callback for command");
            return None;
        }
    };
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        delivered: Mutex<Vec<String>>,
    }

    impl MessageHandler for Recording {
        fn on_deliver_sm(&self, deliver: &DeliverSm) -> ProcessResult<()> {
            let text = String::from_utf8_lossy(&deliver.short_message).into_owned();
            self.delivered.lock().unwrap().push(text);
            Ok(())
        }

        fn on_query_sm(&self, _query: &QuerySm) -> ProcessResult<QuerySmResult> {
            Err(CommandStatus::QuerySmRequestFailed.into())
        }
    }

    #[test]
    fn defaults_reject_with_invalid_command_id() {
        let mut submit = SubmitSm::new("1", "2", b"hi".to_vec());
        submit.sequence_number = 4;

        let response = process_request(&DefaultMessageHandler, submit.into()).unwrap();
        assert_eq!(response.command_id(), CommandId::SubmitSmResp);
        assert_eq!(response.command_status(), CommandStatus::InvalidCommandId);
        assert_eq!(response.sequence_number(), 4);
    }

    #[test]
    fn callback_outcomes_become_responses() {
        let handler = Recording {
            delivered: Mutex::new(Vec::new()),
        };

        let mut deliver = DeliverSm::new("1", "2", b"hello".to_vec());
        deliver.sequence_number = 11;
        let response = process_request(&handler, deliver.into()).unwrap();
        assert_eq!(response, Frame::from(DeliverSmResponse::new(11, "")));
        assert_eq!(handler.delivered.lock().unwrap().as_slice(), ["hello"]);

        let mut query = QuerySm::new("m1", "1");
        query.sequence_number = 12;
        let response = process_request(&handler, query.into()).unwrap();
        assert_eq!(response.command_status(), CommandStatus::QuerySmRequestFailed);
    }

    #[test]
    fn alert_notification_has_no_response() {
        let alert = AlertNotification::new("1", "2");
        assert!(process_request(&DefaultMessageHandler, alert.into()).is_none());
    }

    #[test]
    fn closures_are_listeners() {
        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&seen);
        let listener = move |new: SessionState, old: SessionState, id: &str| {
            sink.lock().unwrap().push((new, old, id.to_string()));
        };
        listener.on_state_change(SessionState::BoundTrx, SessionState::Open, "s1");
        assert_eq!(
            seen.lock().unwrap()[0],
            (SessionState::BoundTrx, SessionState::Open, "s1".to_string())
        );
    }
}
