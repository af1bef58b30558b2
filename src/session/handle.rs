// ABOUTME: The session handle: entry points for both roles, the request primitive and teardown
// ABOUTME: Shared state lives in SessionInner, used by the reader, keep-alive and worker tasks

use crate::connection::{Connection, PduWriter};
use crate::datatypes::{Bind, BindResponse, CommandId, EnquireLink, Outbind, Unbind};
use crate::frame::{Frame, Request};
use crate::session::config::{BindParameters, OutbindParameters, SessionConfig};
use crate::session::error::SessionError;
use crate::session::handler::{MessageHandler, SessionStateListener};
use crate::session::keepalive::{self, Activity, KeepAliveTrigger};
use crate::session::pending::{PendingResponses, PendingSlot};
use crate::session::pool::WorkerPool;
use crate::session::reader;
use crate::session::rendezvous::{BindRequest, OutbindRequest, Rendezvous};
use crate::session::sequence::SequenceGenerator;
use crate::session::state::{SessionRole, SessionState};
use std::fmt;
use std::net::SocketAddr;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// A handle to one SMPP session. Clones share the same session.
///
/// Every session runs a reader task and, when enabled, a keep-alive task.
/// Call `close` (or `unbind_and_close`) to stop them; dropping the handles
/// alone leaves the session running until the peer disconnects.
///
/// # Example
///
/// ```rust,no_run
/// use smpp_session::datatypes::SubmitSm;
/// use smpp_session::session::{BindParameters, DefaultMessageHandler, Session, SessionConfig};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (session, smsc_id) = Session::connect_and_bind(
///     "localhost:2775",
///     BindParameters::transmitter("client1", "pass"),
///     SessionConfig::default(),
///     Arc::new(DefaultMessageHandler),
/// )
/// .await?;
///
/// let response = session.send(SubmitSm::new("1234", "5678", b"Hello".to_vec())).await?;
/// println!("{smsc_id} accepted message {}", response.message_id);
/// session.unbind_and_close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

pub(crate) struct SessionInner {
    id: String,
    role: SessionRole,
    config: SessionConfig,
    state: RwLock<SessionState>,
    listeners: RwLock<Vec<Arc<dyn SessionStateListener>>>,
    sequence: SequenceGenerator,
    pending: Arc<PendingResponses>,
    writer: PduWriter,
    handler: Arc<dyn MessageHandler>,
    pool: WorkerPool,
    activity: Activity,
    keep_alive: KeepAliveTrigger,
    transaction_timeout_ms: AtomicU64,
    enquire_link_interval_ms: AtomicU64,
    bind_rendezvous: Rendezvous<Bind>,
    outbind_rendezvous: Rendezvous<Outbind>,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl Session {
    /// Start a session over an established connection.
    ///
    /// The reader starts immediately with a single worker; the pool grows to
    /// `processor_degree` once the session is bound.
    pub fn open(
        connection: Connection,
        role: SessionRole,
        config: SessionConfig,
        handler: Arc<dyn MessageHandler>,
    ) -> Session {
        let (pdu_reader, writer) = connection.with_max_pdu_size(config.max_pdu_size).into_split();
        let id = config.id_generator.generate();

        let inner = Arc::new(SessionInner {
            id,
            role,
            state: RwLock::new(SessionState::Open),
            listeners: RwLock::new(config.state_listeners.clone()),
            sequence: SequenceGenerator::new(),
            pending: Arc::new(PendingResponses::new()),
            writer,
            handler,
            pool: WorkerPool::new(1),
            activity: Activity::new(),
            keep_alive: KeepAliveTrigger::default(),
            transaction_timeout_ms: AtomicU64::new(millis(config.transaction_timeout)),
            enquire_link_interval_ms: AtomicU64::new(millis(config.keep_alive.interval)),
            bind_rendezvous: Rendezvous::new(),
            outbind_rendezvous: Rendezvous::new(),
            cancel: CancellationToken::new(),
            tasks: TaskTracker::new(),
            config,
        });

        let span = info_span!("session", session_id = %inner.id, %role);
        info!(
            parent: &span,
            peer = ?inner.writer.peer_addr(),
            "session opened"
        );
        inner
            .tasks
            .spawn(reader::run(Arc::clone(&inner), pdu_reader).instrument(span.clone()));
        if inner.config.keep_alive.enabled {
            inner
                .tasks
                .spawn(keepalive::run(Arc::clone(&inner)).instrument(span));
        }
        inner.tasks.close();

        Session { inner }
    }

    /// Connect to an SMSC and bind. Returns the session and the SMSC's system_id.
    ///
    /// On failure, including a negative bind response, the session is closed.
    pub async fn connect_and_bind(
        addr: impl ToSocketAddrs,
        parameters: BindParameters,
        config: SessionConfig,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<(Session, String), SessionError> {
        let connection = Connection::connect(addr).await?;
        let session = Session::open(connection, SessionRole::Esme, config, handler);
        match session.bind(parameters).await {
            Ok(system_id) => Ok((session, system_id)),
            Err(err) => {
                session.close().await;
                Err(err)
            }
        }
    }

    /// Start an SMSC session on an accepted socket. Follow with `wait_for_bind`.
    pub fn accept(
        socket: TcpStream,
        config: SessionConfig,
        handler: Arc<dyn MessageHandler>,
    ) -> Session {
        Session::open(Connection::from_tcp(socket), SessionRole::Smsc, config, handler)
    }

    /// Connect to an ESME, send outbind and wait for the ESME's bind.
    pub async fn connect_and_outbind(
        addr: impl ToSocketAddrs,
        parameters: OutbindParameters,
        config: SessionConfig,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<(Session, BindRequest), SessionError> {
        let connection = Connection::connect(addr).await?;
        let bind_timeout = config.bind_timeout;
        let session = Session::open(connection, SessionRole::Smsc, config, handler);

        let handshake = async {
            session.outbind(parameters).await?;
            session.wait_for_bind(bind_timeout).await
        };
        match handshake.await {
            Ok(request) => Ok((session, request)),
            Err(err) => {
                session.close().await;
                Err(err)
            }
        }
    }

    /// Start an ESME session on a socket an SMSC connected to. Follow with
    /// `wait_for_outbind`.
    pub fn accept_outbound(
        socket: TcpStream,
        config: SessionConfig,
        handler: Arc<dyn MessageHandler>,
    ) -> Session {
        Session::open(Connection::from_tcp(socket), SessionRole::Esme, config, handler)
    }

    /// Wait for the ESME's bind. Can be called once per session.
    pub async fn wait_for_bind(&self, timeout: Duration) -> Result<BindRequest, SessionError> {
        self.require_role(SessionRole::Smsc, "wait_for_bind")?;
        let bind = self.inner.bind_rendezvous.wait(timeout).await?;
        Ok(BindRequest::new(bind, self.clone()))
    }

    /// Wait for the SMSC's outbind. Can be called once per session.
    pub async fn wait_for_outbind(&self, timeout: Duration) -> Result<OutbindRequest, SessionError> {
        self.require_role(SessionRole::Esme, "wait_for_outbind")?;
        let outbind = self.inner.outbind_rendezvous.wait(timeout).await?;
        Ok(OutbindRequest::new(outbind, self.clone()))
    }

    /// Bind over an open (or outbound) ESME session. Returns the SMSC's system_id.
    pub async fn bind(&self, parameters: BindParameters) -> Result<String, SessionError> {
        let bind_type = parameters.bind_type;
        let response: BindResponse = self
            .inner
            .request(parameters.to_bind(), self.inner.config.bind_timeout)
            .await?;

        // The reader normally moves the state when the response arrives
        if !self.state().is_bound() {
            self.inner.transition(SessionState::bound(bind_type))?;
            self.inner.on_bound();
        }
        info!(
            session_id = %self.inner.id,
            smsc = %response.system_id,
            %bind_type,
            sc_interface_version = ?response.sc_interface_version(),
            "bound"
        );
        Ok(response.system_id)
    }

    /// Send outbind from an SMSC session; the state becomes OUTBOUND.
    pub async fn outbind(&self, parameters: OutbindParameters) -> Result<(), SessionError> {
        self.inner.check_outbound(CommandId::Outbind)?;
        let outbind = Outbind::new(
            self.inner.sequence.next(),
            parameters.system_id,
            parameters.password,
        );
        let bytes = Frame::from(outbind).to_bytes()?;
        self.inner.transition(SessionState::Outbound)?;
        self.inner.write_bytes(&bytes).await
    }

    /// Send a request with the session's transaction timeout and wait for its response.
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, SessionError> {
        self.inner.request(request, self.transaction_timeout()).await
    }

    /// Send a request and wait at most `timeout` for its response.
    ///
    /// The sequence number is assigned here. Requests that the current state
    /// does not allow fail with `IllegalState` before anything is written.
    pub async fn send_with_timeout<R: Request>(
        &self,
        request: R,
        timeout: Duration,
    ) -> Result<R::Response, SessionError> {
        self.inner.request(request, timeout).await
    }

    pub async fn enquire_link(&self) -> Result<(), SessionError> {
        self.send(EnquireLink::new(0)).await.map(|_| ())
    }

    /// Exchange unbind/unbind_resp; the state becomes UNBOUND.
    pub async fn unbind(&self) -> Result<(), SessionError> {
        self.send(Unbind::new(0)).await?;
        if let Err(err) = self.inner.transition(SessionState::Unbound) {
            // The peer may already have closed the connection
            debug!(session_id = %self.inner.id, %err, "unbind completed after teardown");
        }
        Ok(())
    }

    /// Unbind if bound, then close regardless of the unbind outcome.
    pub async fn unbind_and_close(&self) -> Result<(), SessionError> {
        let result = if self.state().is_bound() {
            self.unbind().await
        } else {
            Ok(())
        };
        self.close().await;
        result
    }

    /// Close without any handshake.
    ///
    /// Idempotent. When this returns the reader and keep-alive tasks have
    /// stopped and no callback is running or will run.
    pub async fn close(&self) {
        self.inner.terminate();
        self.inner.tasks.wait().await;
        self.inner.pool.wait().await;
    }

    pub fn set_transaction_timeout(&self, timeout: Duration) {
        self.inner
            .transaction_timeout_ms
            .store(millis(timeout), Ordering::Release);
    }

    pub fn transaction_timeout(&self) -> Duration {
        self.inner.transaction_timeout()
    }

    /// Change the idle window after which an enquire_link is sent. Takes
    /// effect from the next read.
    pub fn set_enquire_link_interval(&self, interval: Duration) {
        self.inner
            .enquire_link_interval_ms
            .store(millis(interval), Ordering::Release);
    }

    pub fn enquire_link_interval(&self) -> Duration {
        self.inner.enquire_link_interval()
    }

    pub fn add_state_listener(&self, listener: impl SessionStateListener) {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    pub fn session_id(&self) -> &str {
        &self.inner.id
    }

    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    pub fn role(&self) -> SessionRole {
        self.inner.role
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.inner.writer.peer_addr()
    }

    /// Bytes written to the connection so far.
    pub fn bytes_written(&self) -> u64 {
        self.inner.writer.bytes_written()
    }

    /// Requests still waiting for a response.
    pub fn pending_requests(&self) -> usize {
        self.inner.pending.len()
    }

    pub fn processor_degree(&self) -> usize {
        self.inner.pool.degree()
    }

    pub(crate) fn inner(&self) -> &Arc<SessionInner> {
        &self.inner
    }

    fn require_role(&self, role: SessionRole, operation: &'static str) -> Result<(), SessionError> {
        if self.inner.role == role {
            Ok(())
        } else {
            Err(SessionError::IllegalState {
                operation,
                state: self.state(),
            })
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("role", &self.inner.role)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionInner {
    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn role(&self) -> SessionRole {
        self.role
    }

    pub(crate) fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub(crate) fn state(&self) -> SessionState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn handler(&self) -> &Arc<dyn MessageHandler> {
        &self.handler
    }

    pub(crate) fn pending(&self) -> &PendingResponses {
        &self.pending
    }

    pub(crate) fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub(crate) fn activity(&self) -> &Activity {
        &self.activity
    }

    pub(crate) fn keep_alive_trigger(&self) -> &KeepAliveTrigger {
        &self.keep_alive
    }

    pub(crate) fn bind_rendezvous(&self) -> &Rendezvous<Bind> {
        &self.bind_rendezvous
    }

    pub(crate) fn outbind_rendezvous(&self) -> &Rendezvous<Outbind> {
        &self.outbind_rendezvous
    }

    pub(crate) fn writer(&self) -> &PduWriter {
        &self.writer
    }

    pub(crate) async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    pub(crate) fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms.load(Ordering::Acquire))
    }

    pub(crate) fn enquire_link_interval(&self) -> Duration {
        Duration::from_millis(self.enquire_link_interval_ms.load(Ordering::Acquire))
    }

    pub(crate) fn keep_alive_timeout(&self) -> Duration {
        self.config
            .keep_alive
            .response_timeout(self.transaction_timeout())
    }

    /// Move to `next`, notifying listeners. Fails if the transition is not legal.
    pub(crate) fn transition(&self, next: SessionState) -> Result<SessionState, SessionError> {
        let old = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let old = *state;
            if !old.can_transition_to(next) {
                return Err(SessionError::IllegalState {
                    operation: "state transition",
                    state: old,
                });
            }
            *state = next;
            old
        };

        info!(session_id = %self.id, from = %old, to = %next, "session state changed");
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            let notified =
                catch_unwind(AssertUnwindSafe(|| listener.on_state_change(next, old, &self.id)));
            if notified.is_err() {
                error!(session_id = %self.id, "state listener panicked");
            }
        }
        Ok(old)
    }

    /// Grow the worker pool once bound.
    pub(crate) fn on_bound(&self) {
        self.pool.grow_to(self.config.processor_degree);
    }

    /// Move to CLOSED and stop everything. Does not wait; `Session::close` does.
    pub(crate) fn terminate(&self) {
        if self.transition(SessionState::Closed).is_err() {
            return;
        }
        self.cancel.cancel();
        self.pool.shutdown();
        self.pending.fail_all();
    }

    pub(crate) fn check_outbound(&self, command_id: CommandId) -> Result<(), SessionError> {
        let state = self.state();
        if state == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        if !state.can_send(self.role, command_id) {
            return Err(SessionError::IllegalState {
                operation: command_id.name(),
                state,
            });
        }
        Ok(())
    }

    /// The request primitive: check legality, stamp a sequence number,
    /// register the pending slot, write, await.
    pub(crate) async fn request<R: Request>(
        &self,
        mut request: R,
        timeout: Duration,
    ) -> Result<R::Response, SessionError> {
        let command_id = request.command_id();
        self.check_outbound(command_id)?;

        let sequence_number = self.sequence.next();
        request.set_sequence_number(sequence_number);
        let bytes = request.to_bytes()?;

        // The slot removes itself if the write fails or the wait is abandoned
        let slot = self.register_pending(sequence_number, command_id)?;
        debug!(session_id = %self.id, command = %command_id, sequence_number, "sending request");
        self.write_bytes(&bytes).await?;

        let frame = slot.wait(timeout).await?;
        expect_response::<R>(command_id, frame)
    }

    /// Register a pending slot unless the session closed meanwhile.
    ///
    /// `terminate` may drain the table between the state check and the
    /// registration, and nothing would ever fail a slot added after that.
    fn register_pending(
        &self,
        sequence_number: u32,
        command_id: CommandId,
    ) -> Result<PendingSlot, SessionError> {
        let slot = self.pending.register(sequence_number, command_id)?;
        if self.state() == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        Ok(slot)
    }

    pub(crate) async fn write_frame(&self, frame: &Frame) -> Result<(), SessionError> {
        let bytes = frame.to_bytes()?;
        self.write_bytes(&bytes).await
    }

    /// Write raw PDU bytes within the transaction timeout. A failed or
    /// stalled write is fatal to the session.
    pub(crate) async fn write_bytes(&self, bytes: &[u8]) -> Result<(), SessionError> {
        if let Err(err) = self.writer.write_pdu(bytes, self.transaction_timeout()).await {
            warn!(session_id = %self.id, %err, "write failed, closing session");
            self.terminate();
            return Err(err.into());
        }
        Ok(())
    }
}

fn expect_response<R: Request>(command_id: CommandId, frame: Frame) -> Result<R::Response, SessionError> {
    let status = frame.command_status();
    if !status.is_ok() {
        return Err(SessionError::NegativeResponse { command_id, status });
    }
    if let Frame::GenericNack(_) = frame {
        return Err(SessionError::InvalidResponse(format!(
            "generic_nack without an error status for {command_id}"
        )));
    }
    // One Rust type covers all three bind responses, so check the id too
    if command_id.response() != Some(frame.command_id()) {
        return Err(SessionError::InvalidResponse(format!(
            "{command_id} answered with {}",
            frame.command_id()
        )));
    }
    R::Response::try_from(frame).map_err(|other| {
        SessionError::InvalidResponse(format!(
            "{command_id} answered with {}",
            other.command_id()
        ))
    })
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{
        BindType, CommandStatus, EnquireLinkResponse, GenericNack, SubmitSmResponse,
    };

    #[test]
    fn negative_status_becomes_negative_response() {
        let frame = Frame::from(SubmitSmResponse::error(3, CommandStatus::ThrottlingError));
        let err = expect_response::<crate::datatypes::SubmitSm>(CommandId::SubmitSm, frame)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::NegativeResponse {
                command_id: CommandId::SubmitSm,
                status: CommandStatus::ThrottlingError
            }
        ));
    }

    #[test]
    fn generic_nack_is_a_negative_response() {
        let frame = Frame::from(GenericNack::invalid_command_id(3));
        let err = expect_response::<Bind>(CommandId::BindTransceiver, frame).unwrap_err();
        assert_eq!(err.command_status(), Some(CommandStatus::InvalidCommandId));
    }

    #[test]
    fn mismatched_response_is_invalid() {
        let frame = Frame::from(EnquireLinkResponse::new(3));
        let err = expect_response::<Bind>(CommandId::BindTransmitter, frame).unwrap_err();
        assert!(matches!(err, SessionError::InvalidResponse(_)));

        let frame = Frame::from(BindResponse::new(BindType::Receiver, 3, "smsc"));
        let response = expect_response::<Bind>(CommandId::BindReceiver, frame).unwrap();
        assert_eq!(response.system_id, "smsc");
    }

    #[test]
    fn bind_response_of_another_type_is_invalid() {
        let frame = Frame::from(BindResponse::new(BindType::Receiver, 3, "smsc"));
        let err = expect_response::<Bind>(CommandId::BindTransmitter, frame).unwrap_err();
        assert!(matches!(err, SessionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn registration_racing_terminate_is_refused() {
        let (ours, _theirs) = tokio::io::duplex(1024);
        let session = Session::open(
            Connection::new(ours, None),
            SessionRole::Esme,
            SessionConfig::default(),
            Arc::new(crate::session::DefaultMessageHandler),
        );
        let inner = session.inner();
        // terminate lands after check_outbound passed but before the slot exists
        inner.check_outbound(CommandId::EnquireLink).unwrap();
        inner.terminate();

        let err = inner.register_pending(7, CommandId::EnquireLink).unwrap_err();
        assert!(matches!(err, SessionError::Closed));
        assert_eq!(session.pending_requests(), 0);
        session.close().await;
    }
}
