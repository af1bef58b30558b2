// ABOUTME: Single-use hand-off of the peer's bind or outbind from the reader to a waiting caller
// ABOUTME: The caller answers with accept or reject, each consuming the request so it happens once

use crate::datatypes::{Address, Bind, BindResponse, BindType, CommandStatus, InterfaceVersion, Outbind};
use crate::session::config::BindParameters;
use crate::session::error::SessionError;
use crate::session::handle::Session;
use crate::session::state::SessionState;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::info;

/// One-shot slot: published at most once by the reader, waited on at most once.
#[derive(Debug)]
pub(crate) struct Rendezvous<T> {
    tx: Mutex<Option<oneshot::Sender<T>>>,
    rx: Mutex<Option<oneshot::Receiver<T>>>,
}

impl<T> Rendezvous<T> {
    pub(crate) fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            tx: Mutex::new(Some(tx)),
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Hand over the value. Returns false if something was already published
    /// or the waiter has given up.
    pub(crate) fn publish(&self, value: T) -> bool {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
        match tx {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }

    pub(crate) async fn wait(&self, timeout: Duration) -> Result<T, SessionError> {
        let rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner).take();
        let Some(rx) = rx else {
            return Err(SessionError::AlreadyWaited);
        };
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(SessionError::Closed),
            Err(_) => Err(SessionError::BindTimeout(timeout)),
        }
    }
}

/// A bind received by an SMSC session, awaiting the application's decision.
#[derive(Debug)]
pub struct BindRequest {
    bind: Bind,
    session: Session,
}

impl BindRequest {
    pub(crate) fn new(bind: Bind, session: Session) -> Self {
        Self { bind, session }
    }

    pub fn bind_type(&self) -> BindType {
        self.bind.bind_type
    }

    pub fn system_id(&self) -> &str {
        &self.bind.system_id
    }

    pub fn password(&self) -> &str {
        &self.bind.password
    }

    pub fn system_type(&self) -> &str {
        &self.bind.system_type
    }

    pub fn interface_version(&self) -> InterfaceVersion {
        self.bind.interface_version
    }

    pub fn address_range(&self) -> &Address {
        &self.bind.address_range
    }

    pub fn pdu(&self) -> &Bind {
        &self.bind
    }

    /// Accept with the session's configured interface version.
    pub async fn accept(self, system_id: &str) -> Result<(), SessionError> {
        let version = self.session.config().interface_version;
        self.accept_with_version(system_id, version).await
    }

    /// Accept, offering `version`. The response carries sc_interface_version
    /// with the lower of `version` and the ESME's version when the ESME
    /// speaks 3.4 or later.
    pub async fn accept_with_version(
        self,
        system_id: &str,
        version: InterfaceVersion,
    ) -> Result<(), SessionError> {
        let bind_type = self.bind.bind_type;
        let mut response = BindResponse::new(bind_type, self.bind.sequence_number, system_id);
        if self.bind.interface_version >= InterfaceVersion::SmppV34 {
            response = response.with_interface_version(version.negotiate(self.bind.interface_version));
        }

        let inner = self.session.inner();
        // Move to the bound state first so requests the ESME sends right
        // after the response are already legal.
        inner.transition(SessionState::bound(bind_type))?;
        inner.on_bound();
        info!(
            session_id = %inner.id(),
            peer = %self.bind.system_id,
            %bind_type,
            "bind accepted"
        );
        inner.write_frame(&response.into()).await
    }

    /// Refuse the bind. The session stays OPEN; the caller usually closes it.
    pub async fn reject(self, status: CommandStatus) -> Result<(), SessionError> {
        let response =
            BindResponse::error(self.bind.bind_type, self.bind.sequence_number, status);
        info!(
            session_id = %self.session.inner().id(),
            peer = %self.bind.system_id,
            %status,
            "bind rejected"
        );
        self.session.inner().write_frame(&response.into()).await
    }
}

/// An outbind received by an ESME session, awaiting the application's decision.
#[derive(Debug)]
pub struct OutbindRequest {
    outbind: Outbind,
    session: Session,
}

impl OutbindRequest {
    pub(crate) fn new(outbind: Outbind, session: Session) -> Self {
        Self { outbind, session }
    }

    pub fn system_id(&self) -> &str {
        &self.outbind.system_id
    }

    pub fn password(&self) -> &str {
        &self.outbind.password
    }

    /// Bind back to the SMSC over the same connection. Returns the SMSC's system_id.
    pub async fn accept(self, parameters: BindParameters) -> Result<String, SessionError> {
        self.session.bind(parameters).await
    }

    /// Refuse the outbind by closing the session.
    pub async fn reject(self) {
        info!(
            session_id = %self.session.inner().id(),
            peer = %self.outbind.system_id,
            "outbind rejected"
        );
        self.session.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn published_value_reaches_waiter() {
        let slot = Rendezvous::new();
        assert!(slot.publish(5u32));
        assert!(!slot.publish(6u32));
        assert_eq!(slot.wait(Duration::from_secs(1)).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn waiting_twice_fails() {
        let slot: Rendezvous<u32> = Rendezvous::new();
        assert!(matches!(
            slot.wait(Duration::from_millis(10)).await,
            Err(SessionError::BindTimeout(_))
        ));
        assert!(matches!(
            slot.wait(Duration::from_millis(10)).await,
            Err(SessionError::AlreadyWaited)
        ));
    }
}
