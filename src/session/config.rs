// ABOUTME: Session and keep-alive configuration with builder-style setters and defaults
// ABOUTME: Also holds the bind and outbind parameters an initiating side sends

use crate::codec::MAX_PDU_SIZE;
use crate::datatypes::{Address, Bind, BindType, InterfaceVersion};
use crate::ids::{IdGenerator, RandomIdGenerator};
use crate::session::handler::SessionStateListener;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the enquire_link keep-alive
///
/// The interval doubles as the reader's idle window: when no bytes arrive
/// for that long an enquire_link is sent, and the session is closed if its
/// response does not come back within `timeout`.
///
/// # Example
///
/// ```rust
/// use smpp_session::session::KeepAliveConfig;
/// use std::time::Duration;
///
/// let config = KeepAliveConfig::new(Duration::from_secs(30))
///     .with_timeout(Duration::from_secs(5));
/// assert!(config.enabled);
///
/// let config = KeepAliveConfig::disabled();
/// assert!(!config.enabled);
/// ```
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Idle time before an enquire_link is sent (default: 60 seconds)
    pub interval: Duration,

    /// Time to wait for enquire_link_resp. Falls back to the session's
    /// transaction timeout when unset.
    pub timeout: Option<Duration>,

    /// When false no enquire_link is sent automatically. Manual
    /// `Session::enquire_link` calls still work.
    pub enabled: bool,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            timeout: None,
            enabled: true,
        }
    }
}

impl KeepAliveConfig {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub(crate) fn response_timeout(&self, transaction_timeout: Duration) -> Duration {
        self.timeout.unwrap_or(transaction_timeout)
    }
}

/// Per-session settings, fixed when the session starts.
///
/// `transaction_timeout` and the keep-alive interval can still be changed
/// on a running session through `Session::set_transaction_timeout` and
/// `Session::set_enquire_link_interval`.
#[derive(Clone)]
pub struct SessionConfig {
    /// Default time to wait for a response (default: 2 seconds)
    pub transaction_timeout: Duration,
    /// Time to wait for the peer's bind or bind response (default: 60 seconds)
    pub bind_timeout: Duration,
    /// Worker pool size once bound (default: 3)
    pub processor_degree: usize,
    /// Largest command_length accepted from the peer
    pub max_pdu_size: u32,
    /// Version advertised in binds and offered when accepting one
    pub interface_version: InterfaceVersion,
    pub keep_alive: KeepAliveConfig,
    /// Source of session ids
    pub id_generator: Arc<dyn IdGenerator>,
    pub(crate) state_listeners: Vec<Arc<dyn SessionStateListener>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            transaction_timeout: Duration::from_secs(2),
            bind_timeout: Duration::from_secs(60),
            processor_degree: 3,
            max_pdu_size: MAX_PDU_SIZE,
            interface_version: InterfaceVersion::SmppV34,
            keep_alive: KeepAliveConfig::default(),
            id_generator: Arc::new(RandomIdGenerator::new()),
            state_listeners: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = timeout;
        self
    }

    pub fn with_bind_timeout(mut self, timeout: Duration) -> Self {
        self.bind_timeout = timeout;
        self
    }

    /// Worker pool size after bind. Values below 1 are raised to 1.
    pub fn with_processor_degree(mut self, degree: usize) -> Self {
        self.processor_degree = degree.max(1);
        self
    }

    pub fn with_max_pdu_size(mut self, max_pdu_size: u32) -> Self {
        self.max_pdu_size = max_pdu_size;
        self
    }

    pub fn with_interface_version(mut self, version: InterfaceVersion) -> Self {
        self.interface_version = version;
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: KeepAliveConfig) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn with_id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Arc::new(generator);
        self
    }

    /// Register a state listener before the session starts, so the
    /// transitions made while binding are observed too.
    pub fn with_state_listener(mut self, listener: impl SessionStateListener) -> Self {
        self.state_listeners.push(Arc::new(listener));
        self
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("transaction_timeout", &self.transaction_timeout)
            .field("bind_timeout", &self.bind_timeout)
            .field("processor_degree", &self.processor_degree)
            .field("max_pdu_size", &self.max_pdu_size)
            .field("interface_version", &self.interface_version)
            .field("keep_alive", &self.keep_alive)
            .field("id_generator", &self.id_generator)
            .field("state_listeners", &self.state_listeners.len())
            .finish()
    }
}

/// What an ESME sends when it binds.
#[derive(Debug, Clone, PartialEq)]
pub struct BindParameters {
    pub bind_type: BindType,
    pub system_id: String,
    pub password: String,
    pub system_type: String,
    pub interface_version: InterfaceVersion,
    pub address_range: Address,
}

impl BindParameters {
    pub fn new(bind_type: BindType, system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            bind_type,
            system_id: system_id.into(),
            password: password.into(),
            system_type: String::new(),
            interface_version: InterfaceVersion::SmppV34,
            address_range: Address::default(),
        }
    }

    pub fn transmitter(system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(BindType::Transmitter, system_id, password)
    }

    pub fn receiver(system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(BindType::Receiver, system_id, password)
    }

    pub fn transceiver(system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(BindType::Transceiver, system_id, password)
    }

    pub fn with_system_type(mut self, system_type: impl Into<String>) -> Self {
        self.system_type = system_type.into();
        self
    }

    pub fn with_version(mut self, interface_version: InterfaceVersion) -> Self {
        self.interface_version = interface_version;
        self
    }

    pub fn with_address_range(mut self, address_range: impl Into<Address>) -> Self {
        self.address_range = address_range.into();
        self
    }

    pub(crate) fn to_bind(&self) -> Bind {
        Bind {
            system_type: self.system_type.clone(),
            interface_version: self.interface_version,
            address_range: self.address_range.clone(),
            ..Bind::new(self.bind_type, self.system_id.clone(), self.password.clone())
        }
    }
}

/// What an SMSC sends in an outbind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutbindParameters {
    pub system_id: String,
    pub password: String,
}

impl OutbindParameters {
    pub fn new(system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            password: password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_alive_timeout_falls_back_to_transaction_timeout() {
        let config = KeepAliveConfig::default();
        assert_eq!(config.response_timeout(Duration::from_secs(2)), Duration::from_secs(2));

        let config = config.with_timeout(Duration::from_millis(300));
        assert_eq!(config.response_timeout(Duration::from_secs(2)), Duration::from_millis(300));
    }

    #[test]
    fn session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.transaction_timeout, Duration::from_secs(2));
        assert_eq!(config.processor_degree, 3);
        assert_eq!(config.max_pdu_size, MAX_PDU_SIZE);
        assert_eq!(config.keep_alive.interval, Duration::from_secs(60));
        assert_eq!(SessionConfig::default().with_processor_degree(0).processor_degree, 1);
    }

    #[test]
    fn bind_parameters_build_a_bind_pdu() {
        let bind = BindParameters::transceiver("client1", "pass")
            .with_system_type("VMS")
            .with_version(InterfaceVersion::SmppV50)
            .to_bind();
        assert_eq!(bind.bind_type, BindType::Transceiver);
        assert_eq!(bind.system_id, "client1");
        assert_eq!(bind.password, "pass");
        assert_eq!(bind.system_type, "VMS");
        assert_eq!(bind.interface_version, InterfaceVersion::SmppV50);
        assert_eq!(bind.sequence_number, 0);
    }
}
