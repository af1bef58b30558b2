// ABOUTME: Enquire_link keep-alive driven by idle signals from the session reader
// ABOUTME: Signals coalesce into one enquire_link; an unanswered one closes the session

use crate::datatypes::EnquireLink;
use crate::session::handle::SessionInner;
use crate::session::state::SessionState;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tracing::{debug, warn};

/// Timestamp of the last inbound PDU.
#[derive(Debug)]
pub(crate) struct Activity {
    origin: Instant,
    last_millis: AtomicU64,
}

impl Activity {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
            last_millis: AtomicU64::new(0),
        }
    }

    pub(crate) fn touch(&self) {
        let now = self.origin.elapsed().as_millis() as u64;
        self.last_millis.store(now, Ordering::Release);
    }

    pub(crate) fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_millis.load(Ordering::Acquire));
        self.origin.elapsed().saturating_sub(last)
    }
}

/// Edge trigger for the keep-alive task. Any number of `signal` calls made
/// while an enquire_link is pending result in a single extra one.
#[derive(Debug, Default)]
pub(crate) struct KeepAliveTrigger {
    notify: Notify,
}

impl KeepAliveTrigger {
    pub(crate) fn signal(&self) {
        self.notify.notify_one();
    }

    async fn fired(&self) {
        self.notify.notified().await;
    }
}

/// Keep-alive loop: wait for an idle signal, send enquire_link, close on failure.
pub(crate) async fn run(inner: Arc<SessionInner>) {
    loop {
        tokio::select! {
            _ = inner.cancelled() => break,
            _ = inner.keep_alive_trigger().fired() => {}
        }

        let state = inner.state();
        if matches!(state, SessionState::Unbound | SessionState::Closed) {
            break;
        }
        // Traffic that arrived since the signal makes the enquire_link unnecessary
        if inner.activity().idle_for() < inner.enquire_link_interval() {
            continue;
        }

        let timeout = inner.keep_alive_timeout();
        debug!(session_id = %inner.id(), ?timeout, "link idle, sending enquire_link");
        match inner.request(EnquireLink::new(0), timeout).await {
            Ok(_) => debug!(session_id = %inner.id(), "enquire_link answered"),
            Err(err) => {
                warn!(session_id = %inner.id(), %err, "enquire_link failed, closing session");
                inner.terminate();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signals_coalesce() {
        let trigger = KeepAliveTrigger::default();
        trigger.signal();
        trigger.signal();
        trigger.signal();

        trigger.fired().await;
        let second = tokio::time::timeout(Duration::from_millis(20), trigger.fired()).await;
        assert!(second.is_err(), "three signals produced more than one enquire_link");
    }

    #[test]
    fn activity_resets_idle_time() {
        let activity = Activity::new();
        std::thread::sleep(Duration::from_millis(20));
        assert!(activity.idle_for() >= Duration::from_millis(20));
        activity.touch();
        assert!(activity.idle_for() < Duration::from_millis(20));
    }
}
