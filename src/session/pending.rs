// ABOUTME: Pending-response table correlating outbound requests with their responses by sequence number
// ABOUTME: Each slot is a oneshot channel, so a waiter receives exactly one outcome

use crate::datatypes::CommandId;
use crate::frame::Frame;
use crate::session::error::SessionError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

type Outcome = Result<Frame, SessionError>;

#[derive(Debug)]
struct Waiter {
    command_id: CommandId,
    tx: oneshot::Sender<Outcome>,
}

/// Outstanding requests keyed by sequence number.
#[derive(Debug, Default)]
pub struct PendingResponses {
    slots: DashMap<u32, Waiter>,
}

impl PendingResponses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot for `sequence_number`. Only one slot may exist per
    /// outstanding sequence number.
    pub fn register(
        self: &Arc<Self>,
        sequence_number: u32,
        command_id: CommandId,
    ) -> Result<PendingSlot, SessionError> {
        let (tx, rx) = oneshot::channel();
        match self.slots.entry(sequence_number) {
            Entry::Occupied(_) => return Err(SessionError::DuplicateSequence(sequence_number)),
            Entry::Vacant(entry) => {
                entry.insert(Waiter { command_id, tx });
            }
        }
        Ok(PendingSlot {
            sequence_number,
            command_id,
            rx,
            table: Arc::clone(self),
        })
    }

    /// Deliver a response. Returns false when nobody is waiting for it
    /// (late, duplicate or unsolicited).
    pub fn fulfil(&self, sequence_number: u32, response: Frame) -> bool {
        self.complete(sequence_number, Ok(response))
    }

    /// Fail one waiter, e.g. because its response could not be decoded.
    pub fn fail(&self, sequence_number: u32, error: SessionError) -> bool {
        self.complete(sequence_number, Err(error))
    }

    fn complete(&self, sequence_number: u32, outcome: Outcome) -> bool {
        match self.slots.remove(&sequence_number) {
            // A waiter that timed out concurrently has dropped its receiver
            Some((_, waiter)) => waiter.tx.send(outcome).is_ok(),
            None => false,
        }
    }

    pub fn contains(&self, sequence_number: u32) -> bool {
        self.slots.contains_key(&sequence_number)
    }

    /// The request a pending sequence number was registered for.
    pub fn command_id(&self, sequence_number: u32) -> Option<CommandId> {
        self.slots.get(&sequence_number).map(|waiter| waiter.command_id)
    }

    /// Fail every waiter with `SessionError::Closed`.
    pub fn fail_all(&self) {
        let outstanding: Vec<u32> = self.slots.iter().map(|slot| *slot.key()).collect();
        for sequence_number in outstanding {
            self.complete(sequence_number, Err(SessionError::Closed));
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The waiting side of one registration. Dropping it removes the slot, so a
/// failed send or an abandoned wait never leaks an entry.
#[derive(Debug)]
pub struct PendingSlot {
    sequence_number: u32,
    command_id: CommandId,
    rx: oneshot::Receiver<Outcome>,
    table: Arc<PendingResponses>,
}

impl PendingSlot {
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// Wait for the response, a failure or the deadline, whichever comes first.
    pub async fn wait(mut self, timeout: Duration) -> Outcome {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(SessionError::Closed),
            Err(_) => Err(SessionError::ResponseTimeout {
                command_id: self.command_id,
                sequence_number: self.sequence_number,
                timeout,
            }),
        }
    }
}

impl Drop for PendingSlot {
    fn drop(&mut self) {
        self.table.slots.remove(&self.sequence_number);
    }
}
