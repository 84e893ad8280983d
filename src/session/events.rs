//! Outcome notifications emitted by a [`Session`](super::Session).

use core::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

/// Something the host should know about an exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// The exchange completed and both secrets match.
    Success,
    /// The exchange was aborted by either side.
    Abort,
    /// The peer sent an element outside the group or a proof that does not verify.
    Cheated,
    /// A message arrived that does not fit the current state.
    Error,
    /// The secrets differ, or the exchange failed for a reason outside the protocol.
    Failure,
    /// A round completed and the exchange is waiting for the peer.
    InProgress,
}

impl Event {
    /// Whether the event ends the exchange.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Event::InProgress)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Event::Success => "success",
            Event::Abort => "abort",
            Event::Cheated => "cheated",
            Event::Error => "error",
            Event::Failure => "failure",
            Event::InProgress => "in progress",
        };
        f.write_str(name)
    }
}

/// Receiving half of a session's event queue.
pub type EventReceiver = UnboundedReceiver<Event>;

/// Unbounded event queue.
///
/// Emitting never blocks and never drops while the receiver is alive. Once the
/// receiver is gone, events are discarded.
pub(crate) struct EventQueue {
    tx: UnboundedSender<Event>,
    rx: Option<EventReceiver>,
}

impl EventQueue {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx: Some(rx) }
    }

    pub(crate) fn emit(&self, event: Event) {
        if self.tx.send(event).is_err() {
            trace!(%event, "event receiver dropped; discarding");
        }
    }

    /// Hands out the receiver. Only the first call returns `Some`.
    pub(crate) fn take_receiver(&mut self) -> Option<EventReceiver> {
        self.rx.take()
    }
}
