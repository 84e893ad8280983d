//! In-process transport: two sessions wired together with tokio channels.
//!
//! Each [`Peer`] owns a session and an inbox. Once piped, a background task
//! feeds every message arriving in the inbox to the session and forwards the
//! reply, if any, to the other peer's inbox.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{ProtocolConfig, Version};
use crate::protocol::Message;
use crate::session::{EventReceiver, Session};
use crate::{Error, Result};

/// A session reachable through a message inbox.
pub struct Peer<C: ProtocolConfig = Version> {
    session: Arc<Mutex<Session<C>>>,
    events: Option<EventReceiver>,
    inbox: UnboundedSender<Message>,
    pending_inbox: Option<UnboundedReceiver<Message>>,
    outbox: Option<UnboundedSender<Message>>,
    task: Option<JoinHandle<()>>,
}

impl<C: ProtocolConfig> Peer<C> {
    /// Wraps `session`. The peer takes over the session's event receiver.
    pub fn new(mut session: Session<C>) -> Self {
        let events = session.events();
        let (inbox, pending_inbox) = mpsc::unbounded_channel();
        Self {
            session: Arc::new(Mutex::new(session)),
            events,
            inbox,
            pending_inbox: Some(pending_inbox),
            outbox: None,
            task: None,
        }
    }

    /// Connects two peers in both directions and starts their receive loops.
    ///
    /// Must be called from within a tokio runtime.
    pub fn pipe(a: &mut Peer<C>, b: &mut Peer<C>) {
        a.outbox = Some(b.inbox.clone());
        b.outbox = Some(a.inbox.clone());
        a.spawn();
        b.spawn();
    }

    /// Sender for delivering messages to this peer.
    pub fn inbox(&self) -> UnboundedSender<Message> {
        self.inbox.clone()
    }

    /// Whether this peer has been piped.
    pub fn is_piped(&self) -> bool {
        self.outbox.is_some()
    }

    /// The wrapped session.
    pub fn session(&self) -> Arc<Mutex<Session<C>>> {
        Arc::clone(&self.session)
    }

    /// Hands out the event receiver. Only the first call returns `Some`.
    pub fn events(&mut self) -> Option<EventReceiver> {
        self.events.take()
    }

    /// Sends `message` to the other peer.
    ///
    /// # Errors
    ///
    /// [`Error::Unpiped`] before [`Peer::pipe`], [`Error::ChannelClosed`] if the
    /// other peer is gone.
    pub fn send(&self, message: Message) -> Result<()> {
        let outbox = self.outbox.as_ref().ok_or(Error::Unpiped)?;
        outbox.send(message).map_err(|_| Error::ChannelClosed)
    }

    /// Starts an exchange with the other peer.
    ///
    /// Returns the event receiver unless it was already handed out.
    pub async fn compare(&mut self) -> Result<Option<EventReceiver>> {
        if !self.is_piped() {
            return Err(Error::Unpiped);
        }
        let smp1 = self.session.lock().await.compare()?;
        self.send(smp1)?;
        Ok(self.events.take())
    }

    /// Aborts the exchange locally and tells the other peer.
    pub async fn abort(&self) -> Result<()> {
        let abort = self.session.lock().await.abort();
        self.send(abort)
    }

    fn spawn(&mut self) {
        let Some(outbox) = self.outbox.clone() else {
            return;
        };
        if let Some(inbox) = self.pending_inbox.take() {
            let session = Arc::clone(&self.session);
            self.task = Some(tokio::spawn(receive_loop(session, inbox, outbox)));
        }
    }
}

impl<C: ProtocolConfig> Drop for Peer<C> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn receive_loop<C: ProtocolConfig>(
    session: Arc<Mutex<Session<C>>>,
    mut inbox: UnboundedReceiver<Message>,
    outbox: UnboundedSender<Message>,
) {
    while let Some(message) = inbox.recv().await {
        let reply = session.lock().await.receive(message);
        match reply {
            Ok(Some(reply)) => {
                if outbox.send(reply).is_err() {
                    debug!("other peer gone, stopping receive loop");
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => warn!(%err, "failed to process message"),
        }
    }
}
