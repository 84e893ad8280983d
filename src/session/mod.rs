//! The per-conversation SMP state machine.
//!
//! A [`Session`] owns the local secret, the optional question and the state of
//! one exchange. Messages from the peer go in through [`Session::receive`];
//! whatever the session wants sent back comes out as the return value. Outcomes
//! are reported on a separate event queue obtained with [`Session::events`].

mod events;
mod rounds;
mod state;

use core::fmt;

use num_bigint::BigUint;
use rand::RngCore;
use tracing::debug;

pub use events::{Event, EventReceiver};
pub use state::StateKind;

use events::EventQueue;
use rounds::RoundContext;
use state::{transition, State};

use crate::config::{ProtocolConfig, Version};
use crate::crypto::{NonceGenerator, SecureRng};
use crate::protocol::{Message, Smp1Q};
use crate::{Error, Result};

/// One side of an SMP exchange.
///
/// # Examples
///
/// ```
/// use socialist_millionaire::{Event, Session, Version};
///
/// let mut alice = Session::new(Version::V2);
/// let mut bob = Session::new(Version::V2);
/// alice.set_secret(42u32.into()).unwrap();
/// bob.set_secret(42u32.into()).unwrap();
///
/// let mut events = alice.events().unwrap();
///
/// let smp1 = alice.compare().unwrap();
/// let smp2 = bob.receive(smp1).unwrap().unwrap();
/// let smp3 = alice.receive(smp2).unwrap().unwrap();
/// let smp4 = bob.receive(smp3).unwrap().unwrap();
/// assert!(alice.receive(smp4).unwrap().is_none());
///
/// assert_eq!(events.try_recv().unwrap(), Event::InProgress);
/// assert_eq!(events.try_recv().unwrap(), Event::InProgress);
/// assert_eq!(events.try_recv().unwrap(), Event::Success);
/// ```
pub struct Session<C: ProtocolConfig = Version> {
    config: C,
    nonces: NonceGenerator,
    secret: Option<BigUint>,
    question: Option<String>,
    state: State,
    events: EventQueue,
}

impl<C: ProtocolConfig> Session<C> {
    /// Creates a session drawing its exponents from the operating system.
    pub fn new(config: C) -> Self {
        Self::with_rng(config, SecureRng::new())
    }

    /// Creates a session drawing its exponents from `rng`.
    pub fn with_rng<R>(config: C, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        let nonces = NonceGenerator::new(rng, config.parameter_length());
        Self {
            config,
            nonces,
            secret: None,
            question: None,
            state: State::Expect1,
            events: EventQueue::new(),
        }
    }

    /// The protocol configuration.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Sets the secret to compare.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSecret`] unless `secret` is smaller than the group order.
    pub fn set_secret(&mut self, secret: BigUint) -> Result<()> {
        if &secret >= self.config.group().order() {
            return Err(Error::InvalidSecret);
        }
        self.secret = Some(secret);
        Ok(())
    }

    /// Whether a secret has been set.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Sets or clears the question attached to the next SMP1.
    pub fn set_question(&mut self, question: Option<String>) {
        self.question = question;
    }

    /// The question attached to the next SMP1, if any.
    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    /// Which message the session is waiting for.
    pub fn state(&self) -> StateKind {
        self.state.kind()
    }

    /// Hands out the event receiver. Only the first call returns `Some`.
    pub fn events(&mut self) -> Option<EventReceiver> {
        self.events.take_receiver()
    }

    /// Starts an exchange and returns SMP1, or SMP1Q when a question is set.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingSecret`] if no secret is set. A [`Event::Failure`] is emitted.
    /// - [`Error::AlreadyInProgress`] if the session is not idle.
    /// - [`Error::ShortRandomRead`] if the randomness source fails. A
    ///   [`Event::Failure`] is emitted.
    pub fn compare(&mut self) -> Result<Message> {
        if self.secret.is_none() {
            self.events.emit(Event::Failure);
            return Err(Error::MissingSecret);
        }
        if !matches!(self.state, State::Expect1) {
            return Err(Error::AlreadyInProgress);
        }

        let mut ctx = RoundContext {
            config: &self.config,
            nonces: &mut self.nonces,
            secret: self.secret.as_ref(),
        };
        let (round, smp1) = match rounds::initiate(&mut ctx) {
            Ok(built) => built,
            Err(err) => {
                self.events.emit(Event::Failure);
                return Err(err);
            }
        };

        self.state = State::Expect2(round);
        debug!(state = %self.state.kind(), "exchange started");
        self.events.emit(Event::InProgress);

        Ok(match &self.question {
            Some(question) => Smp1Q::new(question.clone(), smp1).into(),
            None => smp1.into(),
        })
    }

    /// Processes a message from the peer and returns the reply, if any.
    ///
    /// Cheating, mismatched secrets and out-of-order messages are not errors:
    /// they reset the session, emit an event and return an Abort to send.
    ///
    /// # Errors
    ///
    /// [`Error::MissingSecret`] for an SMP1 with no secret set, or
    /// [`Error::ShortRandomRead`]. Both emit [`Event::Failure`] and leave the
    /// session in the state it was in.
    pub fn receive(&mut self, message: Message) -> Result<Option<Message>> {
        let from = self.state.kind();
        let kind = message.kind();

        let mut ctx = RoundContext {
            config: &self.config,
            nonces: &mut self.nonces,
            secret: self.secret.as_ref(),
        };
        let outcome = match transition(&self.state, message, &mut ctx) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.events.emit(Event::Failure);
                return Err(err);
            }
        };

        self.state = outcome.next;
        debug!(%kind, %from, to = %self.state.kind(), "processed message");
        if let Some(event) = outcome.event {
            self.events.emit(event);
        }
        Ok(outcome.reply)
    }

    /// Abandons any running exchange and returns the Abort to send.
    pub fn abort(&mut self) -> Message {
        self.state = State::Expect1;
        debug!("exchange aborted locally");
        self.events.emit(Event::Abort);
        Message::Abort
    }
}

impl Default for Session<Version> {
    fn default() -> Self {
        Self::new(Version::default())
    }
}

impl<C: ProtocolConfig + fmt::Debug> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("has_secret", &self.secret.is_some())
            .field("question", &self.question)
            .finish()
    }
}
