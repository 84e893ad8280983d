//! OTR-facing SMP client.
//!
//! [`Client`] speaks TLV bytes on the wire and human-entered secrets on the
//! user side. It turns the user's secret into the numeric SMP secret by binding
//! it to both fingerprints and the session id, and it holds the peer's first
//! message until the local user has supplied an answer.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::{ProtocolConfig, Version};
use crate::protocol::{Message, Smp1};
use crate::session::{EventReceiver, Session, StateKind};
use crate::{tlv, Error, Result};

/// Version byte prefixed to the secret derivation input.
pub const SECRET_DERIVATION_VERSION: u8 = 0x01;

/// Conversation data the secret is bound to.
pub trait SecretParams {
    /// Secure session id of the encrypted conversation.
    fn ssid(&self) -> &[u8];

    /// Fingerprint of our long-term key.
    fn our_fingerprint(&self) -> &[u8];

    /// Fingerprint of the peer's long-term key.
    fn their_fingerprint(&self) -> &[u8];
}

/// `SHA-256(0x01 || initiator_fp || responder_fp || ssid || secret)` as an integer.
///
/// Both sides must pass the fingerprints in the same order, so the initiator's
/// fingerprint always comes first.
pub fn derive_secret(
    initiator_fingerprint: &[u8],
    responder_fingerprint: &[u8],
    ssid: &[u8],
    secret: &[u8],
) -> BigUint {
    let mut hasher = Sha256::new();
    hasher.update([SECRET_DERIVATION_VERSION]);
    hasher.update(initiator_fingerprint);
    hasher.update(responder_fingerprint);
    hasher.update(ssid);
    hasher.update(secret);
    BigUint::from_bytes_be(&hasher.finalize())
}

/// What the host should do after [`Client::receive`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Send this TLV to the peer.
    Send(Vec<u8>),
    /// The peer started an exchange; ask the user for the secret and call
    /// [`Client::respond`].
    AskForSecret {
        /// The peer's question, for SMP1Q.
        question: Option<String>,
    },
}

/// SMP over OTR TLVs.
pub struct Client<P, C: ProtocolConfig = Version> {
    session: Session<C>,
    params: P,
    pending: Option<Smp1>,
}

impl<P: SecretParams, C: ProtocolConfig> Client<P, C> {
    /// Creates a client for the conversation described by `params`.
    pub fn new(params: P, config: C) -> Self {
        Self::with_session(params, Session::new(config))
    }

    /// Creates a client around an existing session.
    pub fn with_session(params: P, session: Session<C>) -> Self {
        Self {
            session,
            params,
            pending: None,
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Hands out the session's event receiver. Only the first call returns `Some`.
    pub fn events(&mut self) -> Option<EventReceiver> {
        self.session.events()
    }

    /// Whether a peer's request is waiting for [`Client::respond`].
    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts an exchange as the initiator and returns the SMP1 or SMP1Q TLV.
    ///
    /// A start request while an exchange is running leaves it alone and returns
    /// `Ok(None)`. To restart, call [`Client::abort`] first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTlv`] for a question containing a NUL byte. The
    /// session is left idle.
    pub fn start(&mut self, question: Option<&str>, secret: &[u8]) -> Result<Option<Vec<u8>>> {
        if self.session.state() != StateKind::Expect1 {
            debug!("exchange already running, start ignored");
            return Ok(None);
        }
        if question.is_some_and(|q| q.contains('\0')) {
            return Err(Error::MalformedTlv("question contains a NUL byte".into()));
        }

        let derived = derive_secret(
            self.params.our_fingerprint(),
            self.params.their_fingerprint(),
            self.params.ssid(),
            secret,
        );
        self.session.set_secret(derived)?;
        self.session.set_question(question.map(str::to_owned));
        self.pending = None;

        let smp1 = self.session.compare()?;
        tlv::encode(&smp1).map(Some)
    }

    /// Handles a TLV from the peer.
    ///
    /// An SMP1 or SMP1Q arriving while idle is held back until
    /// [`Client::respond`]; everything else goes straight to the session.
    pub fn receive(&mut self, bytes: &[u8]) -> Result<Option<Reply>> {
        let message = tlv::decode(bytes)?;

        if self.session.state() == StateKind::Expect1 {
            match message {
                Message::Smp1(smp1) => {
                    self.pending = Some(smp1);
                    return Ok(Some(Reply::AskForSecret { question: None }));
                }
                Message::Smp1Q(smp1q) => {
                    let (question, smp1) = smp1q.into_parts();
                    self.pending = Some(smp1);
                    return Ok(Some(Reply::AskForSecret {
                        question: Some(question),
                    }));
                }
                _ => {}
            }
        }

        if matches!(message, Message::Abort) {
            self.pending = None;
        }
        let reply = self.session.receive(message)?;
        Self::send(reply)
    }

    /// Answers the held request with the user's secret and returns SMP2.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPendingRequest`] if no SMP1 is waiting.
    pub fn respond(&mut self, secret: &[u8]) -> Result<Option<Vec<u8>>> {
        let smp1 = self.pending.take().ok_or(Error::NoPendingRequest)?;

        let derived = derive_secret(
            self.params.their_fingerprint(),
            self.params.our_fingerprint(),
            self.params.ssid(),
            secret,
        );
        self.session.set_secret(derived)?;

        match self.session.receive(Message::Smp1(smp1))? {
            Some(reply) => tlv::encode(&reply).map(Some),
            None => Ok(None),
        }
    }

    /// Abandons any exchange and returns the Abort TLV, which is always sent.
    pub fn abort(&mut self) -> Result<Vec<u8>> {
        self.pending = None;
        tlv::encode(&self.session.abort())
    }

    fn send(reply: Option<Message>) -> Result<Option<Reply>> {
        reply
            .map(|message| tlv::encode(&message).map(Reply::Send))
            .transpose()
    }
}
