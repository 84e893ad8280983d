//! Socialist Millionaire Protocol.
//!
//! Two parties learn whether they hold the same secret without revealing it to
//! each other or to anyone watching the exchange. This crate provides:
//! - **session**: the four-message state machine and its event queue
//! - **protocol**: SMP messages and their zero-knowledge proofs
//! - **crypto** / **groups**: modular arithmetic over the RFC 3526 1536-bit group
//! - **tlv**: OTR TLV framing
//! - **client**: secret derivation and an OTR-style client
//! - **channel**: two sessions wired together over tokio channels
//!
//! # Examples
//!
//! ```
//! use socialist_millionaire::{Session, StateKind, Version};
//!
//! let mut alice = Session::new(Version::V2);
//! let mut bob = Session::new(Version::V2);
//! alice.set_secret(7u32.into()).unwrap();
//! bob.set_secret(7u32.into()).unwrap();
//!
//! let mut message = Some(alice.compare().unwrap());
//! let mut turn = 0;
//! while let Some(m) = message.take() {
//!     let receiver = if turn % 2 == 0 { &mut bob } else { &mut alice };
//!     message = receiver.receive(m).unwrap();
//!     turn += 1;
//! }
//! assert_eq!(alice.state(), StateKind::Expect1);
//! assert_eq!(bob.state(), StateKind::Expect1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// In-process peers connected by tokio channels.
pub mod channel;
/// OTR client and secret derivation.
pub mod client;
/// Protocol versions and host configuration.
pub mod config;
/// Modular arithmetic and randomness.
pub mod crypto;
/// Error types.
pub mod error;
/// Standard group parameters.
pub mod groups;
/// Messages and proofs.
pub mod protocol;
/// The SMP state machine.
pub mod session;
/// TLV wire encoding.
pub mod tlv;

pub use channel::Peer;
pub use client::{derive_secret, Client, Reply, SecretParams};
pub use config::{ProtocolConfig, SmpConfig, Version};
pub use crypto::{Group, NonceGenerator, SecureRng};
pub use error::Error;
pub use protocol::{Message, MessageKind, Smp1, Smp1Q, Smp2, Smp3, Smp4};
pub use session::{Event, EventReceiver, Session, StateKind};

/// Result type alias for SMP operations.
pub type Result<T> = core::result::Result<T, Error>;
