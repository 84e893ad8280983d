//! Error types for the SMP engine.
//!
//! Cheating peers and mismatched secrets are not errors: they are reported as
//! [`Event`](crate::Event)s together with an Abort reply. The variants here cover
//! caller mistakes, malformed input and failures of the randomness source.

/// Main error types for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The session has no secret to compare.
    #[error("missing secret")]
    MissingSecret,

    /// The secret does not fit in the group order.
    #[error("secret must be smaller than the group order")]
    InvalidSecret,

    /// `compare` was called while an exchange is already running.
    #[error("an SMP exchange is already in progress")]
    AlreadyInProgress,

    /// The randomness source could not provide the requested bytes.
    #[error("short read from rand source")]
    ShortRandomRead,

    /// A message was rebuilt from the wrong number of integers.
    #[error("invalid element count: expected {expected}, got {actual}")]
    InvalidElementCount {
        /// Number of integers the message carries.
        expected: usize,
        /// Number of integers supplied.
        actual: usize,
    },

    /// A modular division hit a divisor with no inverse.
    #[error("value has no inverse modulo the group prime")]
    NotInvertible,

    /// A TLV could not be parsed.
    #[error("malformed TLV: {0}")]
    MalformedTlv(String),

    /// A TLV carried a type that is not an SMP message.
    #[error("unknown TLV type: {0:#06x}")]
    UnknownTlvType(u16),

    /// A TLV value does not fit in its 16-bit length field.
    #[error("TLV value too long: {0} bytes")]
    TlvTooLong(usize),

    /// `respond` was called before the peer's first message arrived.
    #[error("no pending SMP request to respond to")]
    NoPendingRequest,

    /// A peer tried to send before being piped to another peer.
    #[error("sending to unpiped protocol")]
    Unpiped,

    /// The other end of a peer channel went away.
    #[error("peer channel closed")]
    ChannelClosed,
}
