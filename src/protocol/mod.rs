//! SMP proofs and message bundles.

/// Proof payloads carried inside messages.
pub mod gadgets;
/// SMP1 through SMP4 and the message sum type.
pub mod messages;
/// Proof construction.
pub mod prover;
/// Fiat-Shamir challenge hashing.
pub mod transcript;
/// Proof checks.
pub mod verifier;

pub use gadgets::{CoordinateProof, EqualityProof, KnowledgeProof};
pub use messages::{Message, MessageKind, Smp1, Smp1Q, Smp2, Smp3, Smp4};
pub use transcript::{ProofLabel, Transcript};
