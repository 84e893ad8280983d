/// Modular arithmetic primitives.
pub mod field;
/// Safe-prime group operations.
pub mod group;
/// Cryptographically secure random number generation.
pub mod rng;

pub use group::Group;
pub use rng::{NonceGenerator, SecureRng};
