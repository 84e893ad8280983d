//! Fiat-Shamir transcript for SMP challenges.
//!
//! A challenge is `SHA-256(label || mpi_1 || mpi_2 || ...)` read as a big-endian
//! integer, where each MPI is a 4-byte big-endian length followed by the
//! magnitude bytes. The label byte separates the eight proof roles.

use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

/// Domain separation label for each proof role in the exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProofLabel {
    /// SMP1: knowledge of `a2`.
    InitiatorG2 = 1,
    /// SMP1: knowledge of `a3`.
    InitiatorG3 = 2,
    /// SMP2: knowledge of `b2`.
    ResponderG2 = 3,
    /// SMP2: knowledge of `b3`.
    ResponderG3 = 4,
    /// SMP2: `Pb`/`Qb` built from the same blinding exponent and the responder's secret.
    ResponderCoordinates = 5,
    /// SMP3: `Pa`/`Qa` built from the same blinding exponent and the initiator's secret.
    InitiatorCoordinates = 6,
    /// SMP3: `Ra` uses the same exponent as `g3a`.
    InitiatorRatio = 7,
    /// SMP4: `Rb` uses the same exponent as `g3b`.
    ResponderRatio = 8,
}

impl ProofLabel {
    /// The byte fed to the hash.
    pub const fn byte(self) -> u8 {
        self as u8
    }
}

/// Hash transcript bound to one proof label.
#[derive(Clone)]
pub struct Transcript(Sha256);

impl Transcript {
    /// Starts a transcript for the given proof role.
    pub fn new(label: ProofLabel) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([label.byte()]);
        Self(hasher)
    }

    /// Appends an integer in MPI form. Zero encodes as an empty magnitude.
    pub fn append_mpi(&mut self, value: &BigUint) {
        let bytes = if value.is_zero() {
            Vec::new()
        } else {
            value.to_bytes_be()
        };
        self.0.update((bytes.len() as u32).to_be_bytes());
        self.0.update(&bytes);
    }

    /// Finishes the transcript and returns the challenge.
    pub fn challenge(self) -> BigUint {
        BigUint::from_bytes_be(&self.0.finalize())
    }
}

/// One-shot helper: challenge over `values` under `label`.
pub fn hash_mpis(label: ProofLabel, values: &[&BigUint]) -> BigUint {
    let mut transcript = Transcript::new(label);
    for value in values {
        transcript.append_mpi(value);
    }
    transcript.challenge()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_deterministic() {
        let a = BigUint::from(0x1234u32);
        let b = BigUint::from(99u32);
        assert_eq!(
            hash_mpis(ProofLabel::InitiatorG2, &[&a, &b]),
            hash_mpis(ProofLabel::InitiatorG2, &[&a, &b])
        );
    }

    #[test]
    fn labels_separate_domains() {
        let a = BigUint::from(7u32);
        assert_ne!(
            hash_mpis(ProofLabel::InitiatorG2, &[&a]),
            hash_mpis(ProofLabel::InitiatorG3, &[&a])
        );
    }

    #[test]
    fn matches_manual_encoding() {
        let value = BigUint::from(0x0102u32);
        let mut hasher = Sha256::new();
        hasher.update([5u8, 0, 0, 0, 2, 0x01, 0x02]);
        let expected = BigUint::from_bytes_be(&hasher.finalize());
        assert_eq!(hash_mpis(ProofLabel::ResponderCoordinates, &[&value]), expected);
    }

    #[test]
    fn zero_encodes_as_empty_mpi() {
        let mut hasher = Sha256::new();
        hasher.update([1u8, 0, 0, 0, 0]);
        let expected = BigUint::from_bytes_be(&hasher.finalize());
        assert_eq!(
            hash_mpis(ProofLabel::InitiatorG2, &[&BigUint::zero()]),
            expected
        );
    }

    #[test]
    fn operand_boundaries_matter() {
        let ab = BigUint::from(0x0102u32);
        let a = BigUint::from(0x01u32);
        let b = BigUint::from(0x02u32);
        assert_ne!(
            hash_mpis(ProofLabel::InitiatorRatio, &[&ab]),
            hash_mpis(ProofLabel::InitiatorRatio, &[&a, &b])
        );
    }
}
