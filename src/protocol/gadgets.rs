//! Proof payloads carried by SMP messages.
//!
//! Each proof is a Fiat-Shamir challenge plus the response scalar(s) computed
//! modulo the group order. The statements they prove are fixed by the message
//! that carries them.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Proof of knowledge of `x` for a public value `g^x` (the `(c, d)` pairs of SMP1/SMP2).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeProof {
    c: BigUint,
    d: BigUint,
}

impl KnowledgeProof {
    /// Creates a proof from its challenge and response.
    pub fn new(c: BigUint, d: BigUint) -> Self {
        Self { c, d }
    }

    /// Challenge `c = H(label || g^r)`.
    pub fn c(&self) -> &BigUint {
        &self.c
    }

    /// Response `d = r - x * c mod q`.
    pub fn d(&self) -> &BigUint {
        &self.d
    }
}

/// Proof that `P = g3^r` and `Q = g^r * g2^x` share `r` and embed the secret `x`.
///
/// Carried as `(cP, d5, d6)` by SMP2 and SMP3.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateProof {
    c: BigUint,
    d5: BigUint,
    d6: BigUint,
}

impl CoordinateProof {
    /// Creates a proof from its challenge and responses.
    pub fn new(c: BigUint, d5: BigUint, d6: BigUint) -> Self {
        Self { c, d5, d6 }
    }

    /// Challenge `cP`.
    pub fn c(&self) -> &BigUint {
        &self.c
    }

    /// Response for the blinding exponent.
    pub fn d5(&self) -> &BigUint {
        &self.d5
    }

    /// Response for the secret.
    pub fn d6(&self) -> &BigUint {
        &self.d6
    }
}

/// Proof that `R = (Qa/Qb)^x` uses the same `x` as a published `g^x`.
///
/// Carried as `(cR, d7)` by SMP3 and SMP4.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityProof {
    c: BigUint,
    d: BigUint,
}

impl EqualityProof {
    /// Creates a proof from its challenge and response.
    pub fn new(c: BigUint, d: BigUint) -> Self {
        Self { c, d }
    }

    /// Challenge `cR`.
    pub fn c(&self) -> &BigUint {
        &self.c
    }

    /// Response `d7`.
    pub fn d(&self) -> &BigUint {
        &self.d
    }
}
