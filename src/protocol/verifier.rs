//! Challenge-recompute-and-compare checks for the SMP proofs.
//!
//! Every check rebuilds the prover's commitment from the response and the
//! public values, hashes it under the expected label and compares the result
//! with the transmitted challenge. A mismatch is a `false`, never an error.

use num_bigint::BigUint;
use subtle::ConstantTimeEq;

use super::transcript::{hash_mpis, ProofLabel};
use super::{CoordinateProof, EqualityProof, KnowledgeProof};
use crate::crypto::Group;

fn challenge_matches(expected: &BigUint, recomputed: &BigUint) -> bool {
    bool::from(expected.to_bytes_be().ct_eq(&recomputed.to_bytes_be()))
}

/// Checks a proof of knowledge for `public = g^x`.
///
/// Recomputes `H(label || g^d * public^c)` and compares it with `c`.
pub fn verify_knowledge(
    group: &Group,
    proof: &KnowledgeProof,
    public: &BigUint,
    label: ProofLabel,
) -> bool {
    let commitment = group.mul(
        &group.exp_generator(proof.d()),
        &group.exp(public, proof.c()),
    );
    challenge_matches(proof.c(), &hash_mpis(label, &[&commitment]))
}

/// Checks a `(cP, d5, d6)` proof for the pair `(p, q)` under `g2`, `g3`.
///
/// `l = g3^d5 * p^c`, `r = g^d5 * g2^d6 * q^c`, accept iff `H(label || l || r) == c`.
pub fn verify_coordinates(
    group: &Group,
    proof: &CoordinateProof,
    g2: &BigUint,
    g3: &BigUint,
    p: &BigUint,
    q: &BigUint,
    label: ProofLabel,
) -> bool {
    let left = group.mul(&group.exp(g3, proof.d5()), &group.exp(p, proof.c()));
    let right = group.mul(
        &group.mul(&group.exp_generator(proof.d5()), &group.exp(g2, proof.d6())),
        &group.exp(q, proof.c()),
    );
    challenge_matches(proof.c(), &hash_mpis(label, &[&left, &right]))
}

/// Checks a `(cR, d7)` proof that `r = qaqb^x` where `g3x = g^x`.
///
/// `l = g^d7 * g3x^c`, `r' = qaqb^d7 * r^c`, accept iff `H(label || l || r') == c`.
pub fn verify_equality(
    group: &Group,
    proof: &EqualityProof,
    g3x: &BigUint,
    qaqb: &BigUint,
    r: &BigUint,
    label: ProofLabel,
) -> bool {
    let left = group.mul(&group.exp_generator(proof.d()), &group.exp(g3x, proof.c()));
    let right = group.mul(&group.exp(qaqb, proof.d()), &group.exp(r, proof.c()));
    challenge_matches(proof.c(), &hash_mpis(label, &[&left, &right]))
}
