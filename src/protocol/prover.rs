use num_bigint::BigUint;

use super::transcript::{hash_mpis, ProofLabel};
use super::{CoordinateProof, EqualityProof, KnowledgeProof};
use crate::crypto::Group;

/// Proves knowledge of `x` behind `g^x` using nonce `r`.
///
/// `c = H(label || g^r)`, `d = r - x * c mod q`.
pub fn prove_knowledge(
    group: &Group,
    r: &BigUint,
    x: &BigUint,
    label: ProofLabel,
) -> KnowledgeProof {
    let c = hash_mpis(label, &[&group.exp_generator(r)]);
    let d = group.response(r, x, &c);
    KnowledgeProof::new(c, d)
}

/// Proves that `P = g3^blind` and `Q = g^blind * g2^secret` were built honestly.
///
/// Nonces `r5`, `r6` commit to `(g3^r5, g^r5 * g2^r6)`; the responses are
/// `d5 = r5 - blind * c` and `d6 = r6 - secret * c` modulo `q`.
#[allow(clippy::too_many_arguments)]
pub fn prove_coordinates(
    group: &Group,
    g2: &BigUint,
    g3: &BigUint,
    blind: &BigUint,
    secret: &BigUint,
    r5: &BigUint,
    r6: &BigUint,
    label: ProofLabel,
) -> CoordinateProof {
    let left = group.exp(g3, r5);
    let right = group.mul(&group.exp_generator(r5), &group.exp(g2, r6));
    let c = hash_mpis(label, &[&left, &right]);

    let d5 = group.response(r5, blind, &c);
    let d6 = group.response(r6, secret, &c);
    CoordinateProof::new(c, d5, d6)
}

/// Proves that `(Qa/Qb)^x` and `g^x` share the exponent `x`.
///
/// `c = H(label || g^r7 || qaqb^r7)`, `d = r7 - x * c mod q`.
pub fn prove_equality(
    group: &Group,
    qaqb: &BigUint,
    x: &BigUint,
    r7: &BigUint,
    label: ProofLabel,
) -> EqualityProof {
    let c = hash_mpis(label, &[&group.exp_generator(r7), &group.exp(qaqb, r7)]);
    let d = group.response(r7, x, &c);
    EqualityProof::new(c, d)
}
