//! The SMP message set.
//!
//! Every message is an immutable bundle of group elements and proof scalars.
//! [`Message`] is the sum type the state machine dispatches on; each variant can
//! be flattened to, and rebuilt from, the ordered integer list used by the wire
//! encoding.

use core::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::{CoordinateProof, EqualityProof, KnowledgeProof};
use crate::{Error, Result};

fn expect_count(mpis: &[BigUint], expected: usize) -> Result<()> {
    if mpis.len() != expected {
        return Err(Error::InvalidElementCount {
            expected,
            actual: mpis.len(),
        });
    }
    Ok(())
}

/// First message: the initiator's `g2a`, `g3a` and proofs of their exponents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smp1 {
    g2a: BigUint,
    g2a_proof: KnowledgeProof,
    g3a: BigUint,
    g3a_proof: KnowledgeProof,
}

impl Smp1 {
    /// Number of integers in the wire form.
    pub const MPI_COUNT: usize = 6;

    /// Creates the message from its parts.
    pub fn new(
        g2a: BigUint,
        g2a_proof: KnowledgeProof,
        g3a: BigUint,
        g3a_proof: KnowledgeProof,
    ) -> Self {
        Self {
            g2a,
            g2a_proof,
            g3a,
            g3a_proof,
        }
    }

    /// `g^a2`.
    pub fn g2a(&self) -> &BigUint {
        &self.g2a
    }

    /// `(c2, d2)`.
    pub fn g2a_proof(&self) -> &KnowledgeProof {
        &self.g2a_proof
    }

    /// `g^a3`.
    pub fn g3a(&self) -> &BigUint {
        &self.g3a
    }

    /// `(c3, d3)`.
    pub fn g3a_proof(&self) -> &KnowledgeProof {
        &self.g3a_proof
    }

    /// `g2a, c2, d2, g3a, c3, d3`.
    pub fn to_mpis(&self) -> Vec<BigUint> {
        vec![
            self.g2a.clone(),
            self.g2a_proof.c().clone(),
            self.g2a_proof.d().clone(),
            self.g3a.clone(),
            self.g3a_proof.c().clone(),
            self.g3a_proof.d().clone(),
        ]
    }

    /// Rebuilds the message from its integer list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidElementCount`] unless exactly six integers are given.
    pub fn from_mpis(mpis: &[BigUint]) -> Result<Self> {
        expect_count(mpis, Self::MPI_COUNT)?;
        Ok(Self {
            g2a: mpis[0].clone(),
            g2a_proof: KnowledgeProof::new(mpis[1].clone(), mpis[2].clone()),
            g3a: mpis[3].clone(),
            g3a_proof: KnowledgeProof::new(mpis[4].clone(), mpis[5].clone()),
        })
    }
}

/// First message carrying a question for the responder's user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smp1Q {
    question: String,
    body: Smp1,
}

impl Smp1Q {
    /// Attaches `question` to an SMP1 body.
    pub fn new(question: impl Into<String>, body: Smp1) -> Self {
        Self {
            question: question.into(),
            body,
        }
    }

    /// The question shown to the responder.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The SMP1 payload.
    pub fn body(&self) -> &Smp1 {
        &self.body
    }

    /// Splits into question and payload.
    pub fn into_parts(self) -> (String, Smp1) {
        (self.question, self.body)
    }

    /// Same integer list as [`Smp1::to_mpis`]; the question travels separately.
    pub fn to_mpis(&self) -> Vec<BigUint> {
        self.body.to_mpis()
    }

    /// Rebuilds the message from a question and the SMP1 integer list.
    pub fn from_mpis(question: impl Into<String>, mpis: &[BigUint]) -> Result<Self> {
        Ok(Self::new(question, Smp1::from_mpis(mpis)?))
    }
}

/// Second message: the responder's `g2b`, `g3b`, `Pb`, `Qb` and proofs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smp2 {
    g2b: BigUint,
    g2b_proof: KnowledgeProof,
    g3b: BigUint,
    g3b_proof: KnowledgeProof,
    pb: BigUint,
    qb: BigUint,
    coordinates: CoordinateProof,
}

impl Smp2 {
    /// Number of integers in the wire form.
    pub const MPI_COUNT: usize = 11;

    /// Creates the message from its parts.
    pub fn new(
        g2b: BigUint,
        g2b_proof: KnowledgeProof,
        g3b: BigUint,
        g3b_proof: KnowledgeProof,
        pb: BigUint,
        qb: BigUint,
        coordinates: CoordinateProof,
    ) -> Self {
        Self {
            g2b,
            g2b_proof,
            g3b,
            g3b_proof,
            pb,
            qb,
            coordinates,
        }
    }

    /// `g^b2`.
    pub fn g2b(&self) -> &BigUint {
        &self.g2b
    }

    /// `(c2, d2)`.
    pub fn g2b_proof(&self) -> &KnowledgeProof {
        &self.g2b_proof
    }

    /// `g^b3`.
    pub fn g3b(&self) -> &BigUint {
        &self.g3b
    }

    /// `(c3, d3)`.
    pub fn g3b_proof(&self) -> &KnowledgeProof {
        &self.g3b_proof
    }

    /// `Pb = g3^r4`.
    pub fn pb(&self) -> &BigUint {
        &self.pb
    }

    /// `Qb = g^r4 * g2^y`.
    pub fn qb(&self) -> &BigUint {
        &self.qb
    }

    /// `(cP, d5, d6)`.
    pub fn coordinates(&self) -> &CoordinateProof {
        &self.coordinates
    }

    /// `g2b, c2, d2, g3b, c3, d3, Pb, Qb, cP, d5, d6`.
    pub fn to_mpis(&self) -> Vec<BigUint> {
        vec![
            self.g2b.clone(),
            self.g2b_proof.c().clone(),
            self.g2b_proof.d().clone(),
            self.g3b.clone(),
            self.g3b_proof.c().clone(),
            self.g3b_proof.d().clone(),
            self.pb.clone(),
            self.qb.clone(),
            self.coordinates.c().clone(),
            self.coordinates.d5().clone(),
            self.coordinates.d6().clone(),
        ]
    }

    /// Rebuilds the message from its integer list.
    pub fn from_mpis(mpis: &[BigUint]) -> Result<Self> {
        expect_count(mpis, Self::MPI_COUNT)?;
        Ok(Self {
            g2b: mpis[0].clone(),
            g2b_proof: KnowledgeProof::new(mpis[1].clone(), mpis[2].clone()),
            g3b: mpis[3].clone(),
            g3b_proof: KnowledgeProof::new(mpis[4].clone(), mpis[5].clone()),
            pb: mpis[6].clone(),
            qb: mpis[7].clone(),
            coordinates: CoordinateProof::new(
                mpis[8].clone(),
                mpis[9].clone(),
                mpis[10].clone(),
            ),
        })
    }
}

/// Third message: the initiator's `Pa`, `Qa`, `Ra` and proofs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smp3 {
    pa: BigUint,
    qa: BigUint,
    coordinates: CoordinateProof,
    ra: BigUint,
    ratio: EqualityProof,
}

impl Smp3 {
    /// Number of integers in the wire form.
    pub const MPI_COUNT: usize = 8;

    /// Creates the message from its parts.
    pub fn new(
        pa: BigUint,
        qa: BigUint,
        coordinates: CoordinateProof,
        ra: BigUint,
        ratio: EqualityProof,
    ) -> Self {
        Self {
            pa,
            qa,
            coordinates,
            ra,
            ratio,
        }
    }

    /// `Pa = g3^r4`.
    pub fn pa(&self) -> &BigUint {
        &self.pa
    }

    /// `Qa = g^r4 * g2^x`.
    pub fn qa(&self) -> &BigUint {
        &self.qa
    }

    /// `(cP, d5, d6)`.
    pub fn coordinates(&self) -> &CoordinateProof {
        &self.coordinates
    }

    /// `Ra = (Qa/Qb)^a3`.
    pub fn ra(&self) -> &BigUint {
        &self.ra
    }

    /// `(cR, d7)`.
    pub fn ratio(&self) -> &EqualityProof {
        &self.ratio
    }

    /// `Pa, Qa, cP, d5, d6, Ra, cR, d7`.
    pub fn to_mpis(&self) -> Vec<BigUint> {
        vec![
            self.pa.clone(),
            self.qa.clone(),
            self.coordinates.c().clone(),
            self.coordinates.d5().clone(),
            self.coordinates.d6().clone(),
            self.ra.clone(),
            self.ratio.c().clone(),
            self.ratio.d().clone(),
        ]
    }

    /// Rebuilds the message from its integer list.
    pub fn from_mpis(mpis: &[BigUint]) -> Result<Self> {
        expect_count(mpis, Self::MPI_COUNT)?;
        Ok(Self {
            pa: mpis[0].clone(),
            qa: mpis[1].clone(),
            coordinates: CoordinateProof::new(
                mpis[2].clone(),
                mpis[3].clone(),
                mpis[4].clone(),
            ),
            ra: mpis[5].clone(),
            ratio: EqualityProof::new(mpis[6].clone(), mpis[7].clone()),
        })
    }
}

/// Fourth message: the responder's `Rb` and its proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smp4 {
    rb: BigUint,
    ratio: EqualityProof,
}

impl Smp4 {
    /// Number of integers in the wire form.
    pub const MPI_COUNT: usize = 3;

    /// Creates the message from its parts.
    pub fn new(rb: BigUint, ratio: EqualityProof) -> Self {
        Self { rb, ratio }
    }

    /// `Rb = (Qa/Qb)^b3`.
    pub fn rb(&self) -> &BigUint {
        &self.rb
    }

    /// `(cR, d7)`.
    pub fn ratio(&self) -> &EqualityProof {
        &self.ratio
    }

    /// `Rb, cR, d7`.
    pub fn to_mpis(&self) -> Vec<BigUint> {
        vec![
            self.rb.clone(),
            self.ratio.c().clone(),
            self.ratio.d().clone(),
        ]
    }

    /// Rebuilds the message from its integer list.
    pub fn from_mpis(mpis: &[BigUint]) -> Result<Self> {
        expect_count(mpis, Self::MPI_COUNT)?;
        Ok(Self {
            rb: mpis[0].clone(),
            ratio: EqualityProof::new(mpis[1].clone(), mpis[2].clone()),
        })
    }
}

/// Tag of a [`Message`] without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// SMP message 1.
    Smp1,
    /// SMP message 1 with a question.
    Smp1Q,
    /// SMP message 2.
    Smp2,
    /// SMP message 3.
    Smp3,
    /// SMP message 4.
    Smp4,
    /// SMP abort.
    Abort,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Smp1 => "SMP1",
            MessageKind::Smp1Q => "SMP1Q",
            MessageKind::Smp2 => "SMP2",
            MessageKind::Smp3 => "SMP3",
            MessageKind::Smp4 => "SMP4",
            MessageKind::Abort => "SMPAbort",
        };
        f.write_str(name)
    }
}

/// Any SMP message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// SMP message 1.
    Smp1(Smp1),
    /// SMP message 1 with a question.
    Smp1Q(Smp1Q),
    /// SMP message 2.
    Smp2(Smp2),
    /// SMP message 3.
    Smp3(Smp3),
    /// SMP message 4.
    Smp4(Smp4),
    /// SMP abort; carries no payload.
    Abort,
}

impl Message {
    /// The message tag.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Smp1(_) => MessageKind::Smp1,
            Message::Smp1Q(_) => MessageKind::Smp1Q,
            Message::Smp2(_) => MessageKind::Smp2,
            Message::Smp3(_) => MessageKind::Smp3,
            Message::Smp4(_) => MessageKind::Smp4,
            Message::Abort => MessageKind::Abort,
        }
    }

    /// Ordered integer payload.
    pub fn to_mpis(&self) -> Vec<BigUint> {
        match self {
            Message::Smp1(m) => m.to_mpis(),
            Message::Smp1Q(m) => m.to_mpis(),
            Message::Smp2(m) => m.to_mpis(),
            Message::Smp3(m) => m.to_mpis(),
            Message::Smp4(m) => m.to_mpis(),
            Message::Abort => Vec::new(),
        }
    }

    /// Rebuilds a message of `kind` from its integer payload.
    ///
    /// `question` is only used for [`MessageKind::Smp1Q`]. Abort ignores any
    /// payload it is given.
    pub fn from_mpis(kind: MessageKind, question: Option<&str>, mpis: &[BigUint]) -> Result<Self> {
        Ok(match kind {
            MessageKind::Smp1 => Message::Smp1(Smp1::from_mpis(mpis)?),
            MessageKind::Smp1Q => Message::Smp1Q(Smp1Q::from_mpis(question.unwrap_or(""), mpis)?),
            MessageKind::Smp2 => Message::Smp2(Smp2::from_mpis(mpis)?),
            MessageKind::Smp3 => Message::Smp3(Smp3::from_mpis(mpis)?),
            MessageKind::Smp4 => Message::Smp4(Smp4::from_mpis(mpis)?),
            MessageKind::Abort => Message::Abort,
        })
    }
}

impl From<Smp1> for Message {
    fn from(m: Smp1) -> Self {
        Message::Smp1(m)
    }
}

impl From<Smp1Q> for Message {
    fn from(m: Smp1Q) -> Self {
        Message::Smp1Q(m)
    }
}

impl From<Smp2> for Message {
    fn from(m: Smp2) -> Self {
        Message::Smp2(m)
    }
}

impl From<Smp3> for Message {
    fn from(m: Smp3) -> Self {
        Message::Smp3(m)
    }
}

impl From<Smp4> for Message {
    fn from(m: Smp4) -> Self {
        Message::Smp4(m)
    }
}
