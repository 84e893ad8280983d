//! Round construction and verification.
//!
//! Each function checks an incoming message against the secrets stored for the
//! current round, then draws fresh exponents and builds the reply together with
//! the secrets the next round needs. Nothing here mutates session state.

use num_bigint::BigUint;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::config::ProtocolConfig;
use crate::crypto::{Group, NonceGenerator};
use crate::protocol::prover::{prove_coordinates, prove_equality, prove_knowledge};
use crate::protocol::verifier::{verify_coordinates, verify_equality, verify_knowledge};
use crate::protocol::{ProofLabel, Smp1, Smp2, Smp3, Smp4};
use crate::Error;

/// Why a peer's message was refused. Only ever logged.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Rejection {
    #[error("{0} is not a group element")]
    InvalidElement(&'static str),

    #[error("proof for {0} does not verify")]
    InvalidProof(&'static str),
}

/// A round either rejects the peer or fails locally.
#[derive(Debug)]
pub(crate) enum RoundError {
    Rejected(Rejection),
    Failed(Error),
}

impl From<Rejection> for RoundError {
    fn from(reason: Rejection) -> Self {
        RoundError::Rejected(reason)
    }
}

impl From<Error> for RoundError {
    fn from(err: Error) -> Self {
        RoundError::Failed(err)
    }
}

type RoundResult<T> = core::result::Result<T, RoundError>;

/// Initiator secrets after SMP1.
pub(crate) struct Round1 {
    a2: BigUint,
    a3: BigUint,
}

/// Responder secrets after SMP2.
pub(crate) struct Round2 {
    g2: BigUint,
    g3: BigUint,
    g3a: BigUint,
    pb: BigUint,
    qb: BigUint,
    b3: BigUint,
}

/// Initiator secrets after SMP3.
pub(crate) struct Round3 {
    a3: BigUint,
    g3b: BigUint,
    qaqb: BigUint,
    papb: BigUint,
}

/// What a round needs from its session.
pub(crate) struct RoundContext<'a> {
    pub(crate) config: &'a dyn ProtocolConfig,
    pub(crate) nonces: &'a mut NonceGenerator,
    pub(crate) secret: Option<&'a BigUint>,
}

impl<'a> RoundContext<'a> {
    fn group(&self) -> &'static Group {
        self.config.group()
    }

    fn secret(&self) -> Result<&'a BigUint, Error> {
        self.secret.ok_or(Error::MissingSecret)
    }

    fn require_element(&self, name: &'static str, value: &BigUint) -> Result<(), Rejection> {
        if self.config.is_group_element(value) {
            Ok(())
        } else {
            Err(Rejection::InvalidElement(name))
        }
    }
}

fn require(valid: bool, name: &'static str) -> Result<(), Rejection> {
    if valid {
        Ok(())
    } else {
        Err(Rejection::InvalidProof(name))
    }
}

fn same_element(l: &BigUint, r: &BigUint) -> bool {
    bool::from(l.to_bytes_be().ct_eq(&r.to_bytes_be()))
}

/// Builds SMP1.
pub(crate) fn initiate(ctx: &mut RoundContext<'_>) -> crate::Result<(Round1, Smp1)> {
    let group = ctx.group();
    let [a2, a3, r2, r3] = ctx.nonces.exponents::<4>()?;

    let smp1 = Smp1::new(
        group.exp_generator(&a2),
        prove_knowledge(group, &r2, &a2, ProofLabel::InitiatorG2),
        group.exp_generator(&a3),
        prove_knowledge(group, &r3, &a3, ProofLabel::InitiatorG3),
    );
    debug!("built SMP1");

    Ok((Round1 { a2, a3 }, smp1))
}

/// Verifies SMP1 and builds SMP2.
pub(crate) fn answer_smp1(ctx: &mut RoundContext<'_>, msg: &Smp1) -> RoundResult<(Round2, Smp2)> {
    let group = ctx.group();
    let secret = ctx.secret()?;

    ctx.require_element("g2a", msg.g2a())?;
    ctx.require_element("g3a", msg.g3a())?;
    require(
        verify_knowledge(group, msg.g2a_proof(), msg.g2a(), ProofLabel::InitiatorG2),
        "g2a",
    )?;
    require(
        verify_knowledge(group, msg.g3a_proof(), msg.g3a(), ProofLabel::InitiatorG3),
        "g3a",
    )?;

    let [b2, b3, r2, r3, r4, r5, r6] = ctx.nonces.exponents::<7>()?;

    let g2 = group.exp(msg.g2a(), &b2);
    let g3 = group.exp(msg.g3a(), &b3);
    let pb = group.exp(&g3, &r4);
    let qb = group.mul(&group.exp_generator(&r4), &group.exp(&g2, secret));
    let coordinates = prove_coordinates(
        group,
        &g2,
        &g3,
        &r4,
        secret,
        &r5,
        &r6,
        ProofLabel::ResponderCoordinates,
    );

    let smp2 = Smp2::new(
        group.exp_generator(&b2),
        prove_knowledge(group, &r2, &b2, ProofLabel::ResponderG2),
        group.exp_generator(&b3),
        prove_knowledge(group, &r3, &b3, ProofLabel::ResponderG3),
        pb.clone(),
        qb.clone(),
        coordinates,
    );
    debug!("verified SMP1, built SMP2");

    let round = Round2 {
        g2,
        g3,
        g3a: msg.g3a().clone(),
        pb,
        qb,
        b3,
    };
    Ok((round, smp2))
}

/// Verifies SMP2 against round 1 and builds SMP3.
pub(crate) fn answer_smp2(
    ctx: &mut RoundContext<'_>,
    round: &Round1,
    msg: &Smp2,
) -> RoundResult<(Round3, Smp3)> {
    let group = ctx.group();
    let secret = ctx.secret()?;

    ctx.require_element("g2b", msg.g2b())?;
    ctx.require_element("g3b", msg.g3b())?;
    ctx.require_element("Pb", msg.pb())?;
    ctx.require_element("Qb", msg.qb())?;
    require(
        verify_knowledge(group, msg.g2b_proof(), msg.g2b(), ProofLabel::ResponderG2),
        "g2b",
    )?;
    require(
        verify_knowledge(group, msg.g3b_proof(), msg.g3b(), ProofLabel::ResponderG3),
        "g3b",
    )?;

    let g2 = group.exp(msg.g2b(), &round.a2);
    let g3 = group.exp(msg.g3b(), &round.a3);
    require(
        verify_coordinates(
            group,
            msg.coordinates(),
            &g2,
            &g3,
            msg.pb(),
            msg.qb(),
            ProofLabel::ResponderCoordinates,
        ),
        "Pb/Qb",
    )?;

    let [r4, r5, r6, r7] = ctx.nonces.exponents::<4>()?;

    let pa = group.exp(&g3, &r4);
    let qa = group.mul(&group.exp_generator(&r4), &group.exp(&g2, secret));
    let coordinates = prove_coordinates(
        group,
        &g2,
        &g3,
        &r4,
        secret,
        &r5,
        &r6,
        ProofLabel::InitiatorCoordinates,
    );

    let qaqb = group.div(&qa, msg.qb())?;
    let papb = group.div(&pa, msg.pb())?;
    let ra = group.exp(&qaqb, &round.a3);
    let ratio = prove_equality(group, &qaqb, &round.a3, &r7, ProofLabel::InitiatorRatio);

    let smp3 = Smp3::new(pa, qa, coordinates, ra, ratio);
    debug!("verified SMP2, built SMP3");

    let next = Round3 {
        a3: round.a3.clone(),
        g3b: msg.g3b().clone(),
        qaqb,
        papb,
    };
    Ok((next, smp3))
}

/// Verifies SMP3 against round 2 and compares the secrets.
///
/// Returns SMP4 when the secrets match and `None` when they differ.
pub(crate) fn answer_smp3(
    ctx: &mut RoundContext<'_>,
    round: &Round2,
    msg: &Smp3,
) -> RoundResult<Option<Smp4>> {
    let group = ctx.group();

    ctx.require_element("Pa", msg.pa())?;
    ctx.require_element("Qa", msg.qa())?;
    ctx.require_element("Ra", msg.ra())?;
    require(
        verify_coordinates(
            group,
            msg.coordinates(),
            &round.g2,
            &round.g3,
            msg.pa(),
            msg.qa(),
            ProofLabel::InitiatorCoordinates,
        ),
        "Pa/Qa",
    )?;

    let qaqb = group.div(msg.qa(), &round.qb)?;
    require(
        verify_equality(
            group,
            msg.ratio(),
            &round.g3a,
            &qaqb,
            msg.ra(),
            ProofLabel::InitiatorRatio,
        ),
        "Ra",
    )?;

    let papb = group.div(msg.pa(), &round.pb)?;
    let rab = group.exp(msg.ra(), &round.b3);
    if !same_element(&rab, &papb) {
        debug!("verified SMP3, secrets differ");
        return Ok(None);
    }

    let [r7] = ctx.nonces.exponents::<1>()?;
    let rb = group.exp(&qaqb, &round.b3);
    let ratio = prove_equality(group, &qaqb, &round.b3, &r7, ProofLabel::ResponderRatio);
    debug!("verified SMP3, built SMP4");

    Ok(Some(Smp4::new(rb, ratio)))
}

/// Verifies SMP4 against round 3 and reports whether the secrets match.
pub(crate) fn answer_smp4(
    ctx: &mut RoundContext<'_>,
    round: &Round3,
    msg: &Smp4,
) -> RoundResult<bool> {
    let group = ctx.group();

    ctx.require_element("Rb", msg.rb())?;
    require(
        verify_equality(
            group,
            msg.ratio(),
            &round.g3b,
            &round.qaqb,
            msg.rb(),
            ProofLabel::ResponderRatio,
        ),
        "Rb",
    )?;

    let rab = group.exp(msg.rb(), &round.a3);
    Ok(same_element(&rab, &round.papb))
}
