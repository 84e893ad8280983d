use std::sync::OnceLock;

use num_bigint::BigUint;

use crate::crypto::Group;

/// RFC 3526 1536-bit MODP prime (group 5), as used by OTR.
const MODP_1536_P: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1",
    "29024E088A67CC74020BBEA63B139B22514A08798E3404DD",
    "EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245",
    "E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D",
    "C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F",
    "83655D23DCA3AD961C62F356208552BB9ED529077096966D",
    "670C354E4ABC9804F1746C08CA237327FFFFFFFFFFFFFFFF",
);

/// Generator of the prime-order subgroup.
const MODP_1536_G: u32 = 2;

static MODP_1536: OnceLock<Group> = OnceLock::new();

/// The 1536-bit safe-prime group shared by every SMP session.
///
/// `p` is the RFC 3526 group 5 prime, `g = 2` and `q = (p - 1) / 2`.
/// Initialized once and never mutated.
pub fn modp1536() -> &'static Group {
    MODP_1536.get_or_init(|| {
        let bytes = hex::decode(MODP_1536_P)
            .unwrap_or_else(|_| unreachable!("RFC 3526 prime is valid hex"));
        let p = BigUint::from_bytes_be(&bytes);
        let q = (&p - 1u32) >> 1;
        Group::new("RFC3526-MODP-1536", BigUint::from(MODP_1536_G), p, q)
    })
}

#[cfg(test)]
mod tests {
    use num_traits::One;

    use super::*;

    #[test]
    fn modulus_is_1536_bits() {
        assert_eq!(modp1536().modulus().bits(), 1536);
        assert_eq!(modp1536().order().bits(), 1535);
    }

    #[test]
    fn generator_has_order_q() {
        let group = modp1536();
        let g_q = group.exp_generator(group.order());
        assert!(g_q.is_one());
        assert!(!group.exp_generator(&BigUint::from(2u32)).is_one());
    }

    #[test]
    fn order_matches_published_constant() {
        let expected = BigUint::parse_bytes(
            b"7FFFFFFFFFFFFFFFE487ED5110B4611A62633145C06E0E68948127044533E63A0105DF531D89CD9128A5043CC71A026EF7CA8CD9E69D218D98158536F92F8A1BA7F09AB6B6A8E122F242DABB312F3F637A262174D31BF6B585FFAE5B7A035BF6F71C35FDAD44CFD2D74F9208BE258FF324943328F6722D9EE1003E5C50B1DF82CC6D241B0E2AE9CD348B1FD47E9267AFC1B2AE91EE51D6CB0E3179AB1042A95DCF6A9483B84B4B36B3861AA7255E4C0278BA36046511B993FFFFFFFFFFFFFFFF",
            16,
        )
        .unwrap();
        assert_eq!(modp1536().order(), &expected);
    }

    #[test]
    fn shared_instance() {
        assert!(std::ptr::eq(modp1536(), modp1536()));
    }
}
