use num_bigint::BigUint;

use crate::{Error, Result};

/// Computes `base^exp mod modulus`.
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exp, modulus)
}

/// Computes `l * r mod modulus`.
pub fn mul_mod(l: &BigUint, r: &BigUint, modulus: &BigUint) -> BigUint {
    (l * r) % modulus
}

/// Computes `l - r mod modulus`, always landing in `[0, modulus)`.
pub fn sub_mod(l: &BigUint, r: &BigUint, modulus: &BigUint) -> BigUint {
    let l = l % modulus;
    let r = r % modulus;
    if l >= r {
        l - r
    } else {
        modulus - (r - l)
    }
}

/// Returns the multiplicative inverse of `value` modulo `modulus`, if any.
pub fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    value.modinv(modulus)
}

/// Division over the prime field: `l * r^-1 mod modulus`.
///
/// # Errors
///
/// Returns [`Error::NotInvertible`] when `r` shares a factor with the modulus
/// (in practice only `r == 0 mod p`).
pub fn div_mod(l: &BigUint, r: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    let inverse = mod_inverse(r, modulus).ok_or(Error::NotInvertible)?;
    Ok(mul_mod(l, &inverse, modulus))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u32) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn sub_mod_wraps_negative_results() {
        assert_eq!(sub_mod(&big(3), &big(5), &big(11)), big(9));
        assert_eq!(sub_mod(&big(5), &big(3), &big(11)), big(2));
        assert_eq!(sub_mod(&big(4), &big(4), &big(11)), big(0));
    }

    #[test]
    fn sub_mod_reduces_oversized_operands() {
        assert_eq!(sub_mod(&big(30), &big(100), &big(11)), big(7));
    }

    #[test]
    fn div_mod_inverts_multiplication() {
        let p = big(23);
        let product = mul_mod(&big(7), &big(5), &p);
        assert_eq!(div_mod(&product, &big(5), &p).unwrap(), big(7));
    }

    #[test]
    fn div_mod_rejects_zero_divisor() {
        assert!(matches!(
            div_mod(&big(7), &big(0), &big(23)),
            Err(Error::NotInvertible)
        ));
    }

    #[test]
    fn mod_pow_small_numbers() {
        assert_eq!(mod_pow(&big(4), &big(6), &big(23)), big(2));
    }
}
