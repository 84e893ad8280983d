use core::fmt;

use num_bigint::BigUint;

use super::field::{div_mod, mod_pow, mul_mod, sub_mod};
use crate::Result;

/// Prime-order subgroup of `Z_p^*` for a safe prime `p = 2q + 1`.
///
/// Group elements live modulo `p`; exponents and proof responses live modulo `q`.
/// Instances are immutable and shared process-wide (see [`crate::groups`]).
#[derive(Clone)]
pub struct Group {
    name: &'static str,
    generator: BigUint,
    modulus: BigUint,
    order: BigUint,
    modulus_minus_two: BigUint,
}

impl Group {
    /// Creates a group from its generator, prime modulus and subgroup order.
    pub fn new(name: &'static str, generator: BigUint, modulus: BigUint, order: BigUint) -> Self {
        let modulus_minus_two = &modulus - 2u32;
        Self {
            name,
            generator,
            modulus,
            order,
            modulus_minus_two,
        }
    }

    /// Human-readable group identifier.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The generator `g`.
    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    /// The prime modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The subgroup order `q`.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// `base^exp mod p`.
    pub fn exp(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        mod_pow(base, exp, &self.modulus)
    }

    /// `g^exp mod p`.
    pub fn exp_generator(&self, exp: &BigUint) -> BigUint {
        self.exp(&self.generator, exp)
    }

    /// `l * r mod p`.
    pub fn mul(&self, l: &BigUint, r: &BigUint) -> BigUint {
        mul_mod(l, r, &self.modulus)
    }

    /// `l / r mod p`.
    pub fn div(&self, l: &BigUint, r: &BigUint) -> Result<BigUint> {
        div_mod(l, r, &self.modulus)
    }

    /// Proof response `r - x * c mod q`.
    pub fn response(&self, r: &BigUint, x: &BigUint, c: &BigUint) -> BigUint {
        sub_mod(r, &(x * c), &self.order)
    }

    /// Range check used as the group-membership predicate: `2 <= value <= p - 2`.
    ///
    /// Rejects the identity, zero, `p - 1` (order two) and anything not reduced
    /// modulo `p`.
    pub fn contains(&self, value: &BigUint) -> bool {
        *value >= BigUint::from(2u32) && *value <= self.modulus_minus_two
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("bits", &self.modulus.bits())
            .finish()
    }
}
