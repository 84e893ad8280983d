//! Cryptographically secure randomness and protocol nonce generation.

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::{Error, Result};

/// Cryptographically secure random number generator.
///
/// This is a thin wrapper around `OsRng` that provides a consistent interface
/// for cryptographic randomness throughout the library.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

/// Draws the random exponents (`a2`, `b3`, `r4`, ...) used by each round.
///
/// Every exponent is `length` fresh bytes read as a big-endian integer. A source
/// that cannot deliver the full buffer is an error; bytes are never padded.
pub struct NonceGenerator {
    rng: Box<dyn RngCore + Send>,
    length: usize,
}

impl NonceGenerator {
    /// Creates a generator producing `length`-byte exponents from `rng`.
    pub fn new<R>(rng: R, length: usize) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            rng: Box::new(rng),
            length,
        }
    }

    /// Byte length of each exponent.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Draws a single exponent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShortRandomRead`] if the source fails to fill the buffer.
    pub fn exponent(&mut self) -> Result<BigUint> {
        let mut buf = vec![0u8; self.length];
        self.rng
            .try_fill_bytes(&mut buf)
            .map_err(|_| Error::ShortRandomRead)?;
        Ok(BigUint::from_bytes_be(&buf))
    }

    /// Draws `N` exponents at once; either all of them are produced or none.
    pub fn exponents<const N: usize>(&mut self) -> Result<[BigUint; N]> {
        let mut drawn = Vec::with_capacity(N);
        for _ in 0..N {
            drawn.push(self.exponent()?);
        }
        Ok(drawn
            .try_into()
            .unwrap_or_else(|_: Vec<BigUint>| unreachable!("exactly N exponents were drawn")))
    }
}
