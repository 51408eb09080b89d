//! Public accumulator parameters and the prime-supplier seam.
//!
//! Generating (strong) primes is outside this crate; callers plug in a
//! `PrimeSupplier`. Nothing here tests primality or bit strength.

use super::accumulator::Accumulator;
use super::decimal_serde;
use crate::error::{AdsError, Result};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Source of large primes.
pub trait PrimeSupplier {
    /// Returns a prime of roughly `bit_length` bits; `strong` requests a
    /// strong prime.
    fn get_prime(&mut self, bit_length: u64, strong: bool) -> Result<BigInt>;
}

/// Hands out a fixed list of primes in order. Useful for tests and for
/// replaying parameters produced elsewhere.
#[derive(Debug, Clone, Default)]
pub struct FixedPrimes {
    primes: VecDeque<BigInt>,
}

impl FixedPrimes {
    pub fn new<I>(primes: I) -> Self
    where
        I: IntoIterator<Item = BigInt>,
    {
        Self {
            primes: primes.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.primes.len()
    }
}

impl PrimeSupplier for FixedPrimes {
    fn get_prime(&mut self, bit_length: u64, _strong: bool) -> Result<BigInt> {
        let prime = self.primes.pop_front().ok_or_else(|| {
            AdsError::InvalidParameter("fixed prime supply is exhausted".to_string())
        })?;
        if prime.bits() > bit_length {
            warn!(
                "supplied prime has {} bits, {} were requested",
                prime.bits(),
                bit_length
            );
        }
        Ok(prime)
    }
}

/// Modulus and generator for one accumulator instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatorParams {
    #[serde(with = "decimal_serde")]
    pub modulus: BigInt,
    #[serde(with = "decimal_serde")]
    pub generator: BigInt,
}

impl AccumulatorParams {
    /// Draws an RSA modulus `p*q` (two primes of `modulus_bits / 2` bits) and a
    /// generator prime from `supplier`.
    pub fn generate<S: PrimeSupplier + ?Sized>(
        supplier: &mut S,
        modulus_bits: u64,
        strong: bool,
    ) -> Result<Self> {
        if modulus_bits < 4 {
            return Err(AdsError::InvalidParameter(format!(
                "modulus must have at least 4 bits, got {}",
                modulus_bits
            )));
        }
        let half = modulus_bits / 2;
        let p = supplier.get_prime(half, strong)?;
        let q = supplier.get_prime(half, strong)?;
        let generator = supplier.get_prime(half, false)?;
        let modulus = p * q;
        debug!(
            "generated accumulator parameters: {}-bit modulus (strong primes: {})",
            modulus.bits(),
            strong
        );
        Ok(Self { modulus, generator })
    }

    /// The accumulator of the empty set.
    pub fn initial_accumulator(&self) -> Accumulator {
        Accumulator::new(self.generator.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_from_fixed_primes() {
        let mut supplier = FixedPrimes::new([61u32, 53, 7].map(BigInt::from));
        let params = AccumulatorParams::generate(&mut supplier, 12, false).unwrap();
        assert_eq!(params.modulus, BigInt::from(3233));
        assert_eq!(params.generator, BigInt::from(7));
        assert_eq!(params.initial_accumulator().value(), &BigInt::from(7));
        assert_eq!(supplier.remaining(), 0);
    }

    #[test]
    fn test_exhausted_supply() {
        let mut supplier = FixedPrimes::new([61u32].map(BigInt::from));
        assert!(matches!(
            AccumulatorParams::generate(&mut supplier, 12, true),
            Err(AdsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_too_small_modulus() {
        let mut supplier = FixedPrimes::default();
        assert!(AccumulatorParams::generate(&mut supplier, 2, false).is_err());
    }
}
