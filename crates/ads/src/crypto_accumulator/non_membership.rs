//! Non-membership witnesses for the RSA-style accumulator.
//!
//! For a candidate `x` and member product `u`, extended Euclid gives
//! `a*x + b*u == 1`. The coefficients are shifted to `a2 = a + k*u`,
//! `b2 = b - k*x` with the smallest `k >= 0` such that `a2 >= 0` and `b2 <= 0`
//! hold together. The witness is `(a2, d)` with `d = (g^|b2|)^-1 mod N`, and it
//! is checked by `acc^a2 == d^x * g (mod N)`.
//!
//! WARNING: this normalisation has not been validated cryptographically. The
//! verification identity does not follow from the Bezout relation in general,
//! so construction usually reports `ProofConstructionFailed`. Treat such
//! failures as a reason to review the protocol, not as a bug to patch locally.

use super::accumulator::Accumulator;
use super::decimal_serde;
use super::utils::{extended_gcd, mod_exp, mod_inverse, normalize};
use crate::error::{AdsError, Result};
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

/// A proof that a value is not among the accumulated members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonMembershipWitness {
    /// The normalised coefficient `a2 >= 0`.
    #[serde(with = "decimal_serde")]
    pub a: BigInt,
    /// `d = (g^|b2|)^-1 mod N`.
    #[serde(with = "decimal_serde")]
    pub d: BigInt,
}

impl NonMembershipWitness {
    pub fn new(a: BigInt, d: BigInt) -> Self {
        Self { a, d }
    }
}

/// Bezout coefficients after sign normalisation, kept with the shift `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBezout {
    pub a: BigInt,
    pub b: BigInt,
    pub k: BigInt,
}

fn ceil_div(num: &BigInt, den: &BigInt) -> BigInt {
    // den > 0
    let q = num / den;
    if (num % den).is_positive() {
        q + 1
    } else {
        q
    }
}

/// Shifts `(a, b)` with `a*value + b*product == 1` to the smallest `k >= 0`
/// giving `a + k*product >= 0` and `b - k*value <= 0` simultaneously.
pub fn normalize_bezout(
    a: &BigInt,
    b: &BigInt,
    value: &BigInt,
    product: &BigInt,
) -> Result<NormalizedBezout> {
    if !value.is_positive() || !product.is_positive() {
        return Err(AdsError::ProofConstructionFailed(format!(
            "cannot normalise coefficients for value {} and product {}",
            value, product
        )));
    }

    // a + k*product >= 0  <=>  k >= ceil(-a / product)
    let k_a = ceil_div(&-a, product);
    // b - k*value <= 0    <=>  k >= ceil(b / value)
    let k_b = ceil_div(b, value);
    let k = [BigInt::zero(), k_a, k_b].into_iter().max().unwrap_or_default();

    let a2 = a + &k * product;
    let b2 = b - &k * value;
    if a2.is_negative() || b2.is_positive() {
        return Err(AdsError::ProofConstructionFailed(format!(
            "no shift k satisfies a2 >= 0 and b2 <= 0 (a={}, b={})",
            a, b
        )));
    }
    Ok(NormalizedBezout { a: a2, b: b2, k })
}

/// Builds a non-membership witness for `value` against `acc`, where `acc` was
/// accumulated from `generator` over `members`.
pub fn compute_non_membership_witness(
    acc: &Accumulator,
    value: &BigInt,
    generator: &BigInt,
    modulus: &BigInt,
    members: &[BigInt],
) -> Result<NonMembershipWitness> {
    if !value.is_positive() {
        return Err(AdsError::InvalidParameter(format!(
            "candidate value must be positive, got {}",
            value
        )));
    }
    if members.iter().any(|m| !m.is_positive()) {
        return Err(AdsError::InvalidParameter(
            "member values must be positive".to_string(),
        ));
    }

    let product: BigInt = members.iter().product();
    let (g, a, b) = extended_gcd(value, &product);
    if !g.is_one() {
        return Err(AdsError::ProofConstructionFailed(format!(
            "value {} shares factor {} with the member product",
            value, g
        )));
    }

    let normalized = normalize_bezout(&a, &b, value, &product)?;
    debug!(
        "non-membership normalisation used k = {} for {} members",
        normalized.k,
        members.len()
    );

    let g_b = mod_exp(generator, &normalized.b.abs(), modulus)?;
    let d = mod_inverse(&g_b, modulus).map_err(|e| match e {
        AdsError::NotInvertible(reason) => AdsError::ProofConstructionFailed(format!(
            "generator power is not invertible: {}",
            reason
        )),
        other => other,
    })?;

    let witness = NonMembershipWitness { a: normalized.a, d };
    if !verify_non_membership(acc, &witness, value, generator, modulus)? {
        warn!("non-membership witness for {} failed its own verification", value);
        return Err(AdsError::ProofConstructionFailed(format!(
            "witness for {} does not satisfy acc^a == d^x * g (mod N)",
            value
        )));
    }
    Ok(witness)
}

/// Checks `acc^a mod N == (d^value * generator) mod N`.
pub fn verify_non_membership(
    acc: &Accumulator,
    witness: &NonMembershipWitness,
    value: &BigInt,
    generator: &BigInt,
    modulus: &BigInt,
) -> Result<bool> {
    let lhs = mod_exp(acc.value(), &witness.a, modulus)?;
    let rhs = normalize(&(mod_exp(&witness.d, value, modulus)? * generator), modulus);
    Ok(lhs == rhs)
}
