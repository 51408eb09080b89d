//! Multiplicative (RSA-style) accumulator: `acc' = acc^value mod N`.
//!
//! Members are assumed to be pairwise coprime (ideally prime); nothing here
//! checks that. There is no removal: the accumulator only grows.

use super::decimal_serde;
use super::utils::mod_exp;
use crate::error::{AdsError, Result};
use crate::AuthenticatedDataStructure;
use num_bigint::BigInt;
use num_traits::Signed;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The current commitment to a set of member values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accumulator(#[serde(with = "decimal_serde")] BigInt);

impl Accumulator {
    pub fn new(value: BigInt) -> Self {
        Accumulator(value)
    }

    pub fn value(&self) -> &BigInt {
        &self.0
    }

    pub fn into_inner(self) -> BigInt {
        self.0
    }
}

impl From<BigInt> for Accumulator {
    fn from(value: BigInt) -> Self {
        Accumulator(value)
    }
}

impl fmt::Display for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A membership witness: the accumulator as it would be without the member.
/// Valid for `value` iff `witness^value mod N == acc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Witness(#[serde(with = "decimal_serde")] BigInt);

impl Witness {
    pub fn new(value: BigInt) -> Self {
        Witness(value)
    }

    pub fn value(&self) -> &BigInt {
        &self.0
    }

    pub fn into_inner(self) -> BigInt {
        self.0
    }
}

impl From<BigInt> for Witness {
    fn from(value: BigInt) -> Self {
        Witness(value)
    }
}

impl From<Accumulator> for Witness {
    fn from(acc: Accumulator) -> Self {
        Witness(acc.0)
    }
}

impl fmt::Display for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn check_member(value: &BigInt) -> Result<()> {
    if !value.is_positive() {
        return Err(AdsError::InvalidParameter(format!(
            "member value must be positive, got {}",
            value
        )));
    }
    Ok(())
}

/// Folds `value` into `acc`: returns `acc^value mod modulus`.
pub fn increment_accumulator(
    acc: &Accumulator,
    value: &BigInt,
    modulus: &BigInt,
) -> Result<Accumulator> {
    check_member(value)?;
    Ok(Accumulator(mod_exp(&acc.0, value, modulus)?))
}

/// Checks `witness^value mod modulus == acc`.
///
/// A mismatch is an honest negative and returns `Ok(false)`; only malformed
/// parameters are errors.
pub fn verify_membership(
    acc: &Accumulator,
    value: &BigInt,
    witness: &Witness,
    modulus: &BigInt,
) -> Result<bool> {
    let expected = increment_accumulator(&Accumulator(witness.0.clone()), value, modulus)?;
    Ok(expected == *acc)
}

/// Builds the final accumulator for `values` starting at `seed`, together with
/// one witness per value (same order as `values`).
///
/// Witness generation is the naive strategy: every append re-increments all
/// existing witnesses, so `k` members cost `O(k^2)` modular exponentiations.
pub fn build_batch(
    seed: &Accumulator,
    values: &[BigInt],
    modulus: &BigInt,
) -> Result<(Accumulator, Vec<Witness>)> {
    let mut set = WitnessSet::new(seed.clone(), modulus.clone())?;
    for value in values {
        set.add(value.clone())?;
    }
    debug!(
        "built batch accumulator over {} members ({} increments)",
        values.len(),
        values.len() * (values.len() + 1) / 2
    );
    let (acc, entries) = set.into_parts();
    Ok((acc, entries.into_iter().map(|(_, w)| w).collect()))
}

/// An append-only accumulator that keeps every member's witness current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessSet {
    modulus: BigInt,
    acc: Accumulator,
    entries: Vec<(BigInt, Witness)>,
}

impl WitnessSet {
    pub fn new(seed: Accumulator, modulus: BigInt) -> Result<Self> {
        if !modulus.is_positive() {
            return Err(AdsError::InvalidParameter(format!(
                "modulus must be >= 1, got {}",
                modulus
            )));
        }
        Ok(Self {
            modulus,
            acc: seed,
            entries: Vec::new(),
        })
    }

    /// Appends `value`. Existing witnesses absorb the value; the new member's
    /// witness is the accumulator before the append.
    pub fn add(&mut self, value: BigInt) -> Result<()> {
        check_member(&value)?;
        for (_, witness) in self.entries.iter_mut() {
            witness.0 = mod_exp(&witness.0, &value, &self.modulus)?;
        }
        let next = increment_accumulator(&self.acc, &value, &self.modulus)?;
        let previous = std::mem::replace(&mut self.acc, next);
        trace!("appended member #{} to witness set", self.entries.len());
        self.entries.push((value, previous.into()));
        Ok(())
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.acc
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    /// Witness of the first occurrence of `value`.
    pub fn witness_for(&self, value: &BigInt) -> Option<&Witness> {
        self.entries
            .iter()
            .find(|(member, _)| member == value)
            .map(|(_, witness)| witness)
    }

    /// Member values in insertion order.
    pub fn members(&self) -> impl Iterator<Item = &BigInt> {
        self.entries.iter().map(|(member, _)| member)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_parts(self) -> (Accumulator, Vec<(BigInt, Witness)>) {
        (self.acc, self.entries)
    }
}

impl AuthenticatedDataStructure<BigInt> for WitnessSet {
    type Commitment = Accumulator;
    type Proof = Witness;

    fn commitment(&self) -> Accumulator {
        self.acc.clone()
    }

    fn prove(&self, element: &BigInt) -> Result<Witness> {
        self.witness_for(element)
            .cloned()
            .ok_or_else(|| AdsError::NotFound(format!("member {} is not in the set", element)))
    }

    fn verify(&self, commitment: &Accumulator, element: &BigInt, proof: &Witness) -> bool {
        match verify_membership(commitment, element, proof, &self.modulus) {
            Ok(valid) => valid,
            Err(e) => {
                debug!("membership check for {} rejected: {}", element, e);
                false
            }
        }
    }
}
