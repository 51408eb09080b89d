//! Cryptographic Accumulator Module
//!
//! RSA 风格的乘法累加器 (multiplicative accumulator over `Z_N`)
//!
//! ## 主要组件
//! - `utils`: modular exponentiation, extended Euclid, modular inverse
//! - `accumulator`: increments, membership witnesses, batch construction
//! - `non_membership`: Bezout-based non-membership witnesses (unverified)
//! - `params`: modulus/generator setup through a `PrimeSupplier`

pub mod accumulator;
pub mod non_membership;
pub mod params;
pub mod utils;

pub use accumulator::{
    build_batch, increment_accumulator, verify_membership, Accumulator, Witness, WitnessSet,
};
pub use non_membership::{
    compute_non_membership_witness, normalize_bezout, verify_non_membership,
    NonMembershipWitness, NormalizedBezout,
};
pub use params::{AccumulatorParams, FixedPrimes, PrimeSupplier};
pub use utils::{extended_gcd, mod_exp, mod_inverse};

/// Serialises big integers as decimal strings.
pub(crate) mod decimal_serde {
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigInt, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<BigInt>().map_err(serde::de::Error::custom)
    }
}
