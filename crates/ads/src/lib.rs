//! Set-membership ADS Library
//!
//! 这个库提供两种认证数据结构 (Authenticated Data Structures):
//!
//! ## 当前实现
//! - **CryptoAccumulator**: RSA 风格的乘法累加器, membership witnesses,
//!   batch witness construction and (unverified) non-membership witnesses
//! - **MerkleTree**: address-indexed binary hash tree with path extraction
//!   and path replay
//!
//! Both produce a short commitment (accumulator value or root hash) and proof
//! artifacts that a verifier checks without the full set.

#[macro_use]
extern crate log;

// ========================================
// Common utilities (shared across all ADS)
// ========================================

/// Digest utilities - 通用摘要工具
pub mod digest;
pub use digest::{hash, hash_pair, hash_with_name};

pub mod error;
pub use error::{AdsError, Result};

// ========================================
// ADS Implementations
// ========================================

/// Multiplicative accumulator over `Z_N`
pub mod crypto_accumulator;

/// Binary Merkle tree
pub mod merkle_tree;

// Re-export commonly used types
pub use crypto_accumulator::{
    Accumulator, AccumulatorParams, NonMembershipWitness, PrimeSupplier, Witness, WitnessSet,
};
pub use merkle_tree::{build_tree, verify_path, LeafAddress, MerkleTree, PathStep, ProofPath};

/// Commit / prove / verify, shared by every ADS in this crate.
pub trait AuthenticatedDataStructure<T: ?Sized> {
    type Commitment;
    type Proof;

    /// The short value a verifier holds.
    fn commitment(&self) -> Self::Commitment;

    /// Proof that `element` is part of the committed set.
    fn prove(&self, element: &T) -> Result<Self::Proof>;

    /// Checks `proof` for `element` against `commitment`. A failed check is
    /// `false`, never an error.
    fn verify(&self, commitment: &Self::Commitment, element: &T, proof: &Self::Proof) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_public_types_are_send_sync() {
        assert_send_sync::<MerkleTree>();
        assert_send_sync::<ProofPath>();
        assert_send_sync::<PathStep>();
        assert_send_sync::<LeafAddress>();
        assert_send_sync::<Accumulator>();
        assert_send_sync::<Witness>();
        assert_send_sync::<WitnessSet>();
        assert_send_sync::<NonMembershipWitness>();
        assert_send_sync::<AccumulatorParams>();
        assert_send_sync::<AdsError>();
    }
}
