//! Membership proofs
//!
//! Configuration layer over the `ads` crate: a `ProofConfig` read from JSON
//! picks the hash algorithm, the odd-node policy and the modulus size, and
//! the helpers below build trees and accumulator parameters from it.

use ads::{AccumulatorParams, MerkleTree, PrimeSupplier};
use anyhow::{Context, Result};
use common::ProofConfig;
use log::info;
use std::path::Path;

pub use ads;
pub use common;

/// Load proof configuration from a file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ProofConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ProofConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Save proof configuration to a file
pub fn save_config<P: AsRef<Path>>(config: &ProofConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(config).context("failed to encode config")?;
    std::fs::write(path, content)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(())
}

/// Builds a Merkle tree over `records` with the configured hash and policy.
pub fn build_tree<T: AsRef<[u8]>>(config: &ProofConfig, records: &[T]) -> Result<MerkleTree> {
    let tree = MerkleTree::from_config(records, config).with_context(|| {
        format!(
            "failed to build {} tree over {} records",
            config.hash_algorithm,
            records.len()
        )
    })?;
    info!(
        "built {} tree ({:?}) over {} records, root {}",
        config.hash_algorithm,
        config.odd_node_policy,
        tree.len(),
        tree.root()
    );
    Ok(tree)
}

/// Draws accumulator parameters of the configured size from `supplier`.
pub fn setup_accumulator<S: PrimeSupplier + ?Sized>(
    config: &ProofConfig,
    supplier: &mut S,
) -> Result<AccumulatorParams> {
    let params = AccumulatorParams::generate(supplier, config.modulus_bits, config.strong_primes)
        .with_context(|| {
            format!(
                "failed to set up a {}-bit accumulator",
                config.modulus_bits
            )
        })?;
    info!(
        "accumulator ready: {}-bit modulus",
        params.modulus.bits()
    );
    Ok(params)
}
