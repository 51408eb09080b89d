//! Digest utilities shared by every ADS in this crate.
//!
//! Every digest is rendered as a lowercase hex string; interior Merkle nodes
//! hash the concatenation of their children's hex strings.

use crate::error::Result;
use common::HashAlgorithm;
use sha2::{Digest, Sha256, Sha512};

/// Hashes `data` with `algorithm` and returns the lowercase hex digest.
pub fn hash(data: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
        HashAlgorithm::Blake2b => blake2b_simd::blake2b(data).to_hex().to_string(),
    }
}

/// Same as [`hash`] but selects the algorithm by name, e.g. `"sha256"`.
pub fn hash_with_name(data: &[u8], algorithm: &str) -> Result<String> {
    Ok(hash(data, algorithm.parse()?))
}

/// Parent digest of two sibling digests: `hash(left || right)`.
pub fn hash_pair(left: &str, right: &str, algorithm: HashAlgorithm) -> String {
    let mut joined = String::with_capacity(left.len() + right.len());
    joined.push_str(left);
    joined.push_str(right);
    hash(joined.as_bytes(), algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdsError;

    #[test]
    fn test_sha256_known_values() {
        assert_eq!(
            hash(b"0", HashAlgorithm::Sha256),
            "5feceb66ffc86f38d952786c6d696c79c2dbc239dd4e91b46729d73a27fb57e9"
        );
        assert_eq!(
            hash(b"", HashAlgorithm::Sha256),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_lengths_and_case() {
        for algorithm in HashAlgorithm::ALL {
            let digest = hash(b"record", algorithm);
            assert_eq!(digest.len(), algorithm.hex_len());
            assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            // deterministic
            assert_eq!(digest, hash(b"record", algorithm));
        }
        assert_ne!(
            hash(b"record", HashAlgorithm::Sha512),
            hash(b"record", HashAlgorithm::Blake2b)
        );
    }

    #[test]
    fn test_hash_with_name() {
        assert_eq!(
            hash_with_name(b"abc", "sha256").unwrap(),
            hash(b"abc", HashAlgorithm::Sha256)
        );
        assert_eq!(
            hash_with_name(b"abc", "whirlpool"),
            Err(AdsError::UnsupportedAlgorithm("whirlpool".to_string()))
        );
    }

    #[test]
    fn test_hash_pair_is_ordered() {
        let left = hash(b"0", HashAlgorithm::Sha256);
        let right = hash(b"1", HashAlgorithm::Sha256);
        let combined = hash_pair(&left, &right, HashAlgorithm::Sha256);
        assert_eq!(
            combined,
            hash(format!("{}{}", left, right).as_bytes(), HashAlgorithm::Sha256)
        );
        assert_ne!(combined, hash_pair(&right, &left, HashAlgorithm::Sha256));
    }
}
