use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Lowercase hex digest of a Merkle root or any hashed record
pub type RootHash = String;

// Digest algorithm used for leaves and interior nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
    Blake2b,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 3] = [Self::Sha256, Self::Sha512, Self::Blake2b];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake2b => "blake2b",
        }
    }

    /// Length of the hex digest in characters.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha512 | Self::Blake2b => 128,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown hash algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "blake2b" => Ok(Self::Blake2b),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

// What happens to a node that has no sibling on its level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddNodePolicy {
    /// Move the lone node up one level unchanged; no hash is computed for it.
    #[default]
    Promote,
    /// Pair the lone node with itself, `parent = hash(h || h)`.
    Duplicate,
}

// Configuration shared by tree construction and accumulator setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofConfig {
    pub hash_algorithm: HashAlgorithm,
    pub odd_node_policy: OddNodePolicy,
    pub modulus_bits: u64,
    pub strong_primes: bool,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Sha256,
            odd_node_policy: OddNodePolicy::Promote,
            modulus_bits: 2048,
            strong_primes: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_names() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.name().parse::<HashAlgorithm>().unwrap(), algorithm);
        }
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!(
            "md5".parse::<HashAlgorithm>(),
            Err(UnknownAlgorithm("md5".to_string()))
        );
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: ProofConfig = serde_json::from_str(r#"{"odd_node_policy":"duplicate"}"#).unwrap();
        assert_eq!(config.odd_node_policy, OddNodePolicy::Duplicate);
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.modulus_bits, 2048);
        assert!(!config.strong_primes);
    }

    #[test]
    fn test_config_serializes_lowercase_names() {
        let config = ProofConfig {
            hash_algorithm: HashAlgorithm::Blake2b,
            ..ProofConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""hash_algorithm":"blake2b""#));
        assert!(json.contains(r#""odd_node_policy":"promote""#));
    }
}
