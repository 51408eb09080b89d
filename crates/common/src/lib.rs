pub mod types;

// Re-export commonly used types
pub use types::{HashAlgorithm, OddNodePolicy, ProofConfig, RootHash, UnknownAlgorithm};
