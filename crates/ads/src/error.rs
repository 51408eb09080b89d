use common::UnknownAlgorithm;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdsError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not invertible: {0}")]
    NotInvertible(String),

    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Tree corruption: {0}")]
    TreeCorruption(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Proof construction failed: {0}")]
    ProofConstructionFailed(String),
}

impl From<UnknownAlgorithm> for AdsError {
    fn from(err: UnknownAlgorithm) -> Self {
        AdsError::UnsupportedAlgorithm(err.0)
    }
}

pub type Result<T> = std::result::Result<T, AdsError>;
