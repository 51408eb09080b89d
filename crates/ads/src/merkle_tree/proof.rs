use crate::digest::hash_pair;
use common::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One level of a Merkle path: `parent == hash(left || right)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub left: String,
    pub right: String,
    pub parent: String,
}

impl PathStep {
    pub fn new(left: String, right: String, parent: String) -> Self {
        Self {
            left,
            right,
            parent,
        }
    }
}

/// Steps from a leaf up to the root, leaf end first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPath {
    pub steps: Vec<PathStep>,
}

impl ProofPath {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The parent of the last step, i.e. the root this path claims.
    pub fn claimed_root(&self) -> Option<&str> {
        self.steps.last().map(|s| s.parent.as_str())
    }

    /// 计算证明的大小 (bytes of hash material carried)
    pub fn size_of(&self) -> usize {
        self.steps
            .iter()
            .map(|s| s.left.len() + s.right.len() + s.parent.len())
            .sum()
    }
}

/// Leaf position rebuilt while replaying a path, most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafAddress(String);

impl LeafAddress {
    pub fn bits(&self) -> &str {
        &self.0
    }

    /// Numeric value of the address; the empty address is 0.
    pub fn index(&self) -> Option<usize> {
        if self.0.is_empty() {
            return Some(0);
        }
        usize::from_str_radix(&self.0, 2).ok()
    }
}

impl fmt::Display for LeafAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replays `path` from `leaf_hash` and checks that it ends at `root`.
///
/// Each step must hash correctly and must contain the hash carried up from
/// the previous step. A side bit is prepended per step (`0` when the carried
/// hash is the left input, `1` when it is the right one). Returns the rebuilt
/// address, or `None` if the path does not prove `leaf_hash` under `root`.
pub fn verify_path(
    path: &ProofPath,
    leaf_hash: &str,
    root: &str,
    algorithm: HashAlgorithm,
) -> Option<LeafAddress> {
    let mut carried = leaf_hash;
    let mut address = String::with_capacity(path.len());

    for (level, step) in path.steps().iter().enumerate() {
        let side = if carried == step.left {
            '0'
        } else if carried == step.right {
            '1'
        } else {
            debug!("path step {} does not contain the carried hash", level);
            return None;
        };
        if hash_pair(&step.left, &step.right, algorithm) != step.parent {
            debug!("path step {} parent hash mismatch", level);
            return None;
        }
        address.insert(0, side);
        carried = &step.parent;
    }

    if carried != root {
        debug!("path ends at {} instead of the expected root", carried);
        return None;
    }
    Some(LeafAddress(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::hash;

    fn sha(data: &str) -> String {
        hash(data.as_bytes(), HashAlgorithm::Sha256)
    }

    fn two_leaf_path() -> (ProofPath, String, String) {
        let left = sha("a");
        let right = sha("b");
        let root = hash_pair(&left, &right, HashAlgorithm::Sha256);
        let path = ProofPath::new(vec![PathStep::new(left, right.clone(), root.clone())]);
        (path, right, root)
    }

    #[test]
    fn test_verify_two_leaf_path() {
        let (path, leaf, root) = two_leaf_path();
        let address = verify_path(&path, &leaf, &root, HashAlgorithm::Sha256).unwrap();
        assert_eq!(address.bits(), "1");
        assert_eq!(address.index(), Some(1));
        assert_eq!(path.claimed_root(), Some(root.as_str()));
        assert_eq!(path.size_of(), 3 * 64);
    }

    #[test]
    fn test_reject_wrong_root_or_leaf() {
        let (path, leaf, root) = two_leaf_path();
        assert!(verify_path(&path, &leaf, &sha("other"), HashAlgorithm::Sha256).is_none());
        assert!(verify_path(&path, &sha("c"), &root, HashAlgorithm::Sha256).is_none());
        // same material, different algorithm
        assert!(verify_path(&path, &leaf, &root, HashAlgorithm::Sha512).is_none());
    }

    #[test]
    fn test_empty_path_proves_single_leaf_root() {
        let leaf = sha("only");
        let address = verify_path(&ProofPath::default(), &leaf, &leaf, HashAlgorithm::Sha256).unwrap();
        assert_eq!(address.bits(), "");
        assert_eq!(address.index(), Some(0));
        assert!(verify_path(&ProofPath::default(), &leaf, &sha("x"), HashAlgorithm::Sha256).is_none());
    }

    #[test]
    fn test_path_json_round_trip() {
        let (path, _, _) = two_leaf_path();
        let json = serde_json::to_string(&path).unwrap();
        let back: ProofPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
