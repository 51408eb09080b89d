//! Address-indexed binary Merkle tree.
//!
//! Leaves get the zero-padded binary form of their position as address.
//! Construction runs resolution passes: every unresolved node looks for the
//! node at its sibling address (last bit flipped), the pair is hashed into a
//! parent at the truncated address, and the parent joins the next pass. A node
//! with no sibling is handled by the tree's [`OddNodePolicy`].
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by index.

pub mod node;
pub mod proof;

pub use node::{Node, NodeId};
pub use proof::{verify_path, LeafAddress, PathStep, ProofPath};

use crate::digest::{hash, hash_pair};
use crate::error::{AdsError, Result};
use crate::AuthenticatedDataStructure;
use common::{HashAlgorithm, OddNodePolicy, ProofConfig, RootHash};
use node::{address_bits, leaf_address, parent_address, sibling_address};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Immutable Merkle tree over an ordered list of records.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    algorithm: HashAlgorithm,
    policy: OddNodePolicy,
    depth: usize,
    nodes: Vec<Node>,
    /// address -> node; addresses of promoted nodes are moved, not duplicated
    addresses: HashMap<String, NodeId>,
    /// leaf nodes in record order
    leaves: Vec<NodeId>,
    /// leaf hash -> position of its first occurrence
    leaf_positions: HashMap<String, usize>,
    unresolved: BTreeSet<NodeId>,
    root: NodeId,
}

/// Builds a tree and returns its root next to it.
pub fn build_tree<T: AsRef<[u8]>>(
    records: &[T],
    algorithm: HashAlgorithm,
    policy: OddNodePolicy,
) -> Result<(RootHash, MerkleTree)> {
    let tree = MerkleTree::with_options(records, algorithm, policy)?;
    Ok((tree.root().to_string(), tree))
}

impl MerkleTree {
    /// SHA-256 tree with the default odd-node policy.
    pub fn new<T: AsRef<[u8]>>(records: &[T]) -> Result<Self> {
        Self::with_options(records, HashAlgorithm::default(), OddNodePolicy::default())
    }

    pub fn from_config<T: AsRef<[u8]>>(records: &[T], config: &ProofConfig) -> Result<Self> {
        Self::with_options(records, config.hash_algorithm, config.odd_node_policy)
    }

    pub fn with_options<T: AsRef<[u8]>>(
        records: &[T],
        algorithm: HashAlgorithm,
        policy: OddNodePolicy,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(AdsError::InvalidParameter(
                "cannot build a merkle tree without leaves".to_string(),
            ));
        }

        let depth = address_bits(records.len());
        let mut tree = MerkleTree {
            algorithm,
            policy,
            depth,
            nodes: Vec::with_capacity(2 * records.len()),
            addresses: HashMap::with_capacity(2 * records.len()),
            leaves: Vec::with_capacity(records.len()),
            leaf_positions: HashMap::with_capacity(records.len()),
            unresolved: BTreeSet::new(),
            root: 0,
        };

        for (position, record) in records.iter().enumerate() {
            let id = tree.nodes.len();
            let leaf = Node::new(
                hash(record.as_ref(), algorithm),
                leaf_address(position, depth),
            );
            tree.addresses.insert(leaf.address.clone(), id);
            tree.leaf_positions.entry(leaf.hash.clone()).or_insert(position);
            if !leaf.is_root() {
                tree.unresolved.insert(id);
            }
            tree.nodes.push(leaf);
            tree.leaves.push(id);
        }

        let mut pending: Vec<NodeId> = tree.unresolved.iter().copied().collect();
        let mut passes = 0usize;
        while !tree.unresolved.is_empty() {
            if pending.is_empty() {
                return Err(AdsError::TreeCorruption(format!(
                    "{} nodes left unresolved after {} passes",
                    tree.unresolved.len(),
                    passes
                )));
            }
            passes += 1;
            pending = tree.resolve_pass(pending)?;
        }

        tree.root = tree
            .addresses
            .get("")
            .copied()
            .ok_or_else(|| AdsError::TreeCorruption("no node at the root address".to_string()))?;

        debug!(
            "built {} merkle tree: {} leaves, depth {}, {} nodes, {} passes, root {}",
            algorithm,
            records.len(),
            depth,
            tree.nodes.len(),
            passes,
            tree.root()
        );
        Ok(tree)
    }

    /// One resolution pass over `pending`; returns the nodes for the next pass.
    fn resolve_pass(&mut self, pending: Vec<NodeId>) -> Result<Vec<NodeId>> {
        let mut next = Vec::with_capacity(pending.len() / 2 + 1);
        let mut done: HashSet<NodeId> = HashSet::with_capacity(pending.len());

        for id in pending {
            if done.contains(&id) {
                continue;
            }
            let address = self.nodes[id].address.clone();
            if address.is_empty() {
                return Err(AdsError::TreeCorruption(format!(
                    "root node {} scheduled for resolution",
                    id
                )));
            }
            let up = parent_address(&address).to_string();

            let sibling = self
                .addresses
                .get(&sibling_address(&address))
                .copied()
                .filter(|&s| s != id);

            match (sibling, self.policy) {
                (Some(sibling), _) => {
                    let (left, right) = if address.ends_with('0') {
                        (id, sibling)
                    } else {
                        (sibling, id)
                    };
                    let parent = self.join(left, right, up);
                    done.insert(left);
                    done.insert(right);
                    if !self.nodes[parent].is_root() {
                        next.push(parent);
                    }
                }
                (None, OddNodePolicy::Promote) => {
                    trace!("promoting lone node at '{}' to '{}'", address, up);
                    self.promote(id, up);
                    done.insert(id);
                    if !self.nodes[id].is_root() {
                        next.push(id);
                    }
                }
                (None, OddNodePolicy::Duplicate) => {
                    trace!("pairing lone node at '{}' with itself", address);
                    let parent = self.join(id, id, up);
                    done.insert(id);
                    if !self.nodes[parent].is_root() {
                        next.push(parent);
                    }
                }
            }
        }
        Ok(next)
    }

    /// Registers `hash(left || right)` at `address` and links both children.
    fn join(&mut self, left: NodeId, right: NodeId, address: String) -> NodeId {
        let parent_hash = hash_pair(&self.nodes[left].hash, &self.nodes[right].hash, self.algorithm);
        let parent = self.nodes.len();
        let parent_node = Node::new(parent_hash, address.clone());
        let is_root = parent_node.is_root();
        self.nodes.push(parent_node);
        self.addresses.insert(address, parent);

        let right_node = &mut self.nodes[right];
        right_node.parent = Some(parent);
        right_node.sibling = Some(left);
        right_node.is_left = false;
        // left last so a self-paired node ends up marked as left
        let left_node = &mut self.nodes[left];
        left_node.parent = Some(parent);
        left_node.sibling = Some(right);
        left_node.is_left = true;

        self.unresolved.remove(&left);
        self.unresolved.remove(&right);
        if !is_root {
            self.unresolved.insert(parent);
        }
        parent
    }

    /// Moves a lone node to `address` without hashing it.
    fn promote(&mut self, id: NodeId, address: String) {
        let old = std::mem::replace(&mut self.nodes[id].address, address.clone());
        if self.addresses.get(&old) == Some(&id) {
            self.addresses.remove(&old);
        }
        if address.is_empty() {
            self.unresolved.remove(&id);
        }
        self.addresses.insert(address, id);
    }

    pub fn root(&self) -> &str {
        &self.nodes[self.root].hash
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn policy(&self) -> OddNodePolicy {
        self.policy
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Always false: a tree has at least one leaf.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Leaf address width, `ceil(log2(len))`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of nodes in the arena, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }

    /// Leaf hashes in record order.
    pub fn leaves(&self) -> impl Iterator<Item = &str> {
        self.leaves.iter().map(move |&id| self.nodes[id].hash.as_str())
    }

    pub fn contains_leaf(&self, leaf_hash: &str) -> bool {
        self.leaf_positions.contains_key(leaf_hash)
    }

    /// Position of the first leaf with this hash.
    pub fn position_of(&self, leaf_hash: &str) -> Option<usize> {
        self.leaf_positions.get(leaf_hash).copied()
    }

    /// Original (positional) address of a leaf.
    pub fn address_of(&self, leaf_hash: &str) -> Option<String> {
        self.position_of(leaf_hash)
            .map(|position| leaf_address(position, self.depth))
    }

    /// Node currently registered at `address`.
    pub fn node_at(&self, address: &str) -> Option<&Node> {
        self.addresses.get(address).map(|&id| &self.nodes[id])
    }

    /// Collects the path from a leaf to the root.
    ///
    /// Every step is re-hashed against the stored parent; a mismatch means the
    /// tree was corrupted after construction.
    pub fn find_path(&self, leaf_hash: &str) -> Result<ProofPath> {
        let position = self
            .position_of(leaf_hash)
            .ok_or_else(|| AdsError::NotFound(format!("leaf {} is not in the tree", leaf_hash)))?;

        let mut steps = Vec::with_capacity(self.depth);
        let mut current = self.leaves[position];
        while !self.nodes[current].is_root() {
            if steps.len() > self.nodes.len() {
                return Err(AdsError::TreeCorruption(
                    "parent links form a cycle".to_string(),
                ));
            }
            let node = &self.nodes[current];
            let (parent, sibling) = match (node.parent, node.sibling) {
                (Some(parent), Some(sibling)) => (parent, sibling),
                _ => {
                    return Err(AdsError::TreeCorruption(format!(
                        "node at address '{}' was never paired",
                        node.address
                    )))
                }
            };
            let (left, right) = if node.is_left {
                (current, sibling)
            } else {
                (sibling, current)
            };
            let left_hash = &self.nodes[left].hash;
            let right_hash = &self.nodes[right].hash;
            let computed = hash_pair(left_hash, right_hash, self.algorithm);
            if computed != self.nodes[parent].hash {
                return Err(AdsError::TreeCorruption(format!(
                    "hash mismatch above address '{}'",
                    node.address
                )));
            }
            steps.push(PathStep::new(left_hash.clone(), right_hash.clone(), computed));
            current = parent;
        }
        Ok(ProofPath::new(steps))
    }

    /// Verifies `path` for `leaf_hash` against this tree's root.
    pub fn verify_leaf(&self, path: &ProofPath, leaf_hash: &str) -> Option<LeafAddress> {
        verify_path(path, leaf_hash, self.root(), self.algorithm)
    }
}

impl AuthenticatedDataStructure<[u8]> for MerkleTree {
    type Commitment = RootHash;
    type Proof = ProofPath;

    fn commitment(&self) -> RootHash {
        self.root().to_string()
    }

    fn prove(&self, element: &[u8]) -> Result<ProofPath> {
        self.find_path(&hash(element, self.algorithm))
    }

    fn verify(&self, commitment: &RootHash, element: &[u8], proof: &ProofPath) -> bool {
        verify_path(proof, &hash(element, self.algorithm), commitment, self.algorithm).is_some()
    }
}
