/// Index of a node in the tree's arena.
pub type NodeId = usize;

/// One node of the Merkle tree.
///
/// `parent` and `sibling` stay `None` until the node is paired during
/// resolution. The root keeps both `None` and has the empty address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub hash: String,
    /// Bit-string path from the root, e.g. `"0110"`.
    pub address: String,
    pub parent: Option<NodeId>,
    pub sibling: Option<NodeId>,
    /// True if this node is the left input of its parent's hash.
    pub is_left: bool,
}

impl Node {
    pub fn new(hash: String, address: String) -> Self {
        Self {
            hash,
            address,
            parent: None,
            sibling: None,
            is_left: false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.address.is_empty()
    }
}

/// Number of address bits for `leaf_count` leaves: `ceil(log2(leaf_count))`.
pub fn address_bits(leaf_count: usize) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (usize::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

/// Address of leaf `index`, zero-padded to `width` bits.
pub fn leaf_address(index: usize, width: usize) -> String {
    if width == 0 {
        String::new()
    } else {
        format!("{:0width$b}", index, width = width)
    }
}

/// The address with its last bit flipped. `address` must be non-empty.
pub fn sibling_address(address: &str) -> String {
    let (prefix, last) = address.split_at(address.len() - 1);
    let flipped = if last == "0" { '1' } else { '0' };
    let mut sibling = String::with_capacity(address.len());
    sibling.push_str(prefix);
    sibling.push(flipped);
    sibling
}

/// The address with its last bit removed. `address` must be non-empty.
pub fn parent_address(address: &str) -> &str {
    &address[..address.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_bits() {
        assert_eq!(address_bits(1), 0);
        assert_eq!(address_bits(2), 1);
        assert_eq!(address_bits(3), 2);
        assert_eq!(address_bits(4), 2);
        assert_eq!(address_bits(5), 3);
        assert_eq!(address_bits(1023), 10);
        assert_eq!(address_bits(1024), 10);
        assert_eq!(address_bits(1025), 11);
    }

    #[test]
    fn test_leaf_address() {
        assert_eq!(leaf_address(0, 0), "");
        assert_eq!(leaf_address(2, 2), "10");
        assert_eq!(leaf_address(100, 10), "0001100100");
    }

    #[test]
    fn test_sibling_and_parent() {
        assert_eq!(sibling_address("0110"), "0111");
        assert_eq!(sibling_address("1"), "0");
        assert_eq!(parent_address("0110"), "011");
        assert_eq!(parent_address("1"), "");
    }
}
