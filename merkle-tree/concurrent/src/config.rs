use serde::{Deserialize, Serialize};

use crate::{canopy_size, concurrent_merkle_tree_account_size};

/// `(max_depth, max_buffer_size)` pairs accepted by the account compression
/// program.
pub const DEPTH_SIZE_PAIRS: [(u32, u32); 26] = [
    (3, 8),
    (5, 8),
    (14, 64),
    (14, 256),
    (14, 1024),
    (14, 2048),
    (15, 64),
    (16, 64),
    (17, 64),
    (18, 64),
    (19, 64),
    (20, 64),
    (20, 256),
    (20, 1024),
    (20, 2048),
    (24, 64),
    (24, 256),
    (24, 512),
    (24, 1024),
    (24, 2048),
    (26, 512),
    (26, 1024),
    (26, 2048),
    (30, 512),
    (30, 1024),
    (30, 2048),
];

/// Shape of a concurrent Merkle tree account.
///
/// The configuration is submitted verbatim when the tree is created. Whether
/// the depth/buffer combination is accepted is decided on-chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
    pub max_depth: u32,
    pub max_buffer_size: u32,
    pub canopy_depth: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_buffer_size: 8,
            canopy_depth: 0,
        }
    }
}

impl TreeConfig {
    pub fn new(max_depth: u32, max_buffer_size: u32, canopy_depth: u32) -> Self {
        Self {
            max_depth,
            max_buffer_size,
            canopy_depth,
        }
    }

    /// Number of bytes to allocate for the tree account, canopy included.
    pub fn account_size(&self) -> usize {
        concurrent_merkle_tree_account_size(self.max_depth, self.max_buffer_size)
            .saturating_add(canopy_size(self.canopy_depth))
    }

    /// Maximum number of leaves the tree can hold.
    pub fn capacity(&self) -> u64 {
        1u64.checked_shl(self.max_depth).unwrap_or(u64::MAX)
    }

    pub fn is_supported_depth_size_pair(&self) -> bool {
        DEPTH_SIZE_PAIRS.contains(&(self.max_depth, self.max_buffer_size))
    }
}
