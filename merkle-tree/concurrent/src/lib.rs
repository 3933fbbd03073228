//! Byte layout of the concurrent Merkle tree accounts owned by the account
//! compression program.
//!
//! A tree account consists of:
//!
//! * a two byte prefix (account type + header version),
//! * the V1 header (buffer size, depth, authority, creation slot, padding),
//! * the tree body (sequence number, active index, buffer size, a ring buffer
//!   of `max_buffer_size` changelog entries and the rightmost path),
//! * an optional canopy caching the upper levels of the tree.
//!
//! Nothing here validates the configuration. An invalid depth/buffer pair is
//! sized like any other and gets rejected by the program when the tree is
//! created. Sizes saturate at `usize::MAX` instead of overflowing.

use std::mem;

pub mod changelog;
pub mod config;

pub use changelog::{changelog_size, path_size};
pub use config::{TreeConfig, DEPTH_SIZE_PAIRS};

/// Size of a tree node (hash).
pub const NODE_SIZE: usize = 32;

/// Account type discriminant and header version.
pub const ACCOUNT_PREFIX_SIZE: usize = 2;

/// `max_buffer_size: u32`, `max_depth: u32`, `authority: Pubkey`,
/// `creation_slot: u64`, `is_batch_initialized: bool`, `_padding: [u8; 5]`.
pub const HEADER_V1_SIZE: usize = 4 + 4 + 32 + 8 + 1 + 5;

/// `sequence_number`, `active_index` and `buffer_size`, all `u64`.
pub const TREE_METADATA_SIZE: usize = mem::size_of::<u64>() * 3;

/// Size of the tree body without the account prefix and header.
pub const fn concurrent_merkle_tree_size(max_depth: u32, max_buffer_size: u32) -> usize {
    TREE_METADATA_SIZE
        .saturating_add((max_buffer_size as usize).saturating_mul(changelog_size(max_depth)))
        .saturating_add(path_size(max_depth))
}

/// Exact number of bytes of a concurrent Merkle tree account without canopy.
pub const fn concurrent_merkle_tree_account_size(max_depth: u32, max_buffer_size: u32) -> usize {
    (ACCOUNT_PREFIX_SIZE + HEADER_V1_SIZE)
        .saturating_add(concurrent_merkle_tree_size(max_depth, max_buffer_size))
}

/// Number of bytes of a canopy caching `canopy_depth` levels below the root.
pub const fn canopy_size(canopy_depth: u32) -> usize {
    if canopy_depth == 0 {
        return 0;
    }
    let nodes = match canopy_depth.checked_add(1) {
        Some(shift) => match 1usize.checked_shl(shift) {
            Some(levels) => levels - 2,
            None => usize::MAX,
        },
        None => usize::MAX,
    };
    nodes.saturating_mul(NODE_SIZE)
}
