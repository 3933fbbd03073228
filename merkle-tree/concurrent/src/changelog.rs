use std::mem;

use crate::NODE_SIZE;

/// Size of a single changelog entry stored in the tree account's ring buffer.
///
/// The on-chain layout of an entry is:
///
/// * `root` - the root after the change was applied,
/// * `path` - `max_depth` nodes from the changed leaf up to the root,
/// * `index` - `u32` index of the changed leaf,
/// * `_padding` - `u32`.
pub const fn changelog_size(max_depth: u32) -> usize {
    nodes_size(max_depth).saturating_add(NODE_SIZE + mem::size_of::<u32>() * 2)
}

/// Size of the rightmost path kept by the tree to allow appends without
/// proofs.
///
/// The on-chain layout of the path is:
///
/// * `proof` - `max_depth` sibling nodes,
/// * `leaf` - the rightmost leaf,
/// * `index` - `u32` index of the rightmost leaf,
/// * `_padding` - `u32`.
pub const fn path_size(max_depth: u32) -> usize {
    nodes_size(max_depth).saturating_add(NODE_SIZE + mem::size_of::<u32>() * 2)
}

const fn nodes_size(count: u32) -> usize {
    NODE_SIZE.saturating_mul(count as usize)
}
