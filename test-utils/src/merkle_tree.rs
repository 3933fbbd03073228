use forge_client::rpc::{RpcConnection, SendOptions};
use forge_concurrent_merkle_tree::TreeConfig;
use mpl_bubblegum::instructions::CreateTreeConfigBuilder;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, signer::Signer};
use tracing::{info, warn};

use crate::{
    create_account_instruction,
    errors::MintError,
    pda::get_tree_authority_pda,
    programs::{SPL_ACCOUNT_COMPRESSION_ID, SPL_NOOP_ID},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerkleTree {
    pub address: Pubkey,
    pub authority_pda: Pubkey,
    /// Number of leaves the tree can hold.
    pub capacity: u64,
    pub tree_creator: Pubkey,
}

/// Creates the tree account and initializes its Bubblegum tree config.
pub fn create_merkle_tree_instructions(
    payer: &Pubkey,
    tree_keypair: &Keypair,
    config: &TreeConfig,
    rent: u64,
) -> Vec<Instruction> {
    let tree = tree_keypair.pubkey();
    let (tree_authority, _) = get_tree_authority_pda(&tree);

    let create_account_ix = create_account_instruction(
        payer,
        config.account_size(),
        rent,
        &SPL_ACCOUNT_COMPRESSION_ID,
        tree_keypair,
    );
    let create_tree_ix = CreateTreeConfigBuilder::new()
        .tree_config(tree_authority)
        .merkle_tree(tree)
        .payer(*payer)
        .tree_creator(*payer)
        .log_wrapper(SPL_NOOP_ID)
        .compression_program(SPL_ACCOUNT_COMPRESSION_ID)
        .max_depth(config.max_depth)
        .max_buffer_size(config.max_buffer_size)
        .public(false)
        .instruction();

    vec![create_account_ix, create_tree_ix]
}

/// Provisions a fresh tree owned by the compression program.
///
/// The tree keypair is generated here and dropped on failure, a retry always
/// targets a new address.
pub async fn provision_merkle_tree<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    config: &TreeConfig,
    options: SendOptions,
) -> Result<MerkleTree, MintError> {
    if !config.is_supported_depth_size_pair() {
        warn!(
            "Tree depth {} with buffer size {} is not a known valid pair, the compression program may reject it",
            config.max_depth, config.max_buffer_size
        );
    }
    let tree_keypair = Keypair::new();
    let rent = rpc
        .get_minimum_balance_for_rent_exemption(config.account_size())
        .await?;
    let instructions = create_merkle_tree_instructions(&payer.pubkey(), &tree_keypair, config, rent);

    rpc.create_and_send_transaction(
        &instructions,
        &payer.pubkey(),
        &[payer, &tree_keypair],
        options,
    )
    .await?;

    let tree = MerkleTree {
        address: tree_keypair.pubkey(),
        authority_pda: get_tree_authority_pda(&tree_keypair.pubkey()).0,
        capacity: config.capacity(),
        tree_creator: payer.pubkey(),
    };
    info!(
        "Provisioned merkle tree {} (depth {}, buffer {}, {} bytes)",
        tree.address,
        config.max_depth,
        config.max_buffer_size,
        config.account_size()
    );
    Ok(tree)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_create_merkle_tree_instructions() {
        let payer = Pubkey::new_unique();
        let tree_keypair = Keypair::new();
        let config = TreeConfig::default();
        let instructions = create_merkle_tree_instructions(&payer, &tree_keypair, &config, 42);

        assert_eq!(instructions.len(), 2);
        assert_eq!(
            instructions[0].program_id,
            solana_sdk::system_program::ID
        );
        // Account creation lists the new account second.
        assert_eq!(instructions[0].accounts[1].pubkey, tree_keypair.pubkey());
        assert!(instructions[0].accounts[1].is_signer);

        assert_eq!(instructions[1].program_id, mpl_bubblegum::ID);
        let tree_config = get_tree_authority_pda(&tree_keypair.pubkey()).0;
        assert_eq!(instructions[1].accounts[0].pubkey, tree_config);
        assert_eq!(instructions[1].accounts[1].pubkey, tree_keypair.pubkey());
    }
}
