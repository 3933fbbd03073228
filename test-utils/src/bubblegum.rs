use forge_client::rpc::{RpcConnection, SendOptions};
use mpl_bubblegum::{
    instructions::MintToCollectionV1Builder,
    types::{Collection, Creator, MetadataArgs, TokenProgramVersion, TokenStandard},
};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tracing::debug;

use crate::{
    errors::MintError,
    pda::{get_collection_cpi_pda, get_master_edition_pda, get_metadata_pda, get_tree_authority_pda},
    programs::{MPL_TOKEN_METADATA_ID, SPL_ACCOUNT_COMPRESSION_ID, SPL_NOOP_ID},
};

pub const CNFT_SELLER_FEE_BASIS_POINTS: u16 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedNftArgs {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub leaf_owner: Pubkey,
    pub collection_mint: Pubkey,
    pub merkle_tree: Pubkey,
}

/// Leaf metadata: payer as sole creator, unverified collection that
/// Bubblegum verifies during the mint.
pub fn compressed_nft_metadata(args: &CompressedNftArgs, creator: &Pubkey) -> MetadataArgs {
    MetadataArgs {
        name: args.name.clone(),
        symbol: args.symbol.clone(),
        uri: args.uri.clone(),
        seller_fee_basis_points: CNFT_SELLER_FEE_BASIS_POINTS,
        primary_sale_happened: true,
        is_mutable: true,
        edition_nonce: None,
        token_standard: Some(TokenStandard::NonFungible),
        collection: Some(Collection {
            key: args.collection_mint,
            verified: false,
        }),
        uses: None,
        token_program_version: TokenProgramVersion::Original,
        creators: vec![Creator {
            address: *creator,
            verified: false,
            share: 100,
        }],
    }
}

/// `payer` has to be both tree creator and collection update authority.
pub fn mint_compressed_nft_instruction(payer: &Pubkey, args: &CompressedNftArgs) -> Instruction {
    let (tree_config, _) = get_tree_authority_pda(&args.merkle_tree);
    let (collection_metadata, _) = get_metadata_pda(&args.collection_mint);
    let (collection_edition, _) = get_master_edition_pda(&args.collection_mint);
    let (bubblegum_signer, _) = get_collection_cpi_pda();

    MintToCollectionV1Builder::new()
        .tree_config(tree_config)
        .leaf_owner(args.leaf_owner)
        .leaf_delegate(args.leaf_owner)
        .merkle_tree(args.merkle_tree)
        .payer(*payer)
        .tree_creator_or_delegate(*payer)
        .collection_authority(*payer)
        .collection_authority_record_pda(None)
        .collection_mint(args.collection_mint)
        .collection_metadata(collection_metadata)
        .collection_edition(collection_edition)
        .bubblegum_signer(bubblegum_signer)
        .log_wrapper(SPL_NOOP_ID)
        .compression_program(SPL_ACCOUNT_COMPRESSION_ID)
        .token_metadata_program(MPL_TOKEN_METADATA_ID)
        .metadata(compressed_nft_metadata(args, payer))
        .instruction()
}

/// Appends one leaf to an existing tree. Every call appends a new leaf.
pub async fn mint_compressed_nft<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    args: &CompressedNftArgs,
    options: SendOptions,
) -> Result<Signature, MintError> {
    let instruction = mint_compressed_nft_instruction(&payer.pubkey(), args);
    let signature = rpc
        .create_and_send_transaction(&[instruction], &payer.pubkey(), &[payer], options)
        .await?;
    debug!(
        "Minted compressed nft `{}` into tree {}: {}",
        args.name, args.merkle_tree, signature
    );
    Ok(signature)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mint_compressed_nft_accounts() {
        let payer = Pubkey::new_unique();
        let args = CompressedNftArgs {
            name: "cNFT #0".to_string(),
            symbol: "cNFT".to_string(),
            uri: crate::ITEM_URI.to_string(),
            leaf_owner: Pubkey::new_unique(),
            collection_mint: Pubkey::new_unique(),
            merkle_tree: Pubkey::new_unique(),
        };
        let instruction = mint_compressed_nft_instruction(&payer, &args);
        let accounts: Vec<Pubkey> = instruction.accounts.iter().map(|a| a.pubkey).collect();

        assert_eq!(instruction.program_id, mpl_bubblegum::ID);
        assert_eq!(accounts[0], get_tree_authority_pda(&args.merkle_tree).0);
        assert_eq!(accounts[1], args.leaf_owner);
        assert_eq!(accounts[3], args.merkle_tree);
        assert_eq!(accounts[8], args.collection_mint);
        assert_eq!(accounts[9], get_metadata_pda(&args.collection_mint).0);
        assert_eq!(accounts[10], get_master_edition_pda(&args.collection_mint).0);
        assert_eq!(accounts[11], get_collection_cpi_pda().0);
    }

    #[test]
    fn test_metadata_uses_payer_as_sole_creator() {
        let creator = Pubkey::new_unique();
        let args = CompressedNftArgs {
            name: "cNFT #1".to_string(),
            symbol: "cNFT".to_string(),
            uri: crate::ITEM_URI.to_string(),
            leaf_owner: Pubkey::new_unique(),
            collection_mint: Pubkey::new_unique(),
            merkle_tree: Pubkey::new_unique(),
        };
        let metadata = compressed_nft_metadata(&args, &creator);
        assert_eq!(metadata.creators.len(), 1);
        assert_eq!(metadata.creators[0].address, creator);
        assert_eq!(metadata.creators[0].share, 100);
        assert_eq!(metadata.seller_fee_basis_points, 500);
        assert!(!metadata.collection.unwrap().verified);
    }
}
