use forge_client::rpc::{RpcConnection, SendOptions};
use mpl_token_metadata::{
    instructions::{CreateV1Builder, MintV1Builder, VerifyCollectionV1Builder},
    types::{Collection, CollectionDetails, PrintSupply, TokenStandard},
};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, signer::Signer};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use tracing::debug;

use crate::{
    errors::MintError,
    pda::{get_master_edition_pda, get_metadata_pda, get_token_record_pda},
    programs::SPL_TOKEN_ID,
};

/// 5.5%
pub const SELLER_FEE_BASIS_POINTS: u16 = 550;
pub const MINT_COMPUTE_UNIT_LIMIT: u32 = 400_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftArgs {
    pub name: String,
    pub uri: String,
    pub token_standard: TokenStandard,
    pub owner: Pubkey,
    /// Collection the token is created into and then verified against.
    pub collection: Option<Pubkey>,
    /// Marks the token as a sized collection.
    pub is_collection: bool,
}

/// Instructions to create, mint and optionally verify one token.
///
/// `authority` pays, holds mint and update authority and has to be the
/// collection update authority when `collection` is set.
pub fn create_nft_instructions(authority: &Pubkey, mint: &Pubkey, args: &NftArgs) -> Vec<Instruction> {
    let (metadata, _) = get_metadata_pda(mint);
    let (master_edition, _) = get_master_edition_pda(mint);
    let token = get_associated_token_address_with_program_id(&args.owner, mint, &SPL_TOKEN_ID);

    let mut create = CreateV1Builder::new();
    create
        .metadata(metadata)
        .master_edition(Some(master_edition))
        .mint(*mint, true)
        .authority(*authority)
        .payer(*authority)
        .update_authority(*authority, true)
        .spl_token_program(Some(SPL_TOKEN_ID))
        .name(args.name.clone())
        .uri(args.uri.clone())
        .seller_fee_basis_points(SELLER_FEE_BASIS_POINTS)
        .token_standard(args.token_standard.clone())
        .print_supply(PrintSupply::Zero);
    if let Some(collection) = args.collection {
        create.collection(Collection {
            verified: false,
            key: collection,
        });
    }
    if args.is_collection {
        create.collection_details(CollectionDetails::V1 { size: 0 });
    }

    let token_record = match args.token_standard {
        TokenStandard::ProgrammableNonFungible => Some(get_token_record_pda(mint, &token).0),
        _ => None,
    };
    let mint_ix = MintV1Builder::new()
        .token(token)
        .token_owner(Some(args.owner))
        .metadata(metadata)
        .master_edition(Some(master_edition))
        .token_record(token_record)
        .mint(*mint)
        .authority(*authority)
        .payer(*authority)
        .spl_token_program(SPL_TOKEN_ID)
        .amount(1)
        .instruction();

    let mut instructions = vec![create.instruction(), mint_ix];
    if let Some(collection) = args.collection {
        instructions.push(
            VerifyCollectionV1Builder::new()
                .authority(*authority)
                .metadata(metadata)
                .collection_mint(collection)
                .collection_metadata(Some(get_metadata_pda(&collection).0))
                .collection_master_edition(Some(get_master_edition_pda(&collection).0))
                .instruction(),
        );
    }
    instructions
}

pub async fn create_nft<R: RpcConnection>(
    rpc: &R,
    authority: &Keypair,
    args: &NftArgs,
    options: SendOptions,
) -> Result<Pubkey, MintError> {
    let mint = Keypair::new();
    let instructions = create_nft_instructions(&authority.pubkey(), &mint.pubkey(), args);
    let signature = rpc
        .create_and_send_transaction(
            &instructions,
            &authority.pubkey(),
            &[authority, &mint],
            options.with_compute_unit_limit(MINT_COMPUTE_UNIT_LIMIT),
        )
        .await?;
    debug!("Created `{}` ({}): {}", args.name, mint.pubkey(), signature);
    Ok(mint.pubkey())
}

/// Sized collection owned by `authority`.
pub async fn create_collection_nft<R: RpcConnection>(
    rpc: &R,
    authority: &Keypair,
    name: &str,
    uri: &str,
    options: SendOptions,
) -> Result<Pubkey, MintError> {
    create_nft(
        rpc,
        authority,
        &NftArgs {
            name: name.to_string(),
            uri: uri.to_string(),
            token_standard: TokenStandard::NonFungible,
            owner: authority.pubkey(),
            collection: None,
            is_collection: true,
        },
        options,
    )
    .await
}

/// Programmable token verified into `collection`.
pub async fn mint_programmable_nft<R: RpcConnection>(
    rpc: &R,
    authority: &Keypair,
    name: &str,
    uri: &str,
    owner: &Pubkey,
    collection: &Pubkey,
    options: SendOptions,
) -> Result<Pubkey, MintError> {
    create_nft(
        rpc,
        authority,
        &NftArgs {
            name: name.to_string(),
            uri: uri.to_string(),
            token_standard: TokenStandard::ProgrammableNonFungible,
            owner: *owner,
            collection: Some(*collection),
            is_collection: false,
        },
        options,
    )
    .await
}
