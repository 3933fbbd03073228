//! Program derived addresses used by the fixture issuers.

use solana_sdk::pubkey::Pubkey;

use crate::programs::{MPL_BUBBLEGUM_ID, MPL_TOKEN_METADATA_ID};

pub const METADATA_SEED: &[u8] = b"metadata";
pub const EDITION_SEED: &[u8] = b"edition";
pub const TOKEN_RECORD_SEED: &[u8] = b"token_record";
pub const COLLECTION_CPI_SEED: &[u8] = b"collection_cpi";

/// Tree config account of a Bubblegum tree, which also acts as the tree
/// authority.
pub fn get_tree_authority_pda(merkle_tree: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[merkle_tree.as_ref()], &MPL_BUBBLEGUM_ID)
}

/// Signer Bubblegum uses when verifying a leaf against a collection.
pub fn get_collection_cpi_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COLLECTION_CPI_SEED], &MPL_BUBBLEGUM_ID)
}

pub fn get_metadata_pda(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[METADATA_SEED, MPL_TOKEN_METADATA_ID.as_ref(), mint.as_ref()],
        &MPL_TOKEN_METADATA_ID,
    )
}

pub fn get_master_edition_pda(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            MPL_TOKEN_METADATA_ID.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        &MPL_TOKEN_METADATA_ID,
    )
}

pub fn get_token_record_pda(mint: &Pubkey, token: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            MPL_TOKEN_METADATA_ID.as_ref(),
            mint.as_ref(),
            TOKEN_RECORD_SEED,
            token.as_ref(),
        ],
        &MPL_TOKEN_METADATA_ID,
    )
}
