use forge_client::rpc::{RpcConnection, RpcError, SendOptions};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_instruction,
};

pub mod assets;
pub mod bubblegum;
pub mod errors;
pub mod merkle_tree;
pub mod mpl_core;
pub mod pda;
pub mod programs;
pub mod telemetry;
pub mod token_2022;
pub mod token_metadata;
pub mod traits;

pub use assets::{
    mint_assets, AssetCounts, AssetResponse, AssetStandard, CollectionWithItems, MintTargets,
};
pub use errors::MintError;

/// Name and uri shared by every collection the fixture engine creates.
pub const COLLECTION_NAME: &str = "My Collection";
pub const COLLECTION_URI: &str = "https://example.com/my-collection.json";
/// Off-chain json used for every fixture item.
pub const ITEM_URI: &str = "https://arweave.net/WhyRt90kgI7f0EG9GPfB8TIBTIBgX3X12QaF9ObFerE";

/// Moves lamports from `payer` to `destination` and waits for confirmation.
pub async fn airdrop_lamports<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    destination: &Pubkey,
    lamports: u64,
) -> Result<Signature, RpcError> {
    let transfer_instruction =
        system_instruction::transfer(&payer.pubkey(), destination, lamports);
    rpc.create_and_send_transaction(
        &[transfer_instruction],
        &payer.pubkey(),
        &[payer],
        SendOptions::default(),
    )
    .await
}

pub fn create_account_instruction(
    payer: &Pubkey,
    size: usize,
    rent: u64,
    id: &Pubkey,
    keypair: &Keypair,
) -> Instruction {
    system_instruction::create_account(payer, &keypair.pubkey(), rent, size as u64, id)
}
