use forge_client::rpc::{RpcConnection, SendOptions};
use mpl_core::{
    instructions::{CreateCollectionV1Builder, CreateV1Builder},
    types::DataState,
};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, signer::Signer};
use tracing::debug;

use crate::errors::MintError;

pub fn create_core_collection_instruction(
    payer: &Pubkey,
    collection: &Pubkey,
    name: &str,
    uri: &str,
) -> Instruction {
    CreateCollectionV1Builder::new()
        .collection(*collection)
        .update_authority(Some(*payer))
        .payer(*payer)
        .name(name.to_string())
        .uri(uri.to_string())
        .instruction()
}

/// Asset created into `collection`. The collection update authority signs
/// as `payer`.
pub fn create_core_asset_instruction(
    payer: &Pubkey,
    asset: &Pubkey,
    collection: &Pubkey,
    owner: &Pubkey,
    name: &str,
    uri: &str,
) -> Instruction {
    CreateV1Builder::new()
        .asset(*asset)
        .collection(Some(*collection))
        .authority(Some(*payer))
        .payer(*payer)
        .owner(Some(*owner))
        .data_state(DataState::AccountState)
        .name(name.to_string())
        .uri(uri.to_string())
        .instruction()
}

pub async fn create_core_collection<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    name: &str,
    uri: &str,
    options: SendOptions,
) -> Result<Pubkey, MintError> {
    let collection = Keypair::new();
    let instruction =
        create_core_collection_instruction(&payer.pubkey(), &collection.pubkey(), name, uri);
    rpc.create_and_send_transaction(
        &[instruction],
        &payer.pubkey(),
        &[payer, &collection],
        options,
    )
    .await?;
    debug!("Created core collection {}", collection.pubkey());
    Ok(collection.pubkey())
}

pub async fn create_core_asset<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    collection: &Pubkey,
    owner: &Pubkey,
    name: &str,
    uri: &str,
    options: SendOptions,
) -> Result<Pubkey, MintError> {
    let asset = Keypair::new();
    let instruction = create_core_asset_instruction(
        &payer.pubkey(),
        &asset.pubkey(),
        collection,
        owner,
        name,
        uri,
    );
    rpc.create_and_send_transaction(&[instruction], &payer.pubkey(), &[payer, &asset], options)
        .await?;
    debug!("Created core asset `{}` ({})", name, asset.pubkey());
    Ok(asset.pubkey())
}
