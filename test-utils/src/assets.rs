use forge_client::{
    indexer::{fetch_assets, Asset, AssetIndexer, AssetQuery},
    rpc::{RpcConnection, SendOptions},
};
use forge_concurrent_merkle_tree::TreeConfig;
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use tracing::{error, info};

use crate::{
    bubblegum::{mint_compressed_nft, CompressedNftArgs},
    errors::MintError,
    merkle_tree::provision_merkle_tree,
    mpl_core::{create_core_asset, create_core_collection},
    token_2022::{self, TokenMetadataArgs, DEFAULT_GROUP_MAX_SIZE},
    token_metadata::{create_collection_nft, mint_programmable_nft},
    COLLECTION_NAME, COLLECTION_URI, ITEM_URI,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetStandard {
    #[serde(rename = "MPL_CORE")]
    MplCore,
    #[serde(rename = "MPL_TM")]
    MplTokenMetadata,
    #[serde(rename = "MPL_BG")]
    Bubblegum,
    #[serde(rename = "TOKEN_2022")]
    TokenExtensions,
}

/// A collection, tree or group together with the items minted into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionWithItems<M = Pubkey> {
    pub group: Pubkey,
    pub mints: Vec<M>,
    pub asset: AssetStandard,
}

impl<M> CollectionWithItems<M> {
    /// The group has to exist before anything is minted into it.
    pub fn new(group: Pubkey, asset: AssetStandard) -> Self {
        Self {
            group,
            mints: Vec::new(),
            asset,
        }
    }

    pub fn push(&mut self, mint: M) {
        self.mints.push(mint);
    }

    pub fn len(&self) -> usize {
        self.mints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mints.is_empty()
    }
}

/// Number of items to mint per standard. Zero skips the standard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCounts {
    pub core: usize,
    pub pnfts: usize,
    pub cnfts: usize,
    pub token22: usize,
}

/// Existing accounts to mint into instead of creating new ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MintTargets {
    /// Token Metadata collection for programmable and compressed items.
    pub collection: Option<Pubkey>,
    pub core_collection: Option<Pubkey>,
    /// Merkle tree created by the payer.
    pub tree: Option<Pubkey>,
}

/// Only the standards that were requested and succeeded are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetResponse {
    pub core: Option<CollectionWithItems>,
    pub pnfts: Option<CollectionWithItems>,
    pub cnfts: Option<CollectionWithItems<Asset>>,
    pub token22: Option<CollectionWithItems>,
}

pub async fn mint_mpl_core_collection<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    count: usize,
    beneficiary: &Pubkey,
    collection: Option<Pubkey>,
    options: SendOptions,
) -> Result<Option<CollectionWithItems>, MintError> {
    if count == 0 {
        return Ok(None);
    }
    let group = match collection {
        Some(collection) => collection,
        None => create_core_collection(rpc, payer, COLLECTION_NAME, COLLECTION_URI, options).await?,
    };
    let mut collection = CollectionWithItems::new(group, AssetStandard::MplCore);
    for i in 0..count {
        let name = format!("Test Nft Mpl Core {}", i);
        let asset =
            create_core_asset(rpc, payer, &group, beneficiary, &name, ITEM_URI, options).await?;
        collection.push(asset);
    }
    Ok(Some(collection))
}

pub async fn mint_mpl_tm_collection<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    count: usize,
    beneficiary: &Pubkey,
    collection: Option<Pubkey>,
    options: SendOptions,
) -> Result<Option<CollectionWithItems>, MintError> {
    if count == 0 {
        return Ok(None);
    }
    let group = match collection {
        Some(collection) => collection,
        None => create_collection_nft(rpc, payer, COLLECTION_NAME, COLLECTION_URI, options).await?,
    };
    let mut collection = CollectionWithItems::new(group, AssetStandard::MplTokenMetadata);
    for i in 0..count {
        let name = format!("Test Nft Mpl TM {}", i);
        let mint =
            mint_programmable_nft(rpc, payer, &name, ITEM_URI, beneficiary, &group, options)
                .await?;
        collection.push(mint);
    }
    Ok(Some(collection))
}

/// Mints `count` members into `group`, creating a group owned by `payer`
/// when none is given.
pub async fn mint_token_2022_collection<R: RpcConnection>(
    rpc: &R,
    payer: &Keypair,
    count: usize,
    beneficiary: &Pubkey,
    group: Option<(Pubkey, &Keypair)>,
    options: SendOptions,
) -> Result<Option<CollectionWithItems>, MintError> {
    if count == 0 {
        return Ok(None);
    }
    let (group, update_authority) = match group {
        Some(group) => group,
        None => {
            let metadata = TokenMetadataArgs {
                name: "Extensions Group".to_string(),
                symbol: "Extensions".to_string(),
                uri: COLLECTION_URI.to_string(),
            };
            let group = token_2022::create_group(
                rpc,
                payer,
                payer,
                &payer.pubkey(),
                &metadata,
                DEFAULT_GROUP_MAX_SIZE,
                None,
                options,
            )
            .await?;
            (group, payer)
        }
    };
    let mut collection = CollectionWithItems::new(group, AssetStandard::TokenExtensions);
    for i in 0..count {
        let metadata = TokenMetadataArgs {
            name: format!("Extensions #{}", i),
            symbol: "Extensions".to_string(),
            uri: ITEM_URI.to_string(),
        };
        let mint = token_2022::mint_member(
            rpc,
            payer,
            payer,
            beneficiary,
            &metadata,
            Some((&group, update_authority)),
            None,
            options,
        )
        .await?;
        collection.push(mint);
    }
    Ok(Some(collection))
}

/// Appends `count` leaves verified into `collection_mint`, then resolves them
/// through the indexer.
///
/// Provisions a default sized tree unless `tree` is given. Only assets
/// living in that tree are returned.
#[allow(clippy::too_many_arguments)]
pub async fn mint_bubblegum_collection<R: RpcConnection, I: AssetIndexer>(
    rpc: &R,
    indexer: &I,
    payer: &Keypair,
    count: usize,
    collection_mint: &Pubkey,
    beneficiary: &Pubkey,
    tree: Option<Pubkey>,
    options: SendOptions,
) -> Result<Option<CollectionWithItems<Asset>>, MintError> {
    if count == 0 {
        return Ok(None);
    }
    let tree = match tree {
        Some(tree) => tree,
        None => {
            provision_merkle_tree(rpc, payer, &TreeConfig::default(), options)
                .await?
                .address
        }
    };
    let leaf_options = SendOptions {
        skip_preflight: true,
        ..options
    };
    for i in 0..count {
        let args = CompressedNftArgs {
            name: format!("cNFT #{}", i),
            symbol: "cNFT".to_string(),
            uri: ITEM_URI.to_string(),
            leaf_owner: *beneficiary,
            collection_mint: *collection_mint,
            merkle_tree: tree,
        };
        mint_compressed_nft(rpc, payer, &args, leaf_options).await?;
    }

    let mut collection = CollectionWithItems::new(tree, AssetStandard::Bubblegum);
    let assets = fetch_assets(
        indexer,
        AssetQuery::ByOwnerAndCollection {
            owner: *beneficiary,
            collection: *collection_mint,
        },
    )
    .await;
    for asset in assets {
        if asset.compression().map(|c| c.tree) == Some(tree) {
            collection.push(asset);
        }
    }
    Ok(Some(collection))
}

fn resist_error<T>(standard: AssetStandard, result: Result<Option<T>, MintError>) -> Option<T> {
    match result {
        Ok(collection) => collection,
        Err(e) => {
            error!("Minting {:?} fixtures failed: {}", standard, e);
            None
        }
    }
}

/// Mints the requested fixtures for `beneficiary`.
///
/// Core, programmable and token extension branches run concurrently. The
/// compressed branch runs afterwards since it mints into the programmable
/// collection, or `targets.collection`. A failed branch is logged and left
/// out of the response.
pub async fn mint_assets<R: RpcConnection, I: AssetIndexer>(
    rpc: &R,
    indexer: &I,
    payer: &Keypair,
    beneficiary: &Pubkey,
    counts: &AssetCounts,
    targets: &MintTargets,
    options: SendOptions,
) -> AssetResponse {
    let (core, pnfts, token22) = futures::join!(
        mint_mpl_core_collection(
            rpc,
            payer,
            counts.core,
            beneficiary,
            targets.core_collection,
            options
        ),
        mint_mpl_tm_collection(
            rpc,
            payer,
            counts.pnfts,
            beneficiary,
            targets.collection,
            options
        ),
        mint_token_2022_collection(rpc, payer, counts.token22, beneficiary, None, options),
    );
    let mut response = AssetResponse {
        core: resist_error(AssetStandard::MplCore, core),
        pnfts: resist_error(AssetStandard::MplTokenMetadata, pnfts),
        cnfts: None,
        token22: resist_error(AssetStandard::TokenExtensions, token22),
    };

    if counts.cnfts > 0 {
        let collection = response
            .pnfts
            .as_ref()
            .map(|pnfts| pnfts.group)
            .or(targets.collection);
        let cnfts = match collection {
            Some(collection) => {
                mint_bubblegum_collection(
                    rpc,
                    indexer,
                    payer,
                    counts.cnfts,
                    &collection,
                    beneficiary,
                    targets.tree,
                    options,
                )
                .await
            }
            None => Err(MintError::MissingCollection),
        };
        response.cnfts = resist_error(AssetStandard::Bubblegum, cnfts);
    }

    info!(
        "Minted fixtures for {}: core {:?}, pnfts {:?}, cnfts {:?}, token22 {:?}",
        beneficiary,
        response.core.as_ref().map(CollectionWithItems::len),
        response.pnfts.as_ref().map(CollectionWithItems::len),
        response.cnfts.as_ref().map(CollectionWithItems::len),
        response.token22.as_ref().map(CollectionWithItems::len),
    );
    response
}
