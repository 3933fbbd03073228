use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;
use tracing::{error, warn};

mod asset;
pub mod base58;
mod das_indexer;
pub mod types;

pub use asset::{
    Asset, AssetCollection, AssetCreator, AssetKind, Compression, DEFAULT_RULE_SET,
};
pub use das_indexer::{DasIndexer, IndexerConfig, DEFAULT_PAGE_LIMIT};

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Indexer returned an empty result")]
    EmptyResult,

    #[error("Invalid pubkey in `{field}`: {value}")]
    InvalidPubkey { field: &'static str, value: String },
}

impl IndexerError {
    pub fn invalid_pubkey(field: &'static str, value: &str) -> Self {
        IndexerError::InvalidPubkey {
            field,
            value: value.to_string(),
        }
    }
}

#[async_trait]
pub trait AssetIndexer: Send + Sync {
    /// Resolves ids in one request. Ids unknown to the indexer are dropped.
    async fn get_asset_batch(&self, ids: &[Pubkey]) -> Result<Vec<Asset>, IndexerError>;

    /// Pages through every asset `owner` holds in `collection`.
    async fn search_assets(
        &self,
        owner: &Pubkey,
        collection: &Pubkey,
    ) -> Result<Vec<Asset>, IndexerError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetQuery {
    ByOwnerAndCollection { owner: Pubkey, collection: Pubkey },
    ByIds(Vec<Pubkey>),
}

/// Resolves `query` into normalized assets.
///
/// Indexer failures are logged and yield an empty list.
pub async fn fetch_assets<I: AssetIndexer + ?Sized>(indexer: &I, query: AssetQuery) -> Vec<Asset> {
    let result = match &query {
        AssetQuery::ByIds(ids) => indexer.get_asset_batch(ids).await,
        AssetQuery::ByOwnerAndCollection { owner, collection } => {
            indexer.search_assets(owner, collection).await
        }
    };
    match result {
        Ok(assets) => assets,
        Err(e) => {
            error!("Failed to fetch assets for {:?}: {}", query, e);
            Vec::new()
        }
    }
}

/// Normalizes raw indexer records, skipping the ones that cannot be parsed.
pub fn normalize_assets(assets: impl IntoIterator<Item = types::DasAsset>) -> Vec<Asset> {
    assets
        .into_iter()
        .filter_map(|raw| {
            let id = raw.id.clone();
            match Asset::try_from(raw) {
                Ok(asset) => Some(asset),
                Err(e) => {
                    warn!("Skipping malformed asset {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}
