use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use super::{
    normalize_assets,
    types::{AssetList, DasAsset, GetAssetBatchParams, RpcRequest, RpcResponse, SearchAssetsParams},
    Asset, AssetIndexer, IndexerError,
};

pub const DEFAULT_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    pub url: String,
    pub page_limit: u32,
}

impl IndexerConfig {
    pub fn new(url: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Digital Asset Standard API client.
#[derive(Debug, Clone)]
pub struct DasIndexer {
    client: reqwest::Client,
    config: IndexerConfig,
}

impl DasIndexer {
    pub fn new(config: IndexerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn call<P, R>(&self, method: &str, params: P) -> Result<R, IndexerError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let request = RpcRequest::new(method.to_string(), params);
        let body = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let response: RpcResponse<R> = serde_json::from_str(&body)?;
        if let Some(error) = response.error {
            return Err(IndexerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response.result.ok_or(IndexerError::EmptyResult)
    }

    async fn search_page(
        &self,
        owner: &Pubkey,
        collection: &Pubkey,
        page: u32,
    ) -> Result<AssetList, IndexerError> {
        self.call(
            "searchAssets",
            SearchAssetsParams {
                owner_address: owner.to_string(),
                grouping: ("collection".to_string(), collection.to_string()),
                page,
                limit: self.config.page_limit,
            },
        )
        .await
    }
}

#[async_trait]
impl AssetIndexer for DasIndexer {
    async fn get_asset_batch(&self, ids: &[Pubkey]) -> Result<Vec<Asset>, IndexerError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let assets: Vec<Option<DasAsset>> = self
            .call(
                "getAssetBatch",
                GetAssetBatchParams {
                    ids: ids.iter().map(|id| id.to_string()).collect(),
                },
            )
            .await?;
        Ok(normalize_assets(assets.into_iter().flatten()))
    }

    async fn search_assets(
        &self,
        owner: &Pubkey,
        collection: &Pubkey,
    ) -> Result<Vec<Asset>, IndexerError> {
        let mut raw_assets = Vec::new();
        let mut page = 1;
        loop {
            let list = match self.search_page(owner, collection, page).await {
                Ok(list) => list,
                Err(e) if page > 1 => {
                    warn!(
                        "searchAssets page {} failed, returning {} assets fetched so far: {}",
                        page,
                        raw_assets.len(),
                        e
                    );
                    break;
                }
                Err(e) => return Err(e),
            };
            debug!(
                "searchAssets page {}: {} items, total {}",
                page,
                list.items.len(),
                list.total
            );
            let done = list.items.is_empty() || list.total != self.config.page_limit;
            raw_assets.extend(list.items);
            if done {
                break;
            }
            page += 1;
        }
        Ok(normalize_assets(raw_assets))
    }
}
