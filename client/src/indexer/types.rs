use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RpcRequest<T> {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    #[serde(rename = "params")]
    pub parameters: T,
}

impl<T> RpcRequest<T> {
    pub fn new(method: String, parameters: T) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: "1".to_string(),
            method,
            parameters,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResponse<T> {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: serde_json::Value,
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchAssetsParams {
    pub owner_address: String,
    /// Serialized as `["collection", <address>]`.
    pub grouping: (String, String),
    pub page: u32,
    pub limit: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GetAssetBatchParams {
    pub ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AssetList {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub items: Vec<DasAsset>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DasAsset {
    #[serde(default)]
    pub interface: String,
    pub id: String,
    #[serde(default)]
    pub content: DasContent,
    #[serde(default)]
    pub compression: Option<DasCompression>,
    #[serde(default)]
    pub grouping: Vec<DasGrouping>,
    #[serde(default)]
    pub royalty: Option<DasRoyalty>,
    #[serde(default)]
    pub creators: Vec<DasCreator>,
    #[serde(default)]
    pub ownership: DasOwnership,
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub burnt: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DasContent {
    #[serde(default)]
    pub json_uri: String,
    #[serde(default)]
    pub metadata: DasMetadata,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DasMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub token_standard: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DasCompression {
    #[serde(default)]
    pub eligible: bool,
    #[serde(default)]
    pub compressed: bool,
    #[serde(default)]
    pub data_hash: String,
    #[serde(default)]
    pub creator_hash: String,
    #[serde(default)]
    pub asset_hash: String,
    #[serde(default)]
    pub tree: String,
    #[serde(default)]
    pub seq: u64,
    #[serde(default)]
    pub leaf_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DasGrouping {
    pub group_key: String,
    pub group_value: String,
    #[serde(default)]
    pub verified: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DasRoyalty {
    #[serde(default)]
    pub basis_points: u16,
    #[serde(default)]
    pub primary_sale_happened: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DasCreator {
    pub address: String,
    #[serde(default)]
    pub share: u8,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DasOwnership {
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub delegated: bool,
    #[serde(default)]
    pub delegate: Option<String>,
    #[serde(default)]
    pub owner: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_serialization() {
        let request = RpcRequest::new(
            "searchAssets".to_string(),
            SearchAssetsParams {
                owner_address: "owner".to_string(),
                grouping: ("collection".to_string(), "col".to_string()),
                page: 2,
                limit: 1000,
            },
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "searchAssets");
        assert_eq!(value["params"]["ownerAddress"], "owner");
        assert_eq!(
            value["params"]["grouping"],
            serde_json::json!(["collection", "col"])
        );
        assert_eq!(value["params"]["page"], 2);
        assert_eq!(value["params"]["limit"], 1000);
    }

    #[test]
    fn test_sparse_asset_deserializes() {
        let asset: DasAsset = serde_json::from_value(serde_json::json!({
            "id": "asset",
            "interface": "V1_NFT"
        }))
        .unwrap();
        assert!(asset.compression.is_none());
        assert!(asset.grouping.is_empty());
        assert!(asset.content.metadata.token_standard.is_none());
    }
}
