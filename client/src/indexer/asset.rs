use solana_sdk::{pubkey, pubkey::Pubkey};

use super::{
    base58::{decode_base58_to_fixed_array, decode_pubkey},
    types::{DasAsset, DasCompression},
    IndexerError,
};

/// Rule set attached to programmable assets minted by the fixture engine.
pub const DEFAULT_RULE_SET: Pubkey = pubkey!("eBJLFYPxJmMGKuFwpDWkzxZeUrad92kZRC5BJLpzyT9");

const PROGRAMMABLE_TOKEN_STANDARD: &str = "ProgrammableNonFungible";
const PROGRAMMABLE_INTERFACE: &str = "ProgrammableNFT";
const V1_NFT_INTERFACE: &str = "V1_NFT";
const COLLECTION_GROUP_KEY: &str = "collection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetCollection {
    pub address: Pubkey,
    pub verified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetCreator {
    pub address: Pubkey,
    pub share: u8,
    pub verified: bool,
}

/// Location of a compressed leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compression {
    pub leaf_id: u64,
    pub data_hash: [u8; 32],
    pub creator_hash: [u8; 32],
    pub asset_hash: [u8; 32],
    pub tree: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Plain,
    Programmable { rule_set: Pubkey },
    Compressed(Compression),
    /// Inferred from the indexer's interface tag, not from the mint's
    /// extension list. Best effort.
    TokenExtensions,
}

/// Normalized view over the four asset standards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub mint: Pubkey,
    pub owner: Option<Pubkey>,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub creators: Vec<AssetCreator>,
    pub collection: Option<AssetCollection>,
    pub seller_fee_basis_points: u16,
    /// Set when the asset is frozen, delegated or has a delegate.
    pub frozen: bool,
    pub kind: AssetKind,
}

impl Asset {
    pub fn is_compressed(&self) -> bool {
        matches!(self.kind, AssetKind::Compressed(_))
    }

    pub fn is_programmable_nft(&self) -> bool {
        matches!(self.kind, AssetKind::Programmable { .. })
    }

    pub fn is_token_extensions(&self) -> bool {
        matches!(self.kind, AssetKind::TokenExtensions)
    }

    pub fn compression(&self) -> Option<&Compression> {
        match &self.kind {
            AssetKind::Compressed(compression) => Some(compression),
            _ => None,
        }
    }

    pub fn collection_address(&self) -> Option<Pubkey> {
        self.collection.map(|collection| collection.address)
    }
}

impl TryFrom<&DasCompression> for Compression {
    type Error = IndexerError;

    fn try_from(compression: &DasCompression) -> Result<Self, Self::Error> {
        Ok(Compression {
            leaf_id: compression.leaf_id,
            data_hash: decode_base58_to_fixed_array("data_hash", &compression.data_hash)?,
            creator_hash: decode_base58_to_fixed_array(
                "creator_hash",
                &compression.creator_hash,
            )?,
            asset_hash: decode_base58_to_fixed_array("asset_hash", &compression.asset_hash)?,
            tree: decode_pubkey("tree", &compression.tree)?,
        })
    }
}

impl TryFrom<DasAsset> for Asset {
    type Error = IndexerError;

    fn try_from(asset: DasAsset) -> Result<Self, Self::Error> {
        let mint = decode_pubkey("id", &asset.id)?;
        let owner = if asset.ownership.owner.is_empty() {
            None
        } else {
            Some(decode_pubkey("ownership.owner", &asset.ownership.owner)?)
        };

        let collection = asset
            .grouping
            .iter()
            .find(|group| group.group_key == COLLECTION_GROUP_KEY)
            .map(|group| {
                Ok::<_, IndexerError>(AssetCollection {
                    address: decode_pubkey("grouping.group_value", &group.group_value)?,
                    verified: group.verified.unwrap_or(true),
                })
            })
            .transpose()?;

        let creators = asset
            .creators
            .iter()
            .map(|creator| {
                Ok(AssetCreator {
                    address: decode_pubkey("creators.address", &creator.address)?,
                    share: creator.share,
                    verified: creator.verified,
                })
            })
            .collect::<Result<Vec<_>, IndexerError>>()?;

        let kind = classify(&asset)?;
        let frozen = asset.ownership.frozen
            || asset.ownership.delegated
            || asset.ownership.delegate.is_some();

        Ok(Asset {
            mint,
            owner,
            name: asset.content.metadata.name,
            symbol: asset.content.metadata.symbol,
            uri: asset.content.json_uri,
            creators,
            collection,
            seller_fee_basis_points: asset
                .royalty
                .map(|royalty| royalty.basis_points)
                .unwrap_or_default(),
            frozen,
            kind,
        })
    }
}

/// Compressed wins over programmable, programmable over token extensions.
fn classify(asset: &DasAsset) -> Result<AssetKind, IndexerError> {
    if let Some(compression) = asset.compression.as_ref().filter(|c| c.compressed) {
        return Ok(AssetKind::Compressed(compression.try_into()?));
    }
    let token_standard = asset.content.metadata.token_standard.as_deref();
    if token_standard == Some(PROGRAMMABLE_TOKEN_STANDARD)
        || asset.interface == PROGRAMMABLE_INTERFACE
    {
        return Ok(AssetKind::Programmable {
            rule_set: DEFAULT_RULE_SET,
        });
    }
    if asset.interface == V1_NFT_INTERFACE && token_standard.is_none() {
        return Ok(AssetKind::TokenExtensions);
    }
    Ok(AssetKind::Plain)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hash(byte: u8) -> String {
        bs58::encode([byte; 32]).into_string()
    }

    fn das_asset(value: serde_json::Value) -> DasAsset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_compressed_asset() {
        let mint = Pubkey::new_unique();
        let tree = Pubkey::new_unique();
        let collection = Pubkey::new_unique();
        let asset = Asset::try_from(das_asset(json!({
            "id": mint.to_string(),
            "interface": "V1_NFT",
            "content": {
                "json_uri": "https://arweave.net/x",
                "metadata": { "name": "cNFT #0", "symbol": "cNFT", "token_standard": "NonFungible" }
            },
            "compression": {
                "compressed": true,
                "data_hash": hash(1),
                "creator_hash": hash(2),
                "asset_hash": hash(3),
                "tree": tree.to_string(),
                "leaf_id": 4
            },
            "grouping": [{ "group_key": "collection", "group_value": collection.to_string() }],
            "ownership": { "owner": Pubkey::new_unique().to_string() }
        })))
        .unwrap();

        assert!(asset.is_compressed());
        let compression = asset.compression().unwrap();
        assert_eq!(compression.tree, tree);
        assert_eq!(compression.leaf_id, 4);
        assert_eq!(compression.data_hash, [1u8; 32]);
        assert_eq!(
            asset.collection,
            Some(AssetCollection {
                address: collection,
                verified: true
            })
        );
        assert!(!asset.frozen);
        assert_eq!(asset.name, "cNFT #0");
    }

    #[test]
    fn test_uncompressed_block_is_ignored() {
        let asset = Asset::try_from(das_asset(json!({
            "id": Pubkey::new_unique().to_string(),
            "interface": "V1_NFT",
            "content": { "metadata": { "token_standard": "NonFungible" } },
            "compression": { "compressed": false }
        })))
        .unwrap();
        assert_eq!(asset.kind, AssetKind::Plain);
        assert!(asset.compression().is_none());
    }

    #[test]
    fn test_programmable_by_token_standard_or_interface() {
        let by_standard = Asset::try_from(das_asset(json!({
            "id": Pubkey::new_unique().to_string(),
            "interface": "V1_NFT",
            "content": { "metadata": { "token_standard": "ProgrammableNonFungible" } }
        })))
        .unwrap();
        let by_interface = Asset::try_from(das_asset(json!({
            "id": Pubkey::new_unique().to_string(),
            "interface": "ProgrammableNFT"
        })))
        .unwrap();
        for asset in [by_standard, by_interface] {
            assert_eq!(
                asset.kind,
                AssetKind::Programmable {
                    rule_set: DEFAULT_RULE_SET
                }
            );
        }
    }

    #[test]
    fn test_token_extensions_heuristic() {
        let asset = Asset::try_from(das_asset(json!({
            "id": Pubkey::new_unique().to_string(),
            "interface": "V1_NFT",
            "content": { "metadata": { "name": "Extensions #0" } }
        })))
        .unwrap();
        assert!(asset.is_token_extensions());
        assert!(!asset.is_programmable_nft());
    }

    #[test]
    fn test_frozen_is_union_of_ownership_flags() {
        let cases = [
            (json!({ "frozen": true }), true),
            (json!({ "delegated": true }), true),
            (json!({ "delegate": Pubkey::new_unique().to_string() }), true),
            (json!({}), false),
        ];
        for (ownership, expected) in cases {
            let asset = Asset::try_from(das_asset(json!({
                "id": Pubkey::new_unique().to_string(),
                "ownership": ownership
            })))
            .unwrap();
            assert_eq!(asset.frozen, expected);
        }
    }

    #[test]
    fn test_invalid_tree_is_rejected() {
        let result = Asset::try_from(das_asset(json!({
            "id": Pubkey::new_unique().to_string(),
            "compression": {
                "compressed": true,
                "data_hash": hash(1),
                "creator_hash": hash(2),
                "asset_hash": hash(3),
                "tree": "???"
            }
        })));
        assert!(matches!(
            result,
            Err(IndexerError::InvalidPubkey { field: "tree", .. })
        ));
    }
}
