#![allow(dead_code)]

use std::{
    collections::HashSet,
    fmt::{Debug, Formatter},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use forge_client::{
    indexer::{Asset, AssetCollection, AssetIndexer, AssetKind, Compression, IndexerError},
    rpc::{RpcConnection, RpcError},
};
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::{hash, Hash},
    instruction::InstructionError,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use solana_transaction_status::{TransactionConfirmationStatus, TransactionStatus};

pub const LAST_VALID_BLOCK_HEIGHT: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<Pubkey>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RecordedTransaction {
    pub signature: Signature,
    pub instructions: Vec<RecordedInstruction>,
    pub failed: bool,
}

impl RecordedTransaction {
    fn new(transaction: &Transaction, failed: bool) -> Self {
        let keys = &transaction.message.account_keys;
        let instructions = transaction
            .message
            .instructions
            .iter()
            .map(|ix| RecordedInstruction {
                program_id: keys[ix.program_id_index as usize],
                accounts: ix.accounts.iter().map(|i| keys[*i as usize]).collect(),
                data: ix.data.clone(),
            })
            .collect();
        Self {
            signature: transaction.signatures[0],
            instructions,
            failed,
        }
    }

    pub fn invokes(&self, program_id: &Pubkey) -> bool {
        self.instructions
            .iter()
            .any(|ix| ix.program_id == *program_id)
    }
}

#[derive(Default)]
struct LedgerState {
    transactions: Vec<RecordedTransaction>,
    airdrops: Vec<Signature>,
    send_configs: Vec<RpcSendTransactionConfig>,
    failing_programs: HashSet<Pubkey>,
    dropping: bool,
    landing_at_expiry: bool,
    block_height: u64,
}

/// In memory ledger. Every transaction confirms immediately unless it
/// invokes a program registered with [`MockRpc::fail_program`].
#[derive(Clone, Default)]
pub struct MockRpc {
    state: Arc<Mutex<LedgerState>>,
}

impl Debug for MockRpc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockRpc")
    }
}

impl MockRpc {
    pub fn fail_program(&self, program_id: Pubkey) {
        self.state.lock().unwrap().failing_programs.insert(program_id);
    }

    /// Sent transactions never land and every blockhash is already expired.
    pub fn drop_transactions(&self) {
        let mut state = self.state.lock().unwrap();
        state.dropping = true;
        state.block_height = LAST_VALID_BLOCK_HEIGHT + 1;
    }

    /// Transactions only become visible in the poll after the block height
    /// moved past [`LAST_VALID_BLOCK_HEIGHT`], i.e. they landed in the last
    /// valid block.
    pub fn land_in_last_valid_block(&self) {
        self.state.lock().unwrap().landing_at_expiry = true;
    }

    pub fn send_configs(&self) -> Vec<RpcSendTransactionConfig> {
        self.state.lock().unwrap().send_configs.clone()
    }

    pub fn transactions(&self) -> Vec<RecordedTransaction> {
        self.state.lock().unwrap().transactions.clone()
    }

    pub fn successful_transactions(&self) -> Vec<RecordedTransaction> {
        self.transactions()
            .into_iter()
            .filter(|tx| !tx.failed)
            .collect()
    }

    pub fn indexer(&self) -> MockIndexer {
        MockIndexer { rpc: self.clone() }
    }
}

#[async_trait]
impl RpcConnection for MockRpc {
    fn new<U: ToString>(_url: U, _commitment_config: Option<CommitmentConfig>) -> Self
    where
        Self: Sized,
    {
        Self::default()
    }

    fn get_url(&self) -> String {
        "mock".to_string()
    }

    fn commitment(&self) -> CommitmentConfig {
        CommitmentConfig::confirmed()
    }

    async fn health(&self) -> Result<(), RpcError> {
        Ok(())
    }

    async fn get_account(&self, _address: &Pubkey) -> Result<Option<Account>, RpcError> {
        Ok(None)
    }

    async fn get_balance(&self, _pubkey: &Pubkey) -> Result<u64, RpcError> {
        Ok(0)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        Ok((data_len as u64 + 128) * 6_960)
    }

    async fn get_latest_blockhash(&self) -> Result<(Hash, u64), RpcError> {
        Ok((Hash::new_unique(), LAST_VALID_BLOCK_HEIGHT))
    }

    async fn get_block_height(&self) -> Result<u64, RpcError> {
        let mut state = self.state.lock().unwrap();
        if state.landing_at_expiry {
            state.block_height = LAST_VALID_BLOCK_HEIGHT + 1;
        }
        Ok(state.block_height)
    }

    async fn send_transaction_with_config(
        &self,
        transaction: &Transaction,
        config: RpcSendTransactionConfig,
    ) -> Result<Signature, RpcError> {
        transaction.verify()?;
        let mut state = self.state.lock().unwrap();
        state.send_configs.push(config);
        if state.dropping {
            return Ok(transaction.signatures[0]);
        }
        let failed = transaction
            .message
            .account_keys
            .iter()
            .any(|key| state.failing_programs.contains(key));
        let recorded = RecordedTransaction::new(transaction, failed);
        let signature = recorded.signature;
        state.transactions.push(recorded);
        Ok(signature)
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<TransactionStatus>>, RpcError> {
        let state = self.state.lock().unwrap();
        let pending = state.landing_at_expiry && state.block_height <= LAST_VALID_BLOCK_HEIGHT;
        Ok(signatures
            .iter()
            .map(|signature| {
                if state.airdrops.contains(signature) {
                    return Some(TransactionStatus {
                        slot: 1,
                        confirmations: None,
                        status: Ok(()),
                        err: None,
                        confirmation_status: Some(TransactionConfirmationStatus::Finalized),
                    });
                }
                if pending {
                    return None;
                }
                let recorded = state
                    .transactions
                    .iter()
                    .find(|tx| tx.signature == *signature)?;
                let err = recorded
                    .failed
                    .then(|| TransactionError::InstructionError(0, InstructionError::Custom(1)));
                Some(TransactionStatus {
                    slot: 1,
                    confirmations: None,
                    status: err.clone().map_or(Ok(()), Err),
                    err,
                    confirmation_status: Some(TransactionConfirmationStatus::Finalized),
                })
            })
            .collect())
    }

    async fn request_airdrop(
        &self,
        _to: &Pubkey,
        _lamports: u64,
        _blockhash: &Hash,
    ) -> Result<Signature, RpcError> {
        let signature = Signature::new_unique();
        self.state.lock().unwrap().airdrops.push(signature);
        Ok(signature)
    }
}

fn mint_to_collection_discriminator() -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(b"global:mint_to_collection_v1").to_bytes()[..8]);
    discriminator
}

/// Indexes the compressed leaves recorded by a [`MockRpc`].
#[derive(Clone, Debug)]
pub struct MockIndexer {
    rpc: MockRpc,
}

impl MockIndexer {
    fn compressed_assets(&self) -> Vec<Asset> {
        let discriminator = mint_to_collection_discriminator();
        self.rpc
            .successful_transactions()
            .iter()
            .flat_map(|tx| {
                tx.instructions
                    .iter()
                    .filter(|ix| {
                        ix.program_id == mpl_bubblegum::ID && ix.data.starts_with(&discriminator)
                    })
                    .map(|ix| (tx.signature, ix.clone()))
                    .collect::<Vec<_>>()
            })
            .enumerate()
            .map(|(leaf_id, (signature, ix))| Asset {
                // Asset ids are derived from the leaf so repeated lookups agree.
                mint: Pubkey::new_from_array(
                    hash(&[signature.as_ref(), leaf_id.to_le_bytes().as_slice()].concat()).to_bytes(),
                ),
                owner: Some(ix.accounts[1]),
                name: format!("cNFT #{}", leaf_id),
                symbol: "cNFT".to_string(),
                uri: String::new(),
                creators: Vec::new(),
                collection: Some(AssetCollection {
                    address: ix.accounts[8],
                    verified: true,
                }),
                seller_fee_basis_points: 500,
                frozen: false,
                kind: AssetKind::Compressed(Compression {
                    leaf_id: leaf_id as u64,
                    data_hash: [0u8; 32],
                    creator_hash: [0u8; 32],
                    asset_hash: [0u8; 32],
                    tree: ix.accounts[3],
                }),
            })
            .collect()
    }
}

#[async_trait]
impl AssetIndexer for MockIndexer {
    async fn get_asset_batch(&self, ids: &[Pubkey]) -> Result<Vec<Asset>, IndexerError> {
        Ok(self
            .compressed_assets()
            .into_iter()
            .filter(|asset| ids.contains(&asset.mint))
            .collect())
    }

    async fn search_assets(
        &self,
        owner: &Pubkey,
        collection: &Pubkey,
    ) -> Result<Vec<Asset>, IndexerError> {
        Ok(self
            .compressed_assets()
            .into_iter()
            .filter(|asset| {
                asset.owner == Some(*owner) && asset.collection_address() == Some(*collection)
            })
            .collect())
    }
}
