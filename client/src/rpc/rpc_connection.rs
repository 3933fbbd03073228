use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    compute_budget::ComputeBudgetInstruction,
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use solana_transaction_status::TransactionStatus;
use tracing::{debug, warn};

use crate::rpc::{errors::RpcError, send_options::SendOptions};

/// Interval between two signature status polls.
pub const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct RpcConnectionConfig {
    pub url: String,
    pub commitment_config: Option<CommitmentConfig>,
}

impl RpcConnectionConfig {
    pub fn new(url: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            commitment_config: None,
        }
    }
}

#[async_trait]
pub trait RpcConnection: Send + Sync + Debug + 'static {
    fn new<U: ToString>(url: U, commitment_config: Option<CommitmentConfig>) -> Self
    where
        Self: Sized;

    fn get_url(&self) -> String;
    fn commitment(&self) -> CommitmentConfig;

    async fn health(&self) -> Result<(), RpcError>;
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, RpcError>;
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError>;
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError>;

    /// Returns the blockhash together with the last block height at which a
    /// transaction signed with it is still valid.
    async fn get_latest_blockhash(&self) -> Result<(Hash, u64), RpcError>;
    async fn get_block_height(&self) -> Result<u64, RpcError>;

    async fn send_transaction_with_config(
        &self,
        transaction: &Transaction,
        config: RpcSendTransactionConfig,
    ) -> Result<Signature, RpcError>;

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<TransactionStatus>>, RpcError>;

    async fn request_airdrop(
        &self,
        to: &Pubkey,
        lamports: u64,
        blockhash: &Hash,
    ) -> Result<Signature, RpcError>;

    /// Polls the status of `signature` until it reaches `commitment`.
    ///
    /// Fails with [`RpcError::TransactionFailed`] if the transaction landed
    /// with an error and with [`RpcError::BlockhashExpired`] once the chain
    /// moved past `last_valid_block_height`. The transaction is never
    /// resubmitted.
    async fn confirm_transaction_with_blockhash(
        &self,
        signature: Signature,
        last_valid_block_height: u64,
        commitment: CommitmentConfig,
    ) -> Result<Signature, RpcError> {
        let mut expired = false;
        loop {
            let status = self
                .get_signature_statuses(&[signature])
                .await?
                .into_iter()
                .next()
                .flatten();
            if let Some(status) = status {
                if let Some(error) = status.err.clone() {
                    return Err(RpcError::TransactionFailed { signature, error });
                }
                if status.satisfies_commitment(commitment) {
                    return Ok(signature);
                }
            }
            if expired {
                return Err(RpcError::BlockhashExpired {
                    signature,
                    last_valid_block_height,
                });
            }
            // One more status poll after expiry catches a transaction that
            // landed in the last valid block.
            expired = self.get_block_height().await? > last_valid_block_height;
            if !expired {
                tokio::time::sleep(CONFIRMATION_POLL_INTERVAL).await;
            }
        }
    }

    /// Builds, signs, sends and confirms a transaction.
    ///
    /// Signers are deduplicated by public key so a payer that also acts as
    /// an authority can be passed twice.
    async fn create_and_send_transaction<'a>(
        &'a self,
        instructions: &'a [Instruction],
        payer: &'a Pubkey,
        signers: &'a [&'a Keypair],
        options: SendOptions,
    ) -> Result<Signature, RpcError> {
        let mut all_instructions = Vec::with_capacity(instructions.len() + 1);
        if let Some(units) = options.compute_unit_limit {
            all_instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(units));
        }
        all_instructions.extend_from_slice(instructions);

        let signers = dedup_signers(signers);
        // Fetched at `self.commitment()`, which preflight has to match.
        let (blockhash, last_valid_block_height) = self.get_latest_blockhash().await?;
        let mut transaction = Transaction::new_with_payer(&all_instructions, Some(payer));
        transaction.try_sign(&signers, blockhash)?;

        let signature = self
            .send_transaction_with_config(&transaction, options.send_config(self.commitment()))
            .await?;
        debug!(
            "Sent transaction {} with {} instructions",
            signature,
            all_instructions.len()
        );
        self.confirm_transaction_with_blockhash(
            signature,
            last_valid_block_height,
            options.commitment,
        )
        .await
    }

    async fn airdrop_lamports(&self, to: &Pubkey, lamports: u64) -> Result<Signature, RpcError> {
        let (blockhash, last_valid_block_height) = self.get_latest_blockhash().await?;
        let signature = self.request_airdrop(to, lamports, &blockhash).await?;
        let result = self
            .confirm_transaction_with_blockhash(
                signature,
                last_valid_block_height,
                self.commitment(),
            )
            .await;
        if let Err(e) = &result {
            warn!("Airdrop of {} lamports to {} failed: {}", lamports, to, e);
        }
        result
    }
}

pub fn dedup_signers<'a>(signers: &[&'a Keypair]) -> Vec<&'a Keypair> {
    let mut unique: Vec<&'a Keypair> = Vec::with_capacity(signers.len());
    for signer in signers {
        if !unique.iter().any(|s| s.pubkey() == signer.pubkey()) {
            unique.push(signer);
        }
    }
    unique
}
