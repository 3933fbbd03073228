use std::{
    fmt::{Debug, Display, Formatter},
    time::Duration,
};

use async_trait::async_trait;
use solana_client::{client_error::ClientErrorKind, nonblocking::rpc_client::RpcClient};
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use solana_transaction_status::TransactionStatus;
use tokio::time::{sleep, Instant};
use tracing::warn;

use super::rpc_connection::RpcConnectionConfig;
use crate::rpc::{errors::RpcError, rpc_connection::RpcConnection};

pub enum SolanaRpcUrl {
    Testnet,
    Devnet,
    Localnet,
    Custom(String),
}

impl Display for SolanaRpcUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            SolanaRpcUrl::Testnet => "https://api.testnet.solana.com".to_string(),
            SolanaRpcUrl::Devnet => "https://api.devnet.solana.com".to_string(),
            SolanaRpcUrl::Localnet => "http://localhost:8899".to_string(),
            SolanaRpcUrl::Custom(url) => url.clone(),
        };
        write!(f, "{}", str)
    }
}

/// Retry policy for read requests. Transaction submission is never retried.
#[derive(Clone, Debug, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: 30,
            retry_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct SolanaRpcConnection {
    pub client: RpcClient,
    pub retry_config: RetryConfig,
}

impl Debug for SolanaRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolanaRpcConnection {{ client: {:?} }}",
            self.client.url()
        )
    }
}

impl SolanaRpcConnection {
    pub fn new_with_retry(config: RpcConnectionConfig, retry_config: Option<RetryConfig>) -> Self {
        let commitment_config = config
            .commitment_config
            .unwrap_or(CommitmentConfig::confirmed());
        let client = RpcClient::new_with_commitment(config.url, commitment_config);
        Self {
            client,
            retry_config: retry_config.unwrap_or_default(),
        }
    }

    async fn retry<F, Fut, T>(&self, operation: F) -> Result<T, RpcError>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: std::future::Future<Output = Result<T, RpcError>> + Send,
        T: Send,
    {
        let mut attempts = 0;
        let start_time = Instant::now();
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !Self::should_retry(&e) {
                        return Err(e);
                    }
                    attempts += 1;
                    if attempts >= self.retry_config.max_retries
                        || start_time.elapsed() >= self.retry_config.timeout
                    {
                        return Err(e);
                    }
                    warn!(
                        "Operation failed, retrying in {:?} (attempt {}/{}): {:?}",
                        self.retry_config.retry_delay,
                        attempts,
                        self.retry_config.max_retries,
                        e
                    );
                    sleep(self.retry_config.retry_delay).await;
                }
            }
        }
    }

    /// Only transport failures are retried. RPC level errors are returned as
    /// they are.
    fn should_retry(error: &RpcError) -> bool {
        match error {
            RpcError::ClientError(error) => matches!(
                error.kind(),
                ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_)
            ),
            _ => false,
        }
    }
}

#[async_trait]
impl RpcConnection for SolanaRpcConnection {
    fn new<U: ToString>(url: U, commitment_config: Option<CommitmentConfig>) -> Self
    where
        Self: Sized,
    {
        Self::new_with_retry(
            RpcConnectionConfig {
                url: url.to_string(),
                commitment_config,
            },
            None,
        )
    }

    fn get_url(&self) -> String {
        self.client.url()
    }

    fn commitment(&self) -> CommitmentConfig {
        self.client.commitment()
    }

    async fn health(&self) -> Result<(), RpcError> {
        self.retry(|| async { self.client.get_health().await.map_err(RpcError::from) })
            .await
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, RpcError> {
        self.retry(|| async {
            self.client
                .get_account_with_commitment(address, self.client.commitment())
                .await
                .map(|response| response.value)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        self.retry(|| async {
            self.client
                .get_balance(pubkey)
                .await
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        self.retry(|| async {
            self.client
                .get_minimum_balance_for_rent_exemption(data_len)
                .await
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_latest_blockhash(&self) -> Result<(Hash, u64), RpcError> {
        self.retry(|| async {
            self.client
                .get_latest_blockhash_with_commitment(self.client.commitment())
                .await
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_block_height(&self) -> Result<u64, RpcError> {
        self.retry(|| async {
            self.client
                .get_block_height()
                .await
                .map_err(RpcError::from)
        })
        .await
    }

    async fn send_transaction_with_config(
        &self,
        transaction: &Transaction,
        config: RpcSendTransactionConfig,
    ) -> Result<Signature, RpcError> {
        self.client
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(RpcError::from)
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<TransactionStatus>>, RpcError> {
        self.retry(|| async {
            self.client
                .get_signature_statuses(signatures)
                .await
                .map(|response| response.value)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn request_airdrop(
        &self,
        to: &Pubkey,
        lamports: u64,
        blockhash: &Hash,
    ) -> Result<Signature, RpcError> {
        self.client
            .request_airdrop_with_blockhash(to, lamports, blockhash)
            .await
            .map_err(RpcError::from)
    }
}
