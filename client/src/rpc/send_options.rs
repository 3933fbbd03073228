use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;

/// Per call site submission settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    /// Commitment the transaction has to reach before the call returns.
    pub commitment: CommitmentConfig,
    /// Prepends a `SetComputeUnitLimit` instruction when set.
    pub compute_unit_limit: Option<u32>,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            commitment: CommitmentConfig::confirmed(),
            compute_unit_limit: None,
        }
    }
}

impl SendOptions {
    /// Used for accounts other fixtures depend on (trees, collections,
    /// groups).
    pub fn provisioning() -> Self {
        Self {
            skip_preflight: false,
            commitment: CommitmentConfig::finalized(),
            compute_unit_limit: None,
        }
    }

    /// Used for high volume fixture minting.
    pub fn fixture() -> Self {
        Self {
            skip_preflight: true,
            commitment: CommitmentConfig::finalized(),
            compute_unit_limit: None,
        }
    }

    pub fn with_compute_unit_limit(mut self, units: u32) -> Self {
        self.compute_unit_limit = Some(units);
        self
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    /// Preflight simulates at `blockhash_commitment`, the commitment the
    /// transaction's blockhash was fetched at, not at `self.commitment`.
    pub fn send_config(&self, blockhash_commitment: CommitmentConfig) -> RpcSendTransactionConfig {
        RpcSendTransactionConfig {
            skip_preflight: self.skip_preflight,
            preflight_commitment: Some(blockhash_commitment.commitment),
            ..Default::default()
        }
    }
}
