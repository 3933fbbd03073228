use forge_client::{indexer::IndexerError, rpc::RpcError};
use solana_sdk::program_error::ProgramError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MintError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Instruction error: {0}")]
    Program(#[from] ProgramError),

    #[error("Indexer error: {0}")]
    Indexer(#[from] IndexerError),

    #[error("No collection to mint compressed assets into")]
    MissingCollection,
}
