use std::io;

use solana_client::client_error::ClientError;
use solana_sdk::{
    signature::Signature, signer::SignerError, transaction::TransactionError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("TransactionError: {0}")]
    TransactionError(#[from] Box<TransactionError>),

    #[error("ClientError: {0}")]
    ClientError(#[from] Box<ClientError>),

    #[error("SignerError: {0}")]
    SignerError(#[from] SignerError),

    #[error("IoError: {0}")]
    IoError(#[from] Box<io::Error>),

    /// The transaction landed but the runtime rejected it.
    #[error("Transaction {signature} failed: {error}")]
    TransactionFailed {
        signature: Signature,
        error: TransactionError,
    },

    #[error("Transaction {signature} was not confirmed before block height {last_valid_block_height}")]
    BlockhashExpired {
        signature: Signature,
        last_valid_block_height: u64,
    },

    #[error("Error: `{0}`")]
    CustomError(String),
}

impl From<TransactionError> for RpcError {
    fn from(err: TransactionError) -> Self {
        RpcError::TransactionError(Box::new(err))
    }
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        RpcError::ClientError(Box::new(err))
    }
}

impl From<io::Error> for RpcError {
    fn from(err: io::Error) -> Self {
        RpcError::IoError(Box::new(err))
    }
}
