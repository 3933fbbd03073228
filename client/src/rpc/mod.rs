pub mod errors;
pub mod rpc_connection;
pub mod send_options;
pub mod solana_rpc;

pub use errors::RpcError;
pub use rpc_connection::{RpcConnection, RpcConnectionConfig};
pub use send_options::SendOptions;
pub use solana_rpc::{RetryConfig, SolanaRpcConnection, SolanaRpcUrl};
