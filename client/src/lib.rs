pub mod config;
pub mod indexer;
pub mod rpc;

pub use crate::config::ForgeConfig;
