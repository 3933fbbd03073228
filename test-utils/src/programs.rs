use solana_sdk::{pubkey, pubkey::Pubkey};

pub use mpl_bubblegum::ID as MPL_BUBBLEGUM_ID;
pub use mpl_core::ID as MPL_CORE_ID;
pub use mpl_token_metadata::ID as MPL_TOKEN_METADATA_ID;
pub use spl_associated_token_account::ID as SPL_ASSOCIATED_TOKEN_ACCOUNT_ID;
pub use spl_token::ID as SPL_TOKEN_ID;
pub use spl_token_2022::ID as SPL_TOKEN_2022_ID;

pub const SPL_ACCOUNT_COMPRESSION_ID: Pubkey =
    pubkey!("cmtDvXumGCrqC1Age74AVPhSRVXJMd8PJS91L8KbNCK");
pub const SPL_NOOP_ID: Pubkey = pubkey!("noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV");
