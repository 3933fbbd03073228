use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::indexer::IndexerError;

pub fn decode_base58_to_fixed_array<const N: usize>(
    field: &'static str,
    input: &str,
) -> Result<[u8; N], IndexerError> {
    let mut buffer = [0u8; N];
    let decoded_len = bs58::decode(input)
        .onto(&mut buffer)
        .map_err(|_| IndexerError::invalid_pubkey(field, input))?;
    if decoded_len != N {
        return Err(IndexerError::invalid_pubkey(field, input));
    }
    Ok(buffer)
}

pub fn decode_pubkey(field: &'static str, input: &str) -> Result<Pubkey, IndexerError> {
    Pubkey::from_str(input).map_err(|_| IndexerError::invalid_pubkey(field, input))
}
