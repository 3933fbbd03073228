use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use config::{Config, ConfigError, Environment, File};
use solana_sdk::commitment_config::CommitmentConfig;

use crate::{indexer::IndexerConfig, rpc::RpcConnectionConfig, rpc::SolanaRpcUrl};

const CONFIG_FILE: &str = "forge";

pub enum SettingsKey {
    RpcUrl,
    RpcWsUrl,
    DasApiUrl,
    Commitment,
}

impl Display for SettingsKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SettingsKey::RpcUrl => "RPC_URL",
                SettingsKey::RpcWsUrl => "RPC_WS_URL",
                SettingsKey::DasApiUrl => "DAS_API_URL",
                SettingsKey::Commitment => "COMMITMENT",
            }
        )
    }
}

/// Endpoints used by fixture minting.
///
/// Values are read from an optional `forge.toml` and then from the process
/// environment, the environment taking precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeConfig {
    pub rpc_url: String,
    /// Websocket endpoint. Falls back to `rpc_url`.
    pub ws_url: String,
    /// DAS endpoint. Falls back to `rpc_url` since most providers serve both.
    pub das_api_url: String,
    pub commitment: CommitmentConfig,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        let rpc_url = SolanaRpcUrl::Localnet.to_string();
        Self {
            das_api_url: rpc_url.clone(),
            ws_url: rpc_url.clone(),
            rpc_url,
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

impl ForgeConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::default())
            .build()?;
        Self::from_settings(&settings)
    }

    pub fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let rpc_url = get_optional_string(settings, SettingsKey::RpcUrl)?
            .unwrap_or(defaults.rpc_url);
        let ws_url =
            get_optional_string(settings, SettingsKey::RpcWsUrl)?.unwrap_or(rpc_url.clone());
        let das_api_url =
            get_optional_string(settings, SettingsKey::DasApiUrl)?.unwrap_or(rpc_url.clone());
        let commitment = match get_optional_string(settings, SettingsKey::Commitment)? {
            Some(value) => CommitmentConfig::from_str(&value).map_err(|_| {
                ConfigError::Message(format!(
                    "{} has invalid commitment level `{}`",
                    SettingsKey::Commitment,
                    value
                ))
            })?,
            None => defaults.commitment,
        };
        Ok(Self {
            rpc_url,
            ws_url,
            das_api_url,
            commitment,
        })
    }

    pub fn rpc_connection_config(&self) -> RpcConnectionConfig {
        RpcConnectionConfig {
            url: self.rpc_url.clone(),
            commitment_config: Some(self.commitment),
        }
    }

    pub fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig::new(self.das_api_url.clone())
    }
}

fn get_optional_string(settings: &Config, key: SettingsKey) -> Result<Option<String>, ConfigError> {
    // `Environment::default()` lowercases keys.
    let key = key.to_string().to_lowercase();
    match settings.get_string(&key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::commitment_config::CommitmentLevel;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Config {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_defaults_point_to_localnet() {
        let config = ForgeConfig::from_settings(&settings(&[])).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert_eq!(config.das_api_url, config.rpc_url);
        assert_eq!(config.commitment.commitment, CommitmentLevel::Confirmed);
        assert_eq!(config.ws_url, config.rpc_url);
    }

    #[test]
    fn test_das_url_falls_back_to_rpc_url() {
        let config =
            ForgeConfig::from_settings(&settings(&[("rpc_url", "https://rpc.example")])).unwrap();
        assert_eq!(config.das_api_url, "https://rpc.example");
    }

    #[test]
    fn test_explicit_values() {
        let config = ForgeConfig::from_settings(&settings(&[
            ("rpc_url", "https://rpc.example"),
            ("das_api_url", "https://das.example"),
            ("rpc_ws_url", "wss://rpc.example"),
            ("commitment", "finalized"),
        ]))
        .unwrap();
        assert_eq!(config.das_api_url, "https://das.example");
        assert_eq!(config.ws_url, "wss://rpc.example");
        assert_eq!(config.commitment, CommitmentConfig::finalized());
        assert_eq!(config.indexer_config().url, "https://das.example");
    }

    #[test]
    fn test_invalid_commitment() {
        let result = ForgeConfig::from_settings(&settings(&[("commitment", "eventually")]));
        assert!(matches!(result, Err(ConfigError::Message(_))));
    }
}
