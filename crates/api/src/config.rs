//! Runtime configuration, read from the environment (and `.env` if present).

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use pharmanet_observability::LogFormat;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PHARMANET_BIND`
    pub bind: SocketAddr,
    /// `PHARMANET_WALLET_DIR`: one sub-directory per organisation.
    pub wallet_dir: PathBuf,
    /// `PHARMANET_CRYPTO_CONFIG`: generated network crypto material.
    pub crypto_config: PathBuf,
    /// `PHARMANET_CHANNEL`
    pub channel: String,
    /// `PHARMANET_CHAINCODE`
    pub chaincode: String,
    /// `PHARMANET_LOG_FORMAT`: `json` or `pretty`.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            wallet_dir: PathBuf::from("./identity"),
            crypto_config: PathBuf::from("../network/crypto-config"),
            channel: "pharmachannel".to_string(),
            chaincode: "pharmanet".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    /// Load from the process environment after applying `.env`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind = match var("PHARMANET_BIND") {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .with_context(|| format!("invalid PHARMANET_BIND '{raw}'"))?,
            None => defaults.bind,
        };
        let log_format = match var("PHARMANET_LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().context("invalid PHARMANET_LOG_FORMAT")?,
            None => defaults.log_format,
        };

        Ok(Self {
            bind,
            wallet_dir: var("PHARMANET_WALLET_DIR").map(PathBuf::from).unwrap_or(defaults.wallet_dir),
            crypto_config: var("PHARMANET_CRYPTO_CONFIG")
                .map(PathBuf::from)
                .unwrap_or(defaults.crypto_config),
            channel: var("PHARMANET_CHANNEL").unwrap_or(defaults.channel),
            chaincode: var("PHARMANET_CHAINCODE").unwrap_or(defaults.chaincode),
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.channel, "pharmachannel");
        assert_eq!(config.chaincode, "pharmanet");
        assert_eq!(config.wallet_dir, PathBuf::from("./identity"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn overrides_from_environment() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PHARMANET_BIND", "127.0.0.1:8081"),
            ("PHARMANET_WALLET_DIR", "/tmp/wallet"),
            ("PHARMANET_LOG_FORMAT", "pretty"),
            ("PHARMANET_CHANNEL", " "),
        ]))
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:8081".parse::<SocketAddr>().unwrap());
        assert_eq!(config.wallet_dir, PathBuf::from("/tmp/wallet"));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.channel, "pharmachannel");
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(AppConfig::from_lookup(lookup(&[("PHARMANET_BIND", "not-an-addr")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("PHARMANET_LOG_FORMAT", "xml")])).is_err());
    }
}
