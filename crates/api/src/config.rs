//! Process configuration for the HTTP server.
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `STOCKROOM_BIND` | listen address | `0.0.0.0:8080` |
//! | `STOCKROOM_CURRENCY` | suffix for display amounts | `zł` |
//!
//! Store variables are documented in `stockroom_infra::config`.

use std::net::SocketAddr;

use stockroom_infra::{ConfigError, StoreConfig};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_CURRENCY: &str = "zł";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub currency: String,
    pub store: StoreConfig,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_bind = lookup("STOCKROOM_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = raw_bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "STOCKROOM_BIND",
                value: raw_bind.clone(),
                reason: e.to_string(),
            })?;

        let currency = lookup("STOCKROOM_CURRENCY")
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let store = StoreConfig::from_lookup(&lookup)?;

        Ok(Self {
            bind_addr,
            currency,
            store,
        })
    }
}
