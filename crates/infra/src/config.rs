//! Data store configuration, read from the process environment.
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `STOCKROOM_STORE` | `postgres` or `memory` | `postgres` |
//! | `DATABASE_URL` | Postgres connection string | required for `postgres` |
//! | `STOCKROOM_DB_MAX_CONNECTIONS` | pool size | `5` |

use thiserror::Error;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Which store implementation backs the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local tables; contents are lost on exit.
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::InMemory,
        }
    }

    /// Load from the real process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = lookup("STOCKROOM_STORE")
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_else(|| "postgres".to_string());

        let backend = match kind.as_str() {
            "memory" | "in-memory" | "in_memory" => StoreBackend::InMemory,
            "postgres" | "postgresql" => {
                let database_url = lookup("DATABASE_URL")
                    .filter(|v| !v.trim().is_empty())
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?;

                let max_connections = match lookup("STOCKROOM_DB_MAX_CONNECTIONS") {
                    None => DEFAULT_MAX_CONNECTIONS,
                    Some(raw) => match raw.trim().parse::<u32>() {
                        Ok(0) => {
                            return Err(ConfigError::Invalid {
                                name: "STOCKROOM_DB_MAX_CONNECTIONS",
                                value: raw,
                                reason: "must be at least 1".to_string(),
                            });
                        }
                        Ok(n) => n,
                        Err(e) => {
                            return Err(ConfigError::Invalid {
                                name: "STOCKROOM_DB_MAX_CONNECTIONS",
                                value: raw,
                                reason: e.to_string(),
                            });
                        }
                    },
                };

                StoreBackend::Postgres {
                    database_url,
                    max_connections,
                }
            }
            _ => {
                return Err(ConfigError::Invalid {
                    name: "STOCKROOM_STORE",
                    value: kind,
                    reason: "expected `postgres` or `memory`".to_string(),
                });
            }
        };

        Ok(Self { backend })
    }
}
