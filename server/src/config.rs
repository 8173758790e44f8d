use std::net::SocketAddr;

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "RELAY_BIND_ADDR";
pub const LOG_VAR: &str = "RELAY_LOG";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LOG: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Filter directive used when `RUST_LOG` is not set.
    pub default_log: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_addr.parse().map_err(|_| ConfigError::InvalidBindAddr {
            var: BIND_ADDR_VAR,
            value: raw_addr.clone(),
        })?;

        Ok(Self {
            bind_addr,
            default_log: lookup(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG.to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.default_log, "info");
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(|var| match var {
            BIND_ADDR_VAR => Some("127.0.0.1:9000".into()),
            LOG_VAR => Some("debug,adapters=trace".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.default_log, "debug,adapters=trace");
    }

    #[test]
    fn rejects_bad_address() {
        let err = ServerConfig::from_lookup(|var| (var == BIND_ADDR_VAR).then(|| "nowhere".to_owned())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    }
}
