//! Server settings read from the environment.

use anyhow::{bail, Context};
use std::net::SocketAddr;
use twenty48_core::{DEFAULT_SIZE, SUPPORTED_SIZES};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on (`SERVER_ADDR`)
    pub addr: SocketAddr,
    /// Board size for games that don't ask for one (`DEFAULT_BOARD_SIZE`)
    pub default_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            default_size: DEFAULT_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr: SocketAddr = lookup("SERVER_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.into())
            .parse()
            .context("SERVER_ADDR is not a valid socket address")?;

        let default_size: usize = match lookup("DEFAULT_BOARD_SIZE") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DEFAULT_BOARD_SIZE is not a number: {}", raw))?,
            None => DEFAULT_SIZE,
        };
        if !SUPPORTED_SIZES.contains(&default_size) {
            bail!(
                "DEFAULT_BOARD_SIZE must be between {} and {}, got {}",
                SUPPORTED_SIZES.start(),
                SUPPORTED_SIZES.end(),
                default_size
            );
        }

        Ok(Self { addr, default_size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SERVER_ADDR", "127.0.0.1:9000"),
            ("DEFAULT_BOARD_SIZE", "6"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.default_size, 6);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ServerConfig::from_lookup(lookup(&[("SERVER_ADDR", "nowhere")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("DEFAULT_BOARD_SIZE", "ten")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("DEFAULT_BOARD_SIZE", "12")])).is_err());
    }
}
