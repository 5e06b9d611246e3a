//! Environment-driven configuration.
//!
//! All settings come from the process environment; a `.env` file loaded
//! at startup feeds the same variables in development.

use std::env;
use std::net::SocketAddr;

use anyhow::{bail, Context};

const DEFAULT_ADDR: &str = "127.0.0.1:8000";

/// Runtime configuration for the daemon
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL, `sqlite:` or `postgres://` (`DATABASE_URL`, required)
    pub database_url: String,
    /// Listen address (`STOCKROOM_ADDR`, default 127.0.0.1:8000)
    pub addr: SocketAddr,
    /// Pool size override (`STOCKROOM_MAX_CONNECTIONS`)
    pub max_connections: Option<u32>,
}

impl Config {
    /// Read configuration from the environment
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is missing or any variable fails to
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let addr_raw = env::var("STOCKROOM_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = parse_addr(&addr_raw)?;

        let max_connections = match env::var("STOCKROOM_MAX_CONNECTIONS") {
            Ok(raw) => Some(parse_max_connections(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            database_url,
            addr,
            max_connections,
        })
    }
}

fn parse_addr(raw: &str) -> anyhow::Result<SocketAddr> {
    raw.parse()
        .with_context(|| format!("invalid listen address: {raw}"))
}

fn parse_max_connections(raw: &str) -> anyhow::Result<u32> {
    let n: u32 = raw
        .parse()
        .with_context(|| format!("invalid STOCKROOM_MAX_CONNECTIONS: {raw}"))?;
    if n == 0 {
        bail!("STOCKROOM_MAX_CONNECTIONS must be at least 1");
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addr() {
        assert_eq!(
            parse_addr("127.0.0.1:8000").unwrap(),
            "127.0.0.1:8000".parse::<SocketAddr>().unwrap()
        );
        assert!(parse_addr("not an addr").is_err());
        assert!(parse_addr("127.0.0.1").is_err());
    }

    #[test]
    fn test_parse_max_connections() {
        assert_eq!(parse_max_connections("10").unwrap(), 10);
        assert!(parse_max_connections("0").is_err());
        assert!(parse_max_connections("lots").is_err());
    }

    #[test]
    fn test_default_addr_parses() {
        assert!(parse_addr(DEFAULT_ADDR).is_ok());
    }
}
