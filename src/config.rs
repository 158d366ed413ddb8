use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};

use crate::seed::SeedData;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "9090";

/// Runtime settings, read from the environment (and `.env`, when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub address: SocketAddr,
    /// Fixture set to reload on start, if any.
    pub seed: Option<SeedData>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host: IpAddr = env_or("HOST", DEFAULT_HOST)
            .parse()
            .context("HOST must be an IP address")?;
        let port: u16 = env_or("PORT", DEFAULT_PORT)
            .parse()
            .context("PORT must be a port number")?;
        let seed = match std::env::var("SEED_DATA") {
            Ok(value) if !value.is_empty() => Some(value.parse()?),
            _ => None,
        };
        Ok(Config {
            database_url,
            address: SocketAddr::new(host, port),
            seed,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
