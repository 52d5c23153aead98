use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

/// Server settings read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Permissive CORS for a separately served frontend
    pub cors_allow_any: bool,
    /// Refresh insights once at startup
    pub refresh_on_start: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        Ok(Self {
            bind_addr,
            cors_allow_any: parse_flag("CORS_ALLOW_ANY", true)?,
            refresh_on_start: parse_flag("REFRESH_ON_START", true)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_allow_any: true,
            refresh_on_start: true,
        }
    }
}

fn parse_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("{} must be a boolean, got '{}'", name, other),
        },
        Err(_) => Ok(default),
    }
}
