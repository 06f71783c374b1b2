//! Server configuration read from the environment

use anyhow::{Context, Result};
use shelf_core::{InventoryOptions, StoreKind};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen address
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Runtime settings for the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,

    /// Which inventory backend to build
    pub store: StoreKind,

    /// JSON catalog to seed from; the built-in catalog when `None`
    pub seed_path: Option<PathBuf>,

    pub options: InventoryOptions,

    /// Raw `SHELF_CORS_ORIGINS` value
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            store: StoreKind::default(),
            seed_path: None,
            options: InventoryOptions::default(),
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// Read configuration from `SHELF_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = lookup("SHELF_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .context("SHELF_ADDR is not a valid socket address")?;

        let store = match lookup("SHELF_STORE") {
            Some(kind) => kind
                .parse()
                .map_err(anyhow::Error::msg)
                .context("SHELF_STORE is invalid")?,
            None => StoreKind::default(),
        };

        let options = match lookup("SHELF_MAX_QUANTITY") {
            Some(max) => InventoryOptions::with_max_quantity(
                max.trim()
                    .parse()
                    .with_context(|| format!("SHELF_MAX_QUANTITY '{}' is not a count", max))?,
            ),
            None => InventoryOptions::default(),
        };

        Ok(Self {
            addr,
            store,
            seed_path: lookup("SHELF_SEED_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            options,
            cors_origins: lookup("SHELF_CORS_ORIGINS"),
        })
    }
}
