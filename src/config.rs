//! Server configuration from environment variables.

use crate::store::{MemoryStore, RestStore, Store, StoreError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Runtime configuration.
///
/// Environment variables:
/// - `HOST` - bind address (default `0.0.0.0`)
/// - `PORT` - bind port (default `8080`)
/// - `STORE_URL` / `STORE_KEY` - hosted database API; both must be set, otherwise an
///   in-memory store is used
/// - `STORE_TIMEOUT_SECS` - request timeout for the hosted API (default 30)
/// - `STATIC_DIR` - directory served under `/static` (default `static`)
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_url: Option<String>,
    pub store_key: Option<String>,
    pub store_timeout: Duration,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            store_url: None,
            store_key: None,
            store_timeout: Duration::from_secs(30),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            store_url: get("STORE_URL"),
            store_key: get("STORE_KEY"),
            store_timeout: get("STORE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.store_timeout),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }

    /// Hosted store when both URL and key are configured, otherwise in-memory.
    pub fn build_store(&self) -> Result<Arc<dyn Store>, StoreError> {
        match (&self.store_url, &self.store_key) {
            (Some(url), Some(key)) => {
                log::info!("Using hosted store at {}", url);
                Ok(Arc::new(RestStore::new(url.clone(), key.clone(), self.store_timeout)?))
            }
            _ => {
                log::warn!("STORE_URL/STORE_KEY not set, using in-memory store (data is lost on restart)");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}
