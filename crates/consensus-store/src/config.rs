use crate::error::StoreError;
use crate::lockfile::write_json_atomic;
use chrono::{DateTime, Utc};
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Overrides `share_base_url` when set.
pub const SHARE_URL_ENV: &str = "CONSENSUS_SHARE_URL";

const ENV_PREFIX: &str = "CONSENSUS_";

const CONFIG_VERSION: u32 = 1;

fn default_share_base_url() -> String {
    "http://localhost:3000".into()
}

const fn default_recents_limit() -> usize {
    50
}

const fn default_poll_interval_ms() -> u64 {
    500
}

/// Store settings kept in `.consensus/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    /// Address that share links point at; the decision id goes in `?id=`.
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    #[serde(default = "default_recents_limit")]
    pub recents_limit: usize,
    /// How often `watch` re-reads subscribed records from disk.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            created_at: Utc::now(),
            share_base_url: default_share_base_url(),
            recents_limit: default_recents_limit(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl StoreConfig {
    /// Read the config file and apply environment overrides.
    ///
    /// Precedence (highest to lowest):
    /// 1. `CONSENSUS_SHARE_URL`
    /// 2. the config file
    /// 3. default values
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        fs::metadata(path)?;
        let mut config: StoreConfig = Self::figment(path).extract()?;
        config.share_base_url = config.share_base_url.trim().to_string();
        if config.share_base_url.is_empty() {
            config.share_base_url = default_share_base_url();
        }
        Ok(config)
    }

    /// Provider chain: defaults, then the file, then the environment.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file(path))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .only(&["share_url"])
                    .map(|_| "share_base_url".into()),
            )
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        write_json_atomic(path, self)
    }
}
