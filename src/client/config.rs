use std::fs;
use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    // admin backend base url: eg: http://127.0.0.1:8080
    #[serde(default = "default_server_url")]
    pub server_url: String,

    // request timeout, requests never time out when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    // how long a /status snapshot is served from memory
    #[serde(default = "default_freshness_ms")]
    pub freshness_ms: u64,

    // refresh period of `watch`
    #[serde(default = "default_watch_interval")]
    pub watch_interval: u64,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_freshness_ms() -> u64 {
    3000
}

fn default_watch_interval() -> u64 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: None,
            freshness_ms: default_freshness_ms(),
            watch_interval: default_watch_interval(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn freshness(&self) -> Duration {
        Duration::from_millis(self.freshness_ms)
    }
}

pub fn load(path: &str) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Like `load`, but a missing file yields the defaults
pub fn load_or_default(path: &str) -> anyhow::Result<Config> {
    if !Path::new(path).exists() {
        tracing::debug!("{} not found, using default client config", path);
        return Ok(Config::default());
    }
    load(path)
}
