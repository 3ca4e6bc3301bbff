use std::fs;
use std::path::Path;
use ipnet::IpNet;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server_config: ServerConfig,

    #[serde(default)]
    pub firewall_config: FirewallConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    // listen address: eg: 0.0.0.0:8080
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    // a random one is generated and logged when unset
    #[serde(default)]
    pub admin_password: Option<String>,

    // served under /webassets when set
    #[serde(default)]
    pub assets_dir: Option<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            admin_password: None,
            assets_dir: None,
        }
    }
}

/// initial list entries, a bare address is a host network
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FirewallConfig {
    #[serde(default)]
    pub blacklist: Vec<String>,

    #[serde(default)]
    pub whitelist: Vec<String>,
}

impl FirewallConfig {
    pub fn blacklist_nets(&self) -> anyhow::Result<Vec<IpNet>> {
        parse_nets(&self.blacklist)
    }

    pub fn whitelist_nets(&self) -> anyhow::Result<Vec<IpNet>> {
        parse_nets(&self.whitelist)
    }
}

fn parse_nets(entries: &[String]) -> anyhow::Result<Vec<IpNet>> {
    entries
        .iter()
        .map(|entry| {
            if let Ok(net) = entry.parse::<IpNet>() {
                return Ok(net);
            }
            match entry.parse::<std::net::IpAddr>() {
                Ok(ip) => Ok(IpNet::from(ip)),
                Err(_) => anyhow::bail!("invalid network: {}", entry),
            }
        })
        .collect()
}

pub fn load(path: &str) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Like `load`, but a missing file yields the defaults
pub fn load_or_default(path: &str) -> anyhow::Result<Config> {
    if !Path::new(path).exists() {
        return Ok(Config::default());
    }
    load(path)
}
