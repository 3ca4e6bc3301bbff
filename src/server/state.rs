use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Display;
use std::net::IpAddr;
use ipnet::IpNet;
use serde::Serialize;

/// Mutation errors, mapped to 400 / 404 by the handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The identifier does not parse as an IP address
    InvalidIp,
    /// Nothing in the list matched
    NotFound,
}

impl std::error::Error for ListError {}

impl Display for ListError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ListError::InvalidIp => "invalid ip address".fmt(fmt),
            ListError::NotFound => "no matching entry".fmt(fmt),
        }
    }
}

/// Blacklist, whitelist and the admission counters
#[derive(Debug, Clone, Default, Serialize)]
pub struct FirewallState {
    /// client address -> number of admitted requests
    pub allowed: BTreeMap<String, u64>,
    pub blacklist: Vec<IpNet>,
    /// client address -> number of refused requests
    pub refused: BTreeMap<String, u64>,
    pub whitelist: Vec<IpNet>,

    #[serde(skip)]
    pub admin_password: String,
}

impl FirewallState {
    pub fn new(blacklist: Vec<IpNet>, whitelist: Vec<IpNet>, admin_password: String) -> Self {
        Self {
            allowed: BTreeMap::new(),
            blacklist,
            refused: BTreeMap::new(),
            whitelist,
            admin_password,
        }
    }

    /// Blacklists `id`, taking it off the whitelist first
    pub fn block(&mut self, id: &str) -> Result<(), ListError> {
        let ip = parse_ip(id)?;
        remove_ip(&mut self.whitelist, ip);
        self.blacklist.push(IpNet::from(ip));
        tracing::info!("{} added to the blacklist", ip);
        Ok(())
    }

    /// Whitelists `id`, taking it off the blacklist first
    pub fn allow(&mut self, id: &str) -> Result<(), ListError> {
        let ip = parse_ip(id)?;
        remove_ip(&mut self.blacklist, ip);
        self.whitelist.push(IpNet::from(ip));
        tracing::info!("{} added to the whitelist", ip);
        Ok(())
    }

    /// Returns how many blacklist entries were removed
    pub fn unblock(&mut self, id: &str) -> Result<usize, ListError> {
        let ip = parse_ip(id)?;
        match remove_ip(&mut self.blacklist, ip) {
            0 => Err(ListError::NotFound),
            count => {
                tracing::info!("{} removed from the blacklist ({} entries)", ip, count);
                Ok(count)
            }
        }
    }

    /// Returns how many whitelist entries were removed
    pub fn disallow(&mut self, id: &str) -> Result<usize, ListError> {
        let ip = parse_ip(id)?;
        match remove_ip(&mut self.whitelist, ip) {
            0 => Err(ListError::NotFound),
            count => {
                tracing::info!("{} removed from the whitelist ({} entries)", ip, count);
                Ok(count)
            }
        }
    }

    /// Decides whether `ip` may use the service and counts the decision
    ///
    /// Blacklisted addresses are refused. With a non-empty whitelist, only
    /// whitelisted addresses get through.
    pub fn admit(&mut self, ip: IpAddr) -> bool {
        let blocked = self.blacklist.iter().any(|net| net.contains(&ip));
        let listed = self.whitelist.is_empty() || self.whitelist.iter().any(|net| net.contains(&ip));

        let admitted = !blocked && listed;
        let counters = if admitted { &mut self.allowed } else { &mut self.refused };
        *counters.entry(ip.to_string()).or_default() += 1;

        if !admitted {
            tracing::debug!("refused {}", ip);
        }
        admitted
    }
}

fn parse_ip(id: &str) -> Result<IpAddr, ListError> {
    id.parse::<IpAddr>().map_err(|_| ListError::InvalidIp)
}

/// Drops every network whose address is `ip`, returns how many went
fn remove_ip(nets: &mut Vec<IpNet>, ip: IpAddr) -> usize {
    let before = nets.len();
    nets.retain(|net| net.addr() != ip);
    before - nets.len()
}
