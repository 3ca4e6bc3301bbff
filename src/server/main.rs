use std::sync::Arc;
use tokio::sync::RwLock;
use crate::server::config;
use crate::server::server::{Server, random_password};
use crate::server::state::FirewallState;
use crate::utils;

pub async fn run_server() {
    let args = std::env::args().collect::<Vec<String>>();

    if let Err(e) = utils::init_tracing() {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    let path = args.get(1).map(String::as_str).unwrap_or("server.toml");
    let cfg = match config::load_or_default(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Invalid server configuration {}: {}", path, e);
            std::process::exit(1);
        }
    };
    tracing::debug!("config: {:?}", cfg);

    let firewall = match new_firewall_state(&cfg) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Invalid firewall configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Loaded {} blacklist and {} whitelist entries",
        firewall.blacklist.len(),
        firewall.whitelist.len()
    );

    let server = Server::new(cfg.server_config, Arc::new(RwLock::new(firewall)));
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn new_firewall_state(cfg: &config::Config) -> anyhow::Result<FirewallState> {
    let admin_password = match &cfg.server_config.admin_password {
        Some(password) if !password.is_empty() => password.clone(),
        _ => {
            let password = random_password();
            tracing::info!("Password was set to {}", password);
            password
        }
    };

    Ok(FirewallState::new(
        cfg.firewall_config.blacklist_nets()?,
        cfg.firewall_config.whitelist_nets()?,
        admin_password,
    ))
}
