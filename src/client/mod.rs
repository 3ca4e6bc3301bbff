use clap::{Parser, Subcommand};

pub mod actions;
pub mod clock;
pub mod config;
pub mod errors;
pub mod form;
pub mod main;
pub mod poller;
mod prettylog;
pub mod transport;
pub mod ui;

#[cfg(test)]
mod mock;

/// ipwall admin client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Admin backend url (e.g., http://127.0.0.1:8080), overrides the config file
    #[arg(short, long)]
    pub server: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Request timeout in seconds (no timeout if not specified)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Client configuration file
    #[arg(short, long, default_value = "client.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the current firewall status
    Status,

    /// Keep printing the firewall status
    Watch {
        /// Refresh interval in seconds, overrides the config file
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Add an address to the blacklist
    Block { id: String },

    /// Remove an address from the blacklist
    Unblock { id: String },

    /// Add an address to the whitelist
    Allow { id: String },

    /// Remove an address from the whitelist
    Disallow { id: String },

    /// PUT an empty form to <URL><ID>
    Submit { url: String, id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block() {
        let args = Args::try_parse_from(["client", "--server", "http://10.0.0.1:8080", "-y", "block", "1.2.3.4"]).unwrap();
        assert_eq!(args.server.as_deref(), Some("http://10.0.0.1:8080"));
        assert!(args.yes);
        assert_eq!(args.config, "client.toml");
        assert_eq!(args.command, Command::Block { id: "1.2.3.4".to_string() });
    }

    #[test]
    fn test_parse_watch_and_submit() {
        let args = Args::try_parse_from(["client", "watch", "--interval", "5"]).unwrap();
        assert_eq!(args.command, Command::Watch { interval: Some(5) });

        let args = Args::try_parse_from(["client", "submit", "/whitelist/", "10.0.0.2"]).unwrap();
        assert_eq!(
            args.command,
            Command::Submit { url: "/whitelist/".to_string(), id: "10.0.0.2".to_string() }
        );
    }

    #[test]
    fn test_command_required() {
        assert!(Args::try_parse_from(["client"]).is_err());
    }
}
