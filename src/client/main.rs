use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use crate::client::{Args, Command};
use crate::client::actions::{Action, Outcome};
use crate::client::clock::SystemClock;
use crate::client::config::{self, Config};
use crate::client::form::FormHandler;
use crate::client::poller::StatusPoller;
use crate::client::prettylog::{log_startup_banner, print_status};
use crate::client::transport::{HttpTransport, Transport};
use crate::client::ui::TerminalUi;
use crate::utils;

pub async fn run_client() {
    let args = Args::parse();

    if let Err(e) = utils::init_tracing() {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    let config = match config::load_or_default(&args.config) {
        Ok(config) => apply_args(config, &args),
        Err(e) => {
            tracing::error!("Invalid client configuration {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    log_startup_banner(&args, &config);

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.server_url, config.timeout()));
    let ui = TerminalUi::new(args.yes);
    let mut poller = StatusPoller::new(transport.clone(), Arc::new(SystemClock))
        .with_freshness(config.freshness());

    let ok = match args.command {
        Command::Status => {
            print_status(poller.get_status().await);
            poller.last_update().is_some()
        }
        Command::Watch { .. } => {
            run_watch(&mut poller, Duration::from_secs(config.watch_interval.max(1))).await;
            true
        }
        Command::Block { id } => run_action(Action::Block, &id, &mut poller, transport.as_ref(), &ui).await,
        Command::Unblock { id } => run_action(Action::Unblock, &id, &mut poller, transport.as_ref(), &ui).await,
        Command::Allow { id } => run_action(Action::Allow, &id, &mut poller, transport.as_ref(), &ui).await,
        Command::Disallow { id } => run_action(Action::Disallow, &id, &mut poller, transport.as_ref(), &ui).await,
        Command::Submit { url, id } => {
            let submitted = FormHandler::new(url).submit(&id, transport.as_ref(), &ui).await.is_ok();
            reload_if_requested(&ui, &mut poller).await;
            submitted
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

/// CLI flags win over the config file
fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(server) = &args.server {
        config.server_url = server.clone();
    }
    if args.timeout.is_some() {
        config.timeout_secs = args.timeout;
    }
    if let Command::Watch { interval: Some(interval) } = args.command {
        config.watch_interval = interval;
    }
    config
}

async fn run_action(
    action: Action,
    id: &str,
    poller: &mut StatusPoller,
    transport: &dyn Transport,
    ui: &TerminalUi,
) -> bool {
    let outcome = action.run(id, transport, ui).await;
    reload_if_requested(ui, poller).await;
    !matches!(outcome, Outcome::Failed(_))
}

/// The terminal equivalent of a page reload: refetch and print the status
async fn reload_if_requested(ui: &TerminalUi, poller: &mut StatusPoller) {
    if !ui.take_reload() {
        return;
    }
    // on failure the previous snapshot is printed
    let _ = poller.fetch_status().await;
    print_status(poller.snapshot());
}

async fn run_watch(poller: &mut StatusPoller, period: Duration) {
    let mut ticker = interval(period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                print_status(poller.get_status().await);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopped watching");
                return;
            }
        }
    }
}
