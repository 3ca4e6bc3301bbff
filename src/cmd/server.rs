use ipwall_admin::server::main::run_server;

#[tokio::main]
async fn main() {
    run_server().await;
}
