use ipwall_admin::client::main::run_client;

#[tokio::main]
async fn main() {
    run_client().await;
}
