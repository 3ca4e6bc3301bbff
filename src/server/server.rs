use std::sync::Arc;
use std::net::SocketAddr;
use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use base64::Engine;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use crate::server::config::ServerConfig;
use crate::server::handlers::{self, AppState};
use crate::server::state::FirewallState;

pub struct Server {
    server_config: ServerConfig,
    firewall: Arc<RwLock<FirewallState>>,
}

impl Server {
    pub fn new(server_config: ServerConfig, firewall: Arc<RwLock<FirewallState>>) -> Self {
        Server {
            server_config,
            firewall,
        }
    }

    /// Admin API routes, plus `/webassets` behind the admission gate when configured
    pub fn router(&self) -> Router {
        let app = router(self.firewall.clone());
        match &self.server_config.assets_dir {
            Some(dir) => app.merge(assets_router(dir, self.firewall.clone())),
            None => app,
        }
    }

    pub async fn run(&self) -> crate::Result<()> {
        let listener = TcpListener::bind(&self.server_config.listen_addr).await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener until Ctrl-C
    pub async fn serve(&self, listener: TcpListener) -> crate::Result<()> {
        tracing::info!("Admin API listening on http://{}", listener.local_addr()?);

        let app = self.router().into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Admin API stopped");
        Ok(())
    }
}

/// Admin API routes over a shared firewall state
pub fn router(firewall: Arc<RwLock<FirewallState>>) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/status", get(handlers::status))
        .route("/refused", get(handlers::refused))
        .route("/blacklist", get(handlers::blacklist))
        .route("/whitelist", get(handlers::whitelist))
        .route("/blacklist/:id", put(handlers::block).delete(handlers::unblock))
        .route("/whitelist/:id", put(handlers::allow).delete(handlers::disallow))
        .with_state(AppState::new(firewall))
}

/// Static files, every request goes through `FirewallState::admit`
///
/// Needs `ConnectInfo<SocketAddr>` on the request, see `Server::serve`.
pub fn assets_router(dir: &str, firewall: Arc<RwLock<FirewallState>>) -> Router {
    Router::new()
        .nest_service("/webassets", ServeDir::new(dir))
        .layer(middleware::from_fn_with_state(AppState::new(firewall), handlers::admission))
}

/// Random 7 character password, used when none is configured
pub fn random_password() -> String {
    let bytes: [u8; 32] = rand::random();
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    encoded[1..8].to_string()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Router, Arc<RwLock<FirewallState>>) {
        let firewall = Arc::new(RwLock::new(FirewallState::default()));
        (router(firewall.clone()), firewall)
    }

    async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _) = app();
        assert_eq!(call(&app, "GET", "/ping").await, (StatusCode::OK, json!({"message": "pong"})));
    }

    #[tokio::test]
    async fn test_status_document() {
        let (app, firewall) = app();
        firewall.write().await.admit("10.9.9.9".parse().unwrap());

        let (code, body) = call(&app, "GET", "/status").await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "allowed": {"10.9.9.9": 1},
                "blacklist": [],
                "refused": {},
                "whitelist": [],
            })
        );
    }

    #[tokio::test]
    async fn test_block_and_unblock() {
        let (app, firewall) = app();

        let (code, body) = call(&app, "PUT", "/blacklist/10.0.0.5").await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, json!({"message": "Ok"}));
        assert_eq!(call(&app, "GET", "/blacklist").await.1, json!(["10.0.0.5/32"]));

        let (code, body) = call(&app, "DELETE", "/blacklist/10.0.0.5").await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, json!({"message": "The element was removed", "count": 1}));
        assert!(firewall.read().await.blacklist.is_empty());

        let (code, body) = call(&app, "DELETE", "/blacklist/10.0.0.5").await;
        assert_eq!(code, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Not found"}));
    }

    #[tokio::test]
    async fn test_whitelist_delete_removes_from_whitelist() {
        let (app, firewall) = app();
        call(&app, "PUT", "/whitelist/10.0.0.6").await;
        call(&app, "PUT", "/blacklist/10.0.0.7").await;

        let (code, _) = call(&app, "DELETE", "/whitelist/10.0.0.6").await;
        assert_eq!(code, StatusCode::OK);

        let firewall = firewall.read().await;
        assert!(firewall.whitelist.is_empty());
        assert_eq!(firewall.blacklist.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_ip_is_bad_request() {
        let (app, _) = app();
        for (method, uri) in [
            ("PUT", "/blacklist/nope"),
            ("PUT", "/whitelist/nope"),
            ("DELETE", "/blacklist/nope"),
            ("DELETE", "/whitelist/nope"),
        ] {
            let (code, body) = call(&app, method, uri).await;
            assert_eq!(code, StatusCode::BAD_REQUEST, "{} {}", method, uri);
            assert_eq!(body, json!({"message": "The ip is not valid"}));
        }
    }

    #[tokio::test]
    async fn test_refused_list() {
        let (app, firewall) = app();
        call(&app, "PUT", "/blacklist/10.0.0.8").await;
        firewall.write().await.admit("10.0.0.8".parse().unwrap());

        assert_eq!(call(&app, "GET", "/refused").await.1, json!({"10.0.0.8": 1}));
    }

    fn assets_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("ipwall-assets-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("webadmin.js"), "function block(ip) {}").unwrap();
        dir.to_string_lossy().to_string()
    }

    async fn fetch_asset(app: &Router, client: &str) -> StatusCode {
        let mut request = Request::builder()
            .uri("/webassets/webadmin.js")
            .body(Body::empty())
            .unwrap();
        let addr: SocketAddr = format!("{}:40000", client).parse().unwrap();
        request.extensions_mut().insert(axum::extract::ConnectInfo(addr));
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_assets_are_admission_gated() {
        let (_, firewall) = app();
        let app = assets_router(&assets_dir("gate"), firewall.clone());

        assert_eq!(fetch_asset(&app, "10.5.0.1").await, StatusCode::OK);
        firewall.write().await.block("10.5.0.2").unwrap();
        assert_eq!(fetch_asset(&app, "10.5.0.2").await, StatusCode::FORBIDDEN);

        let firewall = firewall.read().await;
        assert_eq!(firewall.allowed.get("10.5.0.1"), Some(&1));
        assert_eq!(firewall.refused.get("10.5.0.2"), Some(&1));
        assert!(firewall.allowed.get("10.5.0.2").is_none());
    }

    #[tokio::test]
    async fn test_admin_routes_are_not_counted() {
        let firewall = Arc::new(RwLock::new(FirewallState::default()));
        let server = Server::new(
            ServerConfig {
                listen_addr: "127.0.0.1:0".to_string(),
                admin_password: None,
                assets_dir: Some(assets_dir("admin")),
            },
            firewall.clone(),
        );
        let app = server.router();

        assert_eq!(call(&app, "GET", "/ping").await.0, StatusCode::OK);
        assert_eq!(fetch_asset(&app, "10.6.0.1").await, StatusCode::OK);

        let firewall = firewall.read().await;
        assert_eq!(firewall.allowed.len(), 1);
        assert!(firewall.refused.is_empty());
    }

    #[test]
    fn test_random_password() {
        let a = random_password();
        let b = random_password();
        assert_eq!(a.len(), 7);
        assert_ne!(a, b);
    }
}
