//! Status polling with a short freshness window
//!
//! The poller owns the last `/status` snapshot. Reads inside the freshness
//! window are served from memory; anything older goes back to the backend.
//! Nothing invalidates the snapshot on mutation, callers reload explicitly.

use std::sync::Arc;
use std::time::{Duration, Instant};
use serde_json::{Map, Value};
use crate::client::clock::Clock;
use crate::client::errors::AdminError;
use crate::client::transport::{Method, Request, Transport};

/// How long a fetched snapshot is served without going back to the backend
pub const STATUS_FRESHNESS: Duration = Duration::from_secs(3);

pub const STATUS_PATH: &str = "/status";

/// Opaque `/status` payload, identifier -> record
pub type Snapshot = Map<String, Value>;

pub struct StatusPoller {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    freshness: Duration,

    snapshot: Option<Snapshot>,
    loading: bool,
    last_update: Option<Instant>,
}

impl StatusPoller {
    pub fn new(transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transport,
            clock,
            freshness: STATUS_FRESHNESS,
            snapshot: None,
            loading: true,
            last_update: None,
        }
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    /// Fetches `/status` and replaces the snapshot
    ///
    /// The loading flag is cleared whatever the outcome. On failure the
    /// previous snapshot is kept and the error is handed back.
    pub async fn fetch_status(&mut self) -> Result<&Snapshot, AdminError> {
        let result = self.fetch_snapshot().await;
        self.loading = false;

        match result {
            Ok(snapshot) => {
                self.last_update = Some(self.clock.now());
                Ok(&*self.snapshot.insert(snapshot))
            }
            Err(e) => {
                tracing::error!("Error fetching status: {}", e);
                Err(e)
            }
        }
    }

    /// Returns the snapshot, refetching it once it is older than the freshness window
    ///
    /// A failed refetch falls back to whatever was cached before, which is
    /// `None` if nothing was ever fetched.
    pub async fn get_status(&mut self) -> Option<&Snapshot> {
        if self.is_fresh() {
            return self.snapshot.as_ref();
        }

        // error already logged by fetch_status
        let _ = self.fetch_status().await;
        self.snapshot.as_ref()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    fn is_fresh(&self) -> bool {
        match (self.last_update, &self.snapshot) {
            (Some(last), Some(_)) => self.clock.now().saturating_duration_since(last) < self.freshness,
            _ => false,
        }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, AdminError> {
        let response = self
            .transport
            .send(Request::new(Method::Get, STATUS_PATH))
            .await?;

        if !response.is_success() {
            return Err(AdminError::Status {
                code: response.status,
                body: response.body,
            });
        }

        let snapshot: Snapshot = serde_json::from_str(&response.body)?;
        Ok(snapshot)
    }
}
