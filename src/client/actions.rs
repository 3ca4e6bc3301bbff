//! Blacklist / whitelist mutations
//!
//! Every action follows the same protocol: confirm, send one request, show
//! the backend's JSON answer, reload. Declining the confirmation sends
//! nothing.

use std::fmt;
use std::fmt::Display;
use serde_json::Value;
use crate::client::errors::AdminError;
use crate::client::transport::{encode_segment, Method, Request, Transport};
use crate::client::ui::Ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Add to the blacklist
    Block,
    /// Remove from the blacklist
    Unblock,
    /// Add to the whitelist
    Allow,
    /// Remove from the whitelist
    Disallow,
}

/// How a confirmed-or-not action ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The user said no, nothing was sent
    Declined,
    /// The backend answered with this JSON
    Completed(Value),
    /// The exchange failed, already reported to the user
    Failed(String),
}

impl Action {
    pub fn method(&self) -> Method {
        match self {
            Action::Block | Action::Allow => Method::Put,
            Action::Unblock | Action::Disallow => Method::Delete,
        }
    }

    pub fn path(&self, id: &str) -> String {
        match self {
            Action::Block | Action::Unblock => format!("/blacklist/{}", encode_segment(id)),
            Action::Allow | Action::Disallow => format!("/whitelist/{}", encode_segment(id)),
        }
    }

    pub fn prompt(&self, id: &str) -> String {
        match self {
            Action::Block => format!("Are you sure you want to block {} ?", id),
            Action::Unblock => format!("Are you sure you want to remove {} from the blacklist?", id),
            Action::Allow => format!("Are you sure you want to add {} to the whitelist?", id),
            Action::Disallow => format!("Are you sure you want to remove {} from the whitelist?", id),
        }
    }

    /// Confirms, sends, reports and reloads
    ///
    /// The reload happens exactly once for every action that got past the
    /// confirmation, whether the request succeeded or not.
    pub async fn run(&self, id: &str, transport: &dyn Transport, ui: &dyn Ui) -> Outcome {
        if !ui.confirm(&self.prompt(id)) {
            tracing::debug!("{} {} declined", self, id);
            return Outcome::Declined;
        }

        let outcome = match self.send(id, transport).await {
            Ok(data) => {
                tracing::info!("{} {}: {}", self, id, data);
                ui.notify(&data.to_string());
                Outcome::Completed(data)
            }
            Err(e) => {
                tracing::error!("{} {} failed: {}", self, id, e);
                let message = format!("Something went wrong: {}", e);
                ui.notify(&message);
                Outcome::Failed(message)
            }
        };

        ui.reload();
        outcome
    }

    async fn send(&self, id: &str, transport: &dyn Transport) -> Result<Value, AdminError> {
        let request = Request::new(self.method(), self.path(id));
        let response = transport.send(request).await?;

        // error statuses still carry a JSON message worth showing
        let data: Value = serde_json::from_str(&response.body)?;
        Ok(data)
    }
}

impl Display for Action {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Block => "block".fmt(fmt),
            Action::Unblock => "unblock".fmt(fmt),
            Action::Allow => "allow".fmt(fmt),
            Action::Disallow => "disallow".fmt(fmt),
        }
    }
}

pub async fn block(id: &str, transport: &dyn Transport, ui: &dyn Ui) -> Outcome {
    Action::Block.run(id, transport, ui).await
}

pub async fn unblock(id: &str, transport: &dyn Transport, ui: &dyn Ui) -> Outcome {
    Action::Unblock.run(id, transport, ui).await
}

pub async fn allow(id: &str, transport: &dyn Transport, ui: &dyn Ui) -> Outcome {
    Action::Allow.run(id, transport, ui).await
}

pub async fn disallow(id: &str, transport: &dyn Transport, ui: &dyn Ui) -> Outcome {
    Action::Disallow.run(id, transport, ui).await
}
