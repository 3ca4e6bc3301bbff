//! Generic form submission
//!
//! PUTs an empty JSON object to `{base_url}{id}`, with `id` percent-encoded.
//! Unlike the list actions it reloads only when the request succeeded.

use crate::client::errors::AdminError;
use crate::client::transport::{encode_segment, Method, Request, Transport};
use crate::client::ui::Ui;

#[derive(Debug, Clone)]
pub struct FormHandler {
    base_url: String,
}

impl FormHandler {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn url(&self, id: &str) -> String {
        format!("{}{}", self.base_url, encode_segment(id))
    }

    pub async fn submit(&self, id: &str, transport: &dyn Transport, ui: &dyn Ui) -> Result<(), AdminError> {
        match self.put(id, transport).await {
            Ok(()) => {
                ui.reload();
                Ok(())
            }
            Err(e) => {
                tracing::error!("submit {} failed: {}", self.url(id), e);
                ui.notify(&format!("Something went wrong: {}", e));
                Err(e)
            }
        }
    }

    async fn put(&self, id: &str, transport: &dyn Transport) -> Result<(), AdminError> {
        let request = Request::new(Method::Put, self.url(id)).with_body("{}");
        let response = transport.send(request).await?;

        if !response.is_success() {
            return Err(AdminError::Status {
                code: response.status,
                body: response.body,
            });
        }
        Ok(())
    }
}
