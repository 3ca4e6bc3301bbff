//! Test doubles for the transport and ui seams

use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use crate::client::errors::AdminError;
use crate::client::transport::{Method, Request, Response, Transport};
use crate::client::ui::Ui;

/// Records every request and answers from a queue, `200 {"message":"Ok"}` once empty
pub struct MockTransport {
    requests: Mutex<Vec<Request>>,
    replies: Mutex<VecDeque<Result<Response, AdminError>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
        }
    }

    pub fn reply(&self, status: u16, body: &str) {
        self.replies.lock().unwrap().push_back(Ok(Response {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(AdminError::Network(message.to_string())));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// `(method, url)` pairs in send order
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.url))
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, AdminError> {
        self.requests.lock().unwrap().push(request);
        self.replies.lock().unwrap().pop_front().unwrap_or(Ok(Response {
            status: 200,
            body: r#"{"message":"Ok"}"#.to_string(),
        }))
    }
}

pub struct RecordingUi {
    answer: bool,
    pub prompts: Mutex<Vec<String>>,
    pub notifications: Mutex<Vec<String>>,
    pub reloads: Mutex<usize>,
}

impl RecordingUi {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            reloads: Mutex::new(0),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn reloads(&self) -> usize {
        *self.reloads.lock().unwrap()
    }
}

impl Ui for RecordingUi {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }

    fn notify(&self, message: &str) {
        self.notifications.lock().unwrap().push(message.to_string());
    }

    fn reload(&self) {
        *self.reloads.lock().unwrap() += 1;
    }
}
