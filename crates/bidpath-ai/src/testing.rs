//! Scripted backend for exercising stages without a live service.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::backend::{BackendError, GenerateRequest, GenerateResponse, GenerationBackend};

enum Reply {
    Text(String),
    Fail { status: u16, body: String },
}

/// Replays canned replies in order and records every request it sees.
pub(crate) struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn replying<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|s| Reply::Text(s.into())).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Reply::Fail {
                status,
                body: body.to_string(),
            }])),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(GenerateResponse {
                tokens_used: text.split_whitespace().count() as u32,
                text,
            }),
            Some(Reply::Fail { status, body }) => Err(BackendError::Server { status, body }),
            None => Err(BackendError::EmptyCompletion),
        }
    }
}
