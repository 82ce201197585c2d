//! Memory backend: Canned responses keyed by URL.

use crate::actor::FeedBackend;
use crate::error::FetchError;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
enum Response {
    Body(String),
    Failure(String),
}

/// A [`FeedBackend`] serving fixed bodies, for demos and tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    responses: Mutex<HashMap<String, Response>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryBackend {
    /// Create a backend with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn respond(&self, url: impl Into<String>, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), Response::Body(body.into()));
    }

    /// Fail every request to `url` with `message`.
    pub fn fail(&self, url: impl Into<String>, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), Response::Failure(message.into()));
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FeedBackend for MemoryBackend {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let response = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned();

        match response {
            Some(Response::Body(body)) => Ok(body),
            Some(Response::Failure(message)) => Err(FetchError::Transport {
                url: url.to_string(),
                message,
            }),
            None => Err(FetchError::Transport {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            }),
        }
    }
}
