//! Fetch Actor: Dedicated thread for backend page requests.
//!
//! Requests run off the session thread; completions come back as
//! [`SessionEvent::PageFetched`]. There is no timeout: a request that never
//! returns keeps the cursor's in-flight guard set.

use super::messages::{deliver, FetchRequest, SessionEvent};
use crate::error::{FeedError, FetchError};
use crate::post::Page;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// How long the worker waits for a request before checking shutdown.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// The content backend serving feed pages.
pub trait FeedBackend: Send + Sync {
    /// GET `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] when the request fails.
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetch actor that performs page requests.
pub struct FetchActor {
    /// Handle to the fetch thread. Never joined: a backend call may not return.
    _handle: JoinHandle<()>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Request queue.
    requests: Sender<FetchRequest>,
}

impl FetchActor {
    /// Spawn the fetch actor thread.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Spawn`] if the OS refuses to start the thread.
    pub fn spawn(backend: Arc<dyn FeedBackend>, events: Sender<SessionEvent>) -> Result<Self, FeedError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let (requests, request_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("liveblog-fetch".to_string())
            .spawn(move || {
                Self::run_loop(backend.as_ref(), &request_rx, &events, &shutdown_clone);
            })
            .map_err(|source| FeedError::Spawn {
                name: "liveblog-fetch",
                source,
            })?;

        Ok(Self {
            _handle: handle,
            shutdown,
            requests,
        })
    }

    /// Queue a request.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Disconnected`] if the worker has exited.
    pub fn request(&self, request: FetchRequest) -> Result<(), FetchError> {
        self.requests.send(request).map_err(|_| FetchError::Disconnected)
    }

    /// Signal the fetch thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Main request loop.
    fn run_loop(
        backend: &dyn FeedBackend,
        requests: &Receiver<FetchRequest>,
        events: &Sender<SessionEvent>,
        shutdown: &AtomicBool,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            match requests.recv_timeout(IDLE_POLL) {
                Ok(FetchRequest { kind, url }) => {
                    debug!(?kind, %url, "fetching page");
                    let result = backend
                        .get(&url)
                        .and_then(|body| Page::from_json(&url, &body));
                    if !deliver(events, SessionEvent::PageFetched { kind, result }, IDLE_POLL, shutdown) {
                        // Session dropped or shutting down, exit
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    // No request, continue loop (will check shutdown)
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }
}

impl Drop for FetchActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
