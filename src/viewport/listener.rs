//! Viewport listener: The host's handle for reporting scroll and resize.

use crate::actor::SessionEvent;
use crate::layout::Viewport;
use crossbeam_channel::{Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle that forwards scroll and resize notifications to a session.
///
/// Once the session is torn down the listener is detached and every call
/// becomes a no-op, so stale host callbacks cannot reach a dead session.
#[derive(Debug, Clone)]
pub struct ViewportListener {
    sender: Sender<SessionEvent>,
    attached: Arc<AtomicBool>,
}

impl ViewportListener {
    pub(crate) const fn new(sender: Sender<SessionEvent>, attached: Arc<AtomicBool>) -> Self {
        Self { sender, attached }
    }

    /// Report a scroll. Returns `false` if the notification was not queued.
    pub fn scrolled(&self) -> bool {
        self.notify(SessionEvent::Scroll)
    }

    /// Report a viewport resize. Returns `false` if the notification was not queued.
    pub fn resized(&self, viewport: Viewport) -> bool {
        self.notify(SessionEvent::Resize(viewport))
    }

    /// Whether the owning session is still alive.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    fn notify(&self, event: SessionEvent) -> bool {
        if !self.is_attached() {
            return false;
        }
        // Scroll bursts coalesce: a full queue already has work pending.
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn test_listener_detach() {
        let (tx, rx) = bounded(4);
        let attached = Arc::new(AtomicBool::new(true));
        let listener = ViewportListener::new(tx, attached.clone());

        assert!(listener.scrolled());
        assert!(matches!(rx.try_recv(), Ok(SessionEvent::Scroll)));

        attached.store(false, Ordering::Release);
        assert!(!listener.is_attached());
        assert!(!listener.resized(Viewport::new(10, 10)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_listener_coalesces_when_full() {
        let (tx, _rx) = bounded(1);
        let listener = ViewportListener::new(tx, Arc::new(AtomicBool::new(true)));
        assert!(listener.scrolled());
        assert!(!listener.scrolled());
    }
}
