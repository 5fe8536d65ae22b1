//! Shared state between the control loop and outside observers.
//!
//! The loop is the only writer of the status snapshot; any thread may read
//! it or raise the cancel flag through a [`NavHandle`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::navigation::StatusView;

/// Snapshot storage plus the cooperative cancel flag.
#[derive(Debug, Default)]
pub(crate) struct SharedNav {
    view: RwLock<StatusView>,
    cancel: AtomicBool,
}

impl SharedNav {
    /// Current snapshot (cheap clone).
    pub fn snapshot(&self) -> StatusView {
        self.view.read().clone()
    }

    /// Replace the snapshot (called once per loop iteration).
    pub fn publish(&self, view: StatusView) {
        *self.view.write() = view;
    }

    /// Raise the cancel flag; observed at the top of the next iteration.
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Drop a stale cancel request. Each navigation call starts fresh; a
    /// cancel raised while no call is active does not poison the next one.
    pub fn clear_cancel(&self) {
        self.cancel.store(false, Ordering::Release);
    }
}

/// Cloneable handle for watching or cancelling a navigation from outside
/// the control loop.
#[derive(Clone, Debug)]
pub struct NavHandle {
    inner: Arc<SharedNav>,
}

impl NavHandle {
    pub(crate) fn new(inner: Arc<SharedNav>) -> Self {
        Self { inner }
    }

    /// Point-in-time status snapshot.
    pub fn status(&self) -> StatusView {
        self.inner.snapshot()
    }

    /// Request cooperative cancellation of the active navigation. The loop
    /// still issues its final stop command before returning.
    pub fn cancel(&self) {
        self.inner.request_cancel();
    }

    /// Whether a cancel has been requested and not yet consumed.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel_requested()
    }
}
