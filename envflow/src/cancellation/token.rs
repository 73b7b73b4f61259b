//! Cancellation token carried by an [`EnvContext`](crate::context::EnvContext).

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::warn;

/// A callback invoked when a token is cancelled.
pub type CancelCallback = Box<dyn Fn() + Send + Sync>;

/// A token for cooperative cancellation.
///
/// Cancelling is idempotent and the first reason wins. Nothing in envflow
/// polls the token on its own; steps that can be interrupted check it
/// through the context.
#[derive(Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
    reason: RwLock<Option<String>>,
    callbacks: RwLock<Vec<CancelCallback>>,
    children: RwLock<Vec<Weak<Self>>>,
}

impl CancellationToken {
    /// Creates a new, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that is cancelled together with `self`.
    ///
    /// Cancelling the child leaves the parent untouched. The parent only
    /// holds a weak link, and links to dropped children are pruned on the
    /// next call.
    #[must_use]
    pub fn child(&self) -> Arc<Self> {
        let child = Arc::new(Self::new());

        let mut children = self.children.write();
        // cancel() may have won the race; the reason is already in place
        if self.is_cancelled() {
            drop(children);
            child.cancel(self.reason().unwrap_or_default());
        } else {
            children.retain(|c| c.strong_count() > 0);
            children.push(Arc::downgrade(&child));
        }

        child
    }

    /// Requests cancellation.
    ///
    /// Callbacks run synchronously on the first call, then live children are
    /// cancelled with the same reason. A panicking callback is logged and does
    /// not stop the others.
    pub fn cancel(&self, reason: impl Into<String>) {
        let reason = reason.into();
        {
            let mut slot = self.reason.write();
            if self
                .cancelled
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return;
            }
            *slot = Some(reason.clone());
        }

        let callbacks = std::mem::take(&mut *self.callbacks.write());
        for callback in &callbacks {
            invoke(callback.as_ref());
        }

        let children = std::mem::take(&mut *self.children.write());
        for child in children.iter().filter_map(Weak::upgrade) {
            child.cancel(reason.clone());
        }
    }

    /// Registers a callback for cancellation.
    ///
    /// Runs immediately when the token is already cancelled.
    pub fn on_cancel<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.is_cancelled() {
            invoke(&callback);
            return;
        }

        let mut callbacks = self.callbacks.write();
        // cancel() may have won the race between the check and the lock
        if self.is_cancelled() {
            drop(callbacks);
            invoke(&callback);
        } else {
            callbacks.push(Box::new(callback));
        }
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns the cancellation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.reason.read().clone()
    }
}

fn invoke(callback: &(dyn Fn() + Send + Sync)) {
    if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(callback)) {
        warn!("Cancellation callback panicked: {:?}", e);
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .field("children", &self.children.read().len())
            .finish()
    }
}
