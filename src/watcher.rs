//! The seam between the registrar and whatever evaluates media queries.

use crate::{condition::Condition, error::Error};

/// Something that can evaluate media queries and report when their result
/// changes: a browser window, or a [`Viewport`](crate::viewport::Viewport)
/// driven by the host.
pub trait MediaEnvironment {
    /// Start watching `condition`.
    fn watch(&self, condition: &Condition) -> Result<Box<dyn MediaQueryWatcher>, Error>;
}

/// A live media query.
pub trait MediaQueryWatcher {
    /// Whether the query matches right now.
    fn currently_matches(&self) -> bool;

    /// Register `callback` to receive the new match state every time it
    /// changes. Callbacks are delivered on the UI thread, one at a time.
    ///
    /// An error means the environment refused the listener and the flag
    /// would never update.
    fn on_change(&mut self, callback: Box<dyn Fn(bool)>) -> Result<(), Error>;

    /// Stop delivering notifications. Calling it more than once is a no-op.
    fn release(&mut self);
}

/// Owns the watchers of one installation and releases them when dropped.
#[derive(Default)]
pub struct Subscriptions {
    watchers: Vec<Box<dyn MediaQueryWatcher>>,
}

impl Subscriptions {
    pub fn push(&mut self, watcher: Box<dyn MediaQueryWatcher>) {
        self.watchers.push(watcher);
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn MediaQueryWatcher>> {
        self.watchers.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    pub fn release(&mut self) {
        for watcher in &mut self.watchers {
            watcher.release();
        }
        self.watchers.clear();
    }

    /// Keep every watcher alive for the rest of the process.
    pub fn leak(self) {
        std::mem::forget(self);
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("watchers", &self.watchers.len())
            .finish()
    }
}
