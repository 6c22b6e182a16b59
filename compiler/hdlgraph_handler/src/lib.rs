//! Sinks for the non-fatal diagnostics produced while analysing a project.
//!
//! Analysis code never prints or aborts on a recoverable problem; it hands
//! the problem to a [`Handler`] and keeps going. The caller picks the sink.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

/// Represents a trait responsible for receiving diagnostics.
///
/// Handlers must be shareable across threads since declarations of different
/// files may be extracted concurrently.
pub trait Handler<T>: Send + Sync {
    /// Receives a diagnostic and handles it.
    fn receive(&self, diagnostic: T);
}

/// Implements [`Handler`] by collecting every diagnostic, in the order
/// received.
#[derive(Debug)]
pub struct Storage<T> {
    diagnostics: Mutex<Vec<T>>,
}

impl<T> Storage<T> {
    /// Creates a new empty [`Storage`].
    #[must_use]
    pub const fn new() -> Self {
        Self { diagnostics: Mutex::new(Vec::new()) }
    }

    /// Consumes the [`Storage`] and returns the collected diagnostics.
    pub fn into_vec(self) -> Vec<T> { self.diagnostics.into_inner() }

    /// Returns the number of diagnostics collected so far.
    #[must_use]
    pub fn len(&self) -> usize { self.diagnostics.lock().len() }

    /// Returns `true` if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.diagnostics.lock().is_empty() }

    /// Takes every collected diagnostic out of the storage, leaving it empty.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    /// Moves every collected diagnostic into the given handler.
    pub fn propagate<U: From<T>, H: ?Sized + Handler<U>>(&self, handler: &H) {
        for diagnostic in self.take() {
            handler.receive(diagnostic.into());
        }
    }
}

impl<T> Default for Storage<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Send, U: Into<T>> Handler<U> for Storage<T> {
    fn receive(&self, diagnostic: U) {
        self.diagnostics.lock().push(diagnostic.into());
    }
}

/// Implements [`Handler`] by discarding every diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dummy;

impl<T> Handler<T> for Dummy {
    fn receive(&self, _: T) {}
}

/// Implements [`Handler`] by only counting the diagnostics received.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicUsize,
}

impl Counter {
    /// Creates a new [`Counter`] starting at zero.
    #[must_use]
    pub const fn new() -> Self { Self { count: AtomicUsize::new(0) } }

    /// Returns the number of diagnostics received.
    #[must_use]
    pub fn count(&self) -> usize { self.count.load(Ordering::Relaxed) }
}

impl<T> Handler<T> for Counter {
    fn receive(&self, _: T) { self.count.fetch_add(1, Ordering::Relaxed); }
}

/// Implements [`Handler`] by panicking on the first diagnostic. Useful in
/// tests that expect a clean input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Panic;

impl<T: std::fmt::Debug> Handler<T> for Panic {
    fn receive(&self, diagnostic: T) {
        panic!("unexpected diagnostic: {diagnostic:?}");
    }
}
