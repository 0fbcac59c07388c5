//! Values with explicit subscriber notification.
//!
//! ## Usage
//!
//! Hold process-wide settings such as the theme mode in an [`Observable`] and
//! let each screen subscribe for the time it is mounted.

use std::{
    fmt,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::RwLock;

use crate::prop::CallbackWith;

struct Inner<T> {
    value: RwLock<T>,
    subscribers: RwLock<Vec<(u64, CallbackWith<T>)>>,
    next_id: AtomicU64,
}

/// A shared value that notifies subscribers whenever it changes.
///
/// Subscribers are called outside of any lock, so a subscriber may read the
/// observable again.
pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Observable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates an observable holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Stores `value` and notifies subscribers if it differs from the current
    /// one. Returns whether a change happened.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.write();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }
        self.notify(value);
        true
    }

    /// Registers `on_change`; it runs on every change until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, on_change: impl Fn(T) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .write()
            .push((id, CallbackWith::new(on_change)));
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.write().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    fn notify(&self, value: T) {
        let subscribers: Vec<CallbackWith<T>> = self
            .inner
            .subscribers
            .read()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in subscribers {
            callback.call(value.clone());
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.read())
            .field("subscribers", &self.inner.subscribers.read().len())
            .finish()
    }
}

/// Keeps a subscriber registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unsubscribes now.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
