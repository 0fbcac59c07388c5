//! Callback handles used in component args.
//!
//! ## Usage
//!
//! Store `on_confirm`, `on_cancel` and value-change handlers in `*Args`
//! structs without giving up `PartialEq` on the args.

use std::{fmt, sync::Arc};

/// Shared handle to a callable trait object.
///
/// Two slots are equal only when they point at the same allocation, so args
/// holding callbacks compare cheaply and never compare closure bodies.
struct Slot<F: ?Sized> {
    inner: Arc<F>,
}

impl<F: ?Sized> Slot<F> {
    fn new(inner: Arc<F>) -> Self {
        Self { inner }
    }

    fn shared(&self) -> Arc<F> {
        Arc::clone(&self.inner)
    }
}

impl<F: ?Sized> Clone for Slot<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: ?Sized> PartialEq for Slot<F> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Comparable handle for a `Fn()` such as a cancel handler.
#[derive(Clone)]
pub struct Callback {
    slot: Slot<dyn Fn() + Send + Sync>,
}

impl Callback {
    /// Wraps a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            slot: Slot::new(Arc::new(handler)),
        }
    }

    /// A callback that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Invokes the callback.
    pub fn call(&self) {
        let handler = self.slot.shared();
        handler();
    }
}

impl<F> From<F> for Callback
where
    F: Fn() + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl Default for Callback {
    fn default() -> Self {
        Self::noop()
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Comparable handle for a `Fn(T) -> R`, used for value handlers such as
/// `on_confirm(value)`.
pub struct CallbackWith<T, R = ()> {
    slot: Slot<dyn Fn(T) -> R + Send + Sync>,
}

impl<T, R> CallbackWith<T, R> {
    /// Wraps a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Self {
            slot: Slot::new(Arc::new(handler)),
        }
    }

    /// Invokes the callback with `value`.
    pub fn call(&self, value: T) -> R {
        let handler = self.slot.shared();
        handler(value)
    }
}

impl<T: 'static> Default for CallbackWith<T, ()> {
    fn default() -> Self {
        Self::new(|_| {})
    }
}

impl<T, R, F> From<F> for CallbackWith<T, R>
where
    F: Fn(T) -> R + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl<T, R> Clone for CallbackWith<T, R> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T, R> PartialEq for CallbackWith<T, R> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot
    }
}

impl<T, R> Eq for CallbackWith<T, R> {}

impl<T, R> fmt::Debug for CallbackWith<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackWith(..)")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::{Callback, CallbackWith};

    #[test]
    fn callbacks_compare_by_identity() {
        let a = Callback::new(|| {});
        let b = a.clone();
        let c = Callback::new(|| {});
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn callback_with_forwards_value() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = seen.clone();
        let on_value = CallbackWith::new(move |value: usize| {
            sink.store(value, Ordering::SeqCst);
        });
        on_value.call(42);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }
}
