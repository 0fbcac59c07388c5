//! Shared, lock-protected component state.

use std::{fmt, sync::Arc};

use parking_lot::RwLock;

/// Handle to state owned by a component and shared with its event handlers.
///
/// `State<T>` is cheap to clone and `Send + Sync`, so handlers can capture it.
/// Clones point at the same value.
///
/// # Examples
///
/// ```
/// use storeline_ui::State;
///
/// let count = State::new(0usize);
/// let handler_copy = count.clone();
/// handler_copy.with_mut(|c| *c += 1);
/// assert_eq!(count.get(), 1);
/// ```
pub struct State<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> State<T> {
    /// Creates a new state handle holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Execute a closure with a shared reference to the stored value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Execute a closure with a mutable reference to the stored value.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Get a cloned value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(Clone::clone)
    }

    /// Replace the stored value.
    pub fn set(&self, value: T) {
        self.with_mut(|slot| *slot = value);
    }

    /// Replace the stored value and return the previous one.
    pub fn replace(&self, value: T) -> T {
        self.with_mut(|slot| std::mem::replace(slot, value))
    }
}

impl<T: Default> Default for State<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Handles are equal when they share storage.
impl<T> PartialEq for State<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for State<T> {}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| f.debug_tuple("State").field(value).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::State;

    #[test]
    fn clones_share_storage() {
        let a = State::new(String::from("open"));
        let b = a.clone();
        b.set(String::from("closed"));
        assert_eq!(a.get(), "closed");
        assert_eq!(a, b);
        assert_ne!(a, State::new(String::from("closed")));
    }

    #[test]
    fn replace_returns_previous() {
        let state = State::new(3);
        assert_eq!(state.replace(7), 3);
        assert_eq!(state.get(), 7);
    }
}
