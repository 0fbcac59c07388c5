//! Ambient context values shared with descendants while a view is built.
//!
//! Components read the active theme and similar values through
//! [`use_context`] instead of threading them through every args struct.

use std::{
    any::{Any, TypeId},
    cell::RefCell,
    sync::Arc,
};

use im::HashMap;

type ContextMap = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ContextMap>> = RefCell::new(vec![ContextMap::new()]);
}

fn push_context_layer(type_id: TypeId, value: Arc<dyn Any + Send + Sync>) {
    CONTEXT_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let mut next = stack.last().cloned().unwrap_or_else(ContextMap::new);
        next.insert(type_id, value);
        stack.push(next);
    });
}

fn pop_context_layer() {
    CONTEXT_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let popped = stack.pop();
        debug_assert!(popped.is_some(), "Context stack underflow");
        if stack.is_empty() {
            stack.push(ContextMap::new());
        }
    });
}

/// Provides a typed context value for the duration of `f`.
///
/// Nested providers of the same type shadow outer ones; the outer value is
/// visible again once `f` returns, even if it panics.
///
/// # Examples
///
/// ```
/// use storeline_ui::{provide_context, use_context};
///
/// #[derive(Default)]
/// struct Locale(&'static str);
///
/// provide_context(Locale("en-US"), || {
///     assert_eq!(use_context::<Locale>().0, "en-US");
/// });
/// assert_eq!(use_context::<Locale>().0, "");
/// ```
pub fn provide_context<T, F, R>(value: T, f: F) -> R
where
    T: Send + Sync + 'static,
    F: FnOnce() -> R,
{
    push_context_layer(TypeId::of::<T>(), Arc::new(value));
    struct ContextScopeGuard;
    impl Drop for ContextScopeGuard {
        fn drop(&mut self) {
            pop_context_layer();
        }
    }
    let guard = ContextScopeGuard;
    let result = f();
    drop(guard);
    result
}

/// Reads a typed context value, returning `None` when nothing provides it.
pub fn try_use_context<T>() -> Option<Arc<T>>
where
    T: Send + Sync + 'static,
{
    CONTEXT_STACK.with(|stack| {
        let stack = stack.borrow();
        let value = stack.last()?.get(&TypeId::of::<T>())?.clone();
        Arc::downcast::<T>(value).ok()
    })
}

/// Reads a typed context value, falling back to `T::default()` when missing.
pub fn use_context<T>() -> Arc<T>
where
    T: Default + Send + Sync + 'static,
{
    try_use_context::<T>().unwrap_or_else(|| Arc::new(T::default()))
}

#[cfg(test)]
mod tests {
    use super::{provide_context, try_use_context, use_context};

    #[derive(Debug, Default, PartialEq)]
    struct Accent(u32);

    #[test]
    fn inner_provider_shadows_outer() {
        provide_context(Accent(1), || {
            assert_eq!(*use_context::<Accent>(), Accent(1));
            provide_context(Accent(2), || {
                assert_eq!(*use_context::<Accent>(), Accent(2));
            });
            assert_eq!(*use_context::<Accent>(), Accent(1));
        });
        assert!(try_use_context::<Accent>().is_none());
    }

    #[test]
    fn missing_context_uses_default() {
        assert_eq!(*use_context::<Accent>(), Accent(0));
    }
}
