//! Runtime primitives shared by storeline components.
//!
//! # State
//!
//! Components keep their mutable state behind a [`State`] handle that event
//! handlers can capture.
//!
//! ```
//! use storeline_ui::{CallbackWith, State};
//!
//! let selected = State::new(7u8);
//! let on_change = {
//!     let selected = selected.clone();
//!     CallbackWith::new(move |hour: u8| selected.set(hour))
//! };
//! on_change.call(9);
//! assert_eq!(selected.get(), 9);
//! ```
//!
//! # Context
//!
//! Ambient values such as the active theme travel through
//! [`provide_context`] / [`use_context`].
//!
//! # Lifecycle
//!
//! Recurring work runs on a [`Ticker`]. A screen registers its tickers and
//! subscriptions with a [`LifecycleScope`]; unmounting the scope cancels them.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod color;
pub mod context;
pub mod dp;
pub mod lifecycle;
pub mod logging;
pub mod observable;
pub mod prop;
pub mod state;
pub mod ticker;

pub use crate::{
    color::Color,
    context::{provide_context, try_use_context, use_context},
    dp::Dp,
    lifecycle::LifecycleScope,
    observable::{Observable, Subscription},
    prop::{Callback, CallbackWith},
    state::State,
    ticker::Ticker,
};
