//! Mount/unmount scope for screens.
//!
//! Everything a mounted screen starts (tickers, subscriptions) is registered
//! with its [`LifecycleScope`]. Unmounting the scope, or dropping it, cancels
//! all of it.

use std::time::Duration;

use tracing::debug;

use crate::{observable::Subscription, ticker::Ticker};

/// Owns the recurring work of one mounted screen.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use storeline_ui::LifecycleScope;
///
/// let mut scope = LifecycleScope::mount("staff");
/// scope.tick("shift-timer", Duration::from_secs(1), |_| {});
/// assert_eq!(scope.active_tickers(), 1);
/// scope.unmount();
/// assert_eq!(scope.active_tickers(), 0);
/// ```
#[derive(Debug)]
pub struct LifecycleScope {
    name: String,
    tickers: Vec<Ticker>,
    subscriptions: Vec<Subscription>,
    mounted: bool,
}

impl LifecycleScope {
    /// Creates a mounted scope.
    pub fn mount(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!(scope = %name, "mounted");
        Self {
            name,
            tickers: Vec::new(),
            subscriptions: Vec::new(),
            mounted: true,
        }
    }

    /// Scope name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether [`unmount`](Self::unmount) has not run yet.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Takes ownership of a running ticker.
    ///
    /// Registering on an unmounted scope cancels the ticker right away.
    pub fn adopt_ticker(&mut self, mut ticker: Ticker) {
        if !self.mounted {
            ticker.cancel();
            return;
        }
        self.tickers.push(ticker);
    }

    /// Keeps a subscription alive until unmount.
    pub fn adopt_subscription(&mut self, subscription: Subscription) {
        if self.mounted {
            self.subscriptions.push(subscription);
        }
    }

    /// Starts a ticker owned by this scope.
    pub fn tick<F>(&mut self, label: &'static str, period: Duration, on_tick: F)
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        if self.mounted {
            self.adopt_ticker(Ticker::start(label, period, on_tick));
        }
    }

    /// Number of tickers still scheduled.
    pub fn active_tickers(&self) -> usize {
        self.tickers.iter().filter(|t| t.is_active()).count()
    }

    /// Cancels every ticker and drops every subscription.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        for ticker in &mut self.tickers {
            ticker.cancel();
        }
        let tickers = self.tickers.len();
        let subscriptions = self.subscriptions.len();
        self.tickers.clear();
        self.subscriptions.clear();
        debug!(scope = %self.name, tickers, subscriptions, "unmounted");
    }
}

impl Drop for LifecycleScope {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
        time::Duration,
    };

    use super::LifecycleScope;
    use crate::{observable::Observable, ticker::Ticker};

    #[tokio::test(start_paused = true)]
    async fn unmount_cancels_tickers_and_subscriptions() {
        let ticks = Arc::new(AtomicU64::new(0));
        let sink = ticks.clone();
        let mode = Observable::new(false);

        let mut scope = LifecycleScope::mount("dashboard");
        scope.tick("poll", Duration::from_secs(15), move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        scope.adopt_subscription(mode.subscribe(|_| {}));
        assert_eq!(mode.subscriber_count(), 1);

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        scope.unmount();
        assert!(!scope.is_mounted());
        assert_eq!(mode.subscriber_count(), 0);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn adopting_after_unmount_cancels() {
        let mut scope = LifecycleScope::mount("staff");
        scope.unmount();
        let ticks = Arc::new(AtomicU64::new(0));
        let sink = ticks.clone();
        scope.adopt_ticker(Ticker::start("late", Duration::from_secs(1), move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(scope.active_tickers(), 0);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_scope_unmounts() {
        let mode = Observable::new(0u8);
        {
            let mut scope = LifecycleScope::mount("settings");
            scope.adopt_subscription(mode.subscribe(|_| {}));
            assert_eq!(mode.subscriber_count(), 1);
        }
        assert_eq!(mode.subscriber_count(), 0);
    }
}
