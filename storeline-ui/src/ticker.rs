//! Scheduled ticks for polling and clock displays.
//!
//! ## Usage
//!
//! Start a [`Ticker`] for recurring work such as refreshing dashboard data
//! every 15 seconds or advancing a shift timer every second. The ticker stops
//! when cancelled or dropped; hand it to a
//! [`LifecycleScope`](crate::LifecycleScope) so it stops when the screen
//! unmounts.

use std::{future::Future, sync::OnceLock, time::Duration};

use tokio::{
    runtime::{Handle, Runtime},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, trace};

/// Shortest period a ticker accepts; shorter periods are raised to it.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn shared_runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("storeline-ticker")
            .enable_all()
            .build()
            .expect("failed to build the ticker runtime")
    })
}

/// Uses the caller's runtime when there is one.
fn spawn_handle() -> Handle {
    Handle::try_current().unwrap_or_else(|_| shared_runtime().handle().clone())
}

/// A recurring task that runs until cancelled or dropped.
///
/// The first tick fires immediately, later ticks every `period`. Ticks are
/// numbered from zero. A slow tick delays the next one instead of bursting.
pub struct Ticker {
    label: &'static str,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Starts a ticker that calls `on_tick` synchronously.
    pub fn start<F>(label: &'static str, period: Duration, on_tick: F) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        Self::start_async(label, period, move |tick: u64| {
            on_tick(tick);
            std::future::ready(())
        })
    }

    /// Starts a ticker whose tick is a future, e.g. a report request.
    ///
    /// The future is awaited inside the ticker task, so cancelling the ticker
    /// also drops a request that is still in flight.
    pub fn start_async<F, Fut>(label: &'static str, period: Duration, on_tick: F) -> Self
    where
        F: Fn(u64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let task = spawn_handle().spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick = 0u64;
            loop {
                interval.tick().await;
                trace!(ticker = label, tick, "tick");
                on_tick(tick).await;
                tick += 1;
            }
        });
        debug!(ticker = label, ?period, "ticker started");
        Self {
            label,
            period,
            task: Some(task),
        }
    }

    /// Label used in logs.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Effective tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the ticker is still scheduled.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the ticker. Calling it again is a no-op.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(ticker = self.label, "ticker cancelled");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("label", &self.label)
            .field("period", &self.period)
            .field("active", &self.is_active())
            .finish()
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

    use super::{MIN_PERIOD, Ticker};

    fn counter() -> (Arc<AtomicU64>, Arc<AtomicU64>) {
        let count = Arc::new(AtomicU64::new(0));
        (count.clone(), count)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_every_period_until_cancelled() {
        let (count, sink) = counter();
        let mut ticker = Ticker::start("poll", Duration::from_secs(15), move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        ticker.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_ticking() {
        let (count, sink) = counter();
        let ticker = Ticker::start("clock", Duration::from_secs(1), move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(500)).await;
        drop(ticker);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_in_flight_tick() {
        let (finished, sink) = counter();
        let mut ticker = Ticker::start_async("report", Duration::from_secs(15), move |_| {
            let sink = sink.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                sink.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(2)).await;
        ticker.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_raised() {
        let ticker = Ticker::start("fast", Duration::ZERO, |_| {});
        assert_eq!(ticker.period(), MIN_PERIOD);
        assert!(ticker.is_active());
    }
}
