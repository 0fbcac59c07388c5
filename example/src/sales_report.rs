use std::{sync::Arc, time::Duration};

use storeline_components::{
    DateRangeState, DateTimePickerArgs, DateTimePickerState, DateTimePickerView, PickerMode,
    RangeField, ThemeStore, date_time_picker,
};
use storeline_ui::{LifecycleScope, State, Ticker};
use tracing::{info, warn};

use crate::backend::{SalesSummary, StubBackend};

/// Report polling period.
pub const POLL_PERIOD: Duration = Duration::from_secs(15);
/// Shift clock period.
pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Sales report screen: a date range, the picker editing it, and a report
/// refreshed while the screen is mounted.
pub struct SalesReportScreen {
    range: State<DateRangeState>,
    editing: State<Option<RangeField>>,
    picker: State<DateTimePickerState>,
    summary: State<Option<SalesSummary>>,
    shift_seconds: State<u64>,
    theme: ThemeStore,
    scope: LifecycleScope,
}

impl SalesReportScreen {
    pub fn mount(range: DateRangeState, theme: ThemeStore, backend: Arc<StubBackend>) -> Self {
        let range = State::new(range);
        let summary = State::new(None);
        let shift_seconds = State::new(0u64);
        let mut scope = LifecycleScope::mount("sales-report");

        let poll = {
            let range = range.clone();
            let summary = summary.clone();
            Ticker::start_async("sales-poll", POLL_PERIOD, move |_| {
                let range = range.clone();
                let summary = summary.clone();
                let backend = backend.clone();
                async move {
                    match range.with(|r| r.resolve()) {
                        Ok(resolved) => {
                            let result = backend.sales(resolved.query()).await;
                            summary.set(Some(result));
                        }
                        Err(err) => warn!(error = %err, "skipping report refresh"),
                    }
                }
            })
        };
        scope.adopt_ticker(poll);

        let clock = shift_seconds.clone();
        scope.tick("shift-clock", CLOCK_PERIOD, move |tick| clock.set(tick));

        scope.adopt_subscription(theme.subscribe(|mode| info!(?mode, "theme changed")));

        let initial = range.with(|r| r.picker_value(RangeField::StartDate));
        Self {
            range,
            editing: State::new(None),
            picker: State::new(DateTimePickerState::new(initial)),
            summary,
            shift_seconds,
            theme,
            scope,
        }
    }

    pub fn range(&self) -> DateRangeState {
        self.range.get()
    }

    pub fn summary(&self) -> Option<SalesSummary> {
        self.summary.get()
    }

    pub fn shift_seconds(&self) -> u64 {
        self.shift_seconds.get()
    }

    pub fn open(&self, field: RangeField) {
        self.editing.set(Some(field));
    }

    /// Builds the picker for the field being edited.
    pub fn render(&self) -> Option<DateTimePickerView> {
        let args = self.picker_args();
        self.theme.provide(|| date_time_picker(args, &self.picker))
    }

    fn picker_args(&self) -> DateTimePickerArgs {
        let range = self.range.get();
        let field = self.editing.get();
        let shown = field.unwrap_or(RangeField::StartDate);
        let mode = if shown.is_time() {
            PickerMode::Time
        } else {
            PickerMode::Date
        };

        let mut args = DateTimePickerArgs::new(range.picker_value(shown))
            .mode(mode)
            .visible(field.is_some())
            .on_confirm({
                let range = self.range.clone();
                let editing = self.editing.clone();
                move |value| {
                    range.with_mut(|r| r.apply(shown, value));
                    editing.set(None);
                }
            })
            .on_cancel({
                let editing = self.editing.clone();
                move || editing.set(None)
            });
        if shown == RangeField::EndDate {
            args = args.minimum_date(range.picker_value(RangeField::StartDate));
        }
        if let Some(message) = range.validation_message() {
            args = args.validation_error(message);
        }
        args
    }

    pub fn unmount(&mut self) {
        self.scope.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use chrono::{NaiveDate, NaiveTime};
    use storeline_components::{
        DateRangeState, RangeField, ThemeMode, ThemeStore, date_time_picker::PickerContent,
    };

    use super::SalesReportScreen;
    use crate::backend::StubBackend;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
    }

    fn mount(backend: Arc<StubBackend>) -> SalesReportScreen {
        SalesReportScreen::mount(
            DateRangeState::whole_day(day()),
            ThemeStore::in_memory(ThemeMode::Light),
            backend,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_unmounted() {
        let backend = Arc::new(StubBackend::new(Duration::from_millis(100)));
        let mut screen = mount(backend.clone());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(backend.request_count(), 3);
        assert_eq!(screen.summary().map(|s| s.hours), Some(23));
        assert!(screen.shift_seconds() >= 30);

        screen.unmount();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_time_lands_in_range() {
        let screen = mount(Arc::new(StubBackend::new(Duration::ZERO)));
        assert!(screen.render().is_none());

        screen.open(RangeField::EndTime);
        let view = screen.render().expect("picker open");
        let PickerContent::Time(wheels) = &view.content else {
            panic!("expected time wheels");
        };
        wheels.hour.rows[14].on_tap.call();
        view.on_confirm.call();

        assert_eq!(
            screen.range().end_time(),
            NaiveTime::from_hms_opt(14, 59, 0).expect("valid time")
        );
        assert!(screen.render().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_leaves_range_alone() {
        let screen = mount(Arc::new(StubBackend::new(Duration::ZERO)));
        let before = screen.range();

        screen.open(RangeField::StartDate);
        let view = screen.render().expect("picker open");
        let PickerContent::Date(grid) = &view.content else {
            panic!("expected date grid");
        };
        if let Some(on_tap) = &grid.cells[5].on_tap {
            on_tap.call();
        }
        view.on_overlay_tap.call();

        assert_eq!(screen.range(), before);
        assert!(screen.render().is_none());
    }
}
