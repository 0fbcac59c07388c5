//! Hour, minute and AM/PM wheels combined into a 24-hour time.

use derive_setters::Setters;
use storeline_ui::{CallbackWith, Dp, State};

use crate::wheel_picker::{
    DEFAULT_ROW_HEIGHT, DayPeriod, WheelKind, WheelPickerArgs, WheelPickerState, WheelPickerView,
    WheelValue, wheel_picker,
};

/// Splits a 24-hour clock hour into a 12-hour hour (1-12) and period.
pub fn to_twelve_hour(hour24: u32) -> (u32, DayPeriod) {
    let hour = hour24 % 12;
    let hour = if hour == 0 { 12 } else { hour };
    (hour, DayPeriod::of_hour(hour24 % 24))
}

/// Joins a 12-hour hour (1-12) and period into a 24-hour clock hour.
pub fn to_twenty_four_hour(hour12: u32, period: DayPeriod) -> u32 {
    let base = hour12 % 12;
    match period {
        DayPeriod::Am => base,
        DayPeriod::Pm => base + 12,
    }
}

/// The three wheels of the time view.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWheelsState {
    hour: State<WheelPickerState>,
    minute: State<WheelPickerState>,
    period: State<WheelPickerState>,
}

impl TimeWheelsState {
    /// Creates wheels showing `hour24:minute`.
    pub fn new(hour24: u32, minute: u32) -> Self {
        let (hour12, period) = to_twelve_hour(hour24);
        Self {
            hour: State::new(WheelPickerState::at_index(
                WheelKind::Hour,
                hour12 as usize % 12,
            )),
            minute: State::new(WheelPickerState::at_index(
                WheelKind::Minute,
                minute as usize % 60,
            )),
            period: State::new(WheelPickerState::at_index(
                WheelKind::Period,
                period_index(period),
            )),
        }
    }

    /// Hour wheel.
    pub fn hour_wheel(&self) -> &State<WheelPickerState> {
        &self.hour
    }

    /// Minute wheel.
    pub fn minute_wheel(&self) -> &State<WheelPickerState> {
        &self.minute
    }

    /// AM/PM wheel.
    pub fn period_wheel(&self) -> &State<WheelPickerState> {
        &self.period
    }

    /// Moves every wheel to `hour24:minute`. Out-of-range parts leave their
    /// wheel untouched.
    pub fn sync(&self, hour24: u32, minute: u32) {
        let (hour12, period) = to_twelve_hour(hour24);
        self.hour
            .with_mut(|s| s.sync_selected(WheelValue::Hour(hour12)));
        self.minute
            .with_mut(|s| s.sync_selected(WheelValue::Minute(minute)));
        self.period
            .with_mut(|s| s.sync_selected(WheelValue::Period(period)));
    }

    /// Selected hour on the 24-hour clock.
    pub fn hour24(&self) -> u32 {
        let hour = self.hour.with(|s| s.selected());
        let period = self.period.with(|s| s.selected());
        match (hour, period) {
            (WheelValue::Hour(hour12), WheelValue::Period(period)) => {
                to_twenty_four_hour(hour12, period)
            }
            _ => 0,
        }
    }

    /// Selected minute.
    pub fn minute(&self) -> u32 {
        match self.minute.with(|s| s.selected()) {
            WheelValue::Minute(minute) => minute,
            _ => 0,
        }
    }
}

fn period_index(period: DayPeriod) -> usize {
    match period {
        DayPeriod::Am => 0,
        DayPeriod::Pm => 1,
    }
}

/// Arguments for [`time_wheels`].
#[derive(Clone, PartialEq, Setters)]
pub struct TimeWheelsArgs {
    /// Height of one wheel row.
    pub row_height: Dp,
    /// Called with `(hour24, minute)` whenever any wheel changes value.
    #[setters(skip)]
    pub on_change: CallbackWith<(u32, u32)>,
}

impl Default for TimeWheelsArgs {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            on_change: CallbackWith::default(),
        }
    }
}

impl TimeWheelsArgs {
    /// Sets the time-change handler.
    pub fn on_change<F>(mut self, on_change: F) -> Self
    where
        F: Fn((u32, u32)) + Send + Sync + 'static,
    {
        self.on_change = CallbackWith::new(on_change);
        self
    }
}

/// Render model produced by [`time_wheels`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWheelsView {
    /// Hour wheel.
    pub hour: WheelPickerView,
    /// Minute wheel.
    pub minute: WheelPickerView,
    /// AM/PM wheel.
    pub period: WheelPickerView,
}

/// # time_wheels
///
/// Builds the hour, minute and AM/PM wheels. Any wheel change reports the
/// combined 24-hour time.
pub fn time_wheels(args: TimeWheelsArgs, state: &TimeWheelsState) -> TimeWheelsView {
    let wheel_args = {
        let state = state.clone();
        let on_change = args.on_change.clone();
        WheelPickerArgs::default()
            .row_height(args.row_height)
            .on_change(move |_| on_change.call((state.hour24(), state.minute())))
    };

    TimeWheelsView {
        hour: wheel_picker(wheel_args.clone(), &state.hour),
        minute: wheel_picker(wheel_args.clone(), &state.minute),
        period: wheel_picker(wheel_args, &state.period),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{TimeWheelsArgs, TimeWheelsState, time_wheels, to_twelve_hour, to_twenty_four_hour};
    use crate::wheel_picker::{DayPeriod, WheelValue};

    #[test]
    fn twelve_hour_conversion_round_trips_every_hour() {
        assert_eq!(to_twelve_hour(0), (12, DayPeriod::Am));
        assert_eq!(to_twelve_hour(12), (12, DayPeriod::Pm));
        assert_eq!(to_twelve_hour(13), (1, DayPeriod::Pm));
        assert_eq!(to_twelve_hour(23), (11, DayPeriod::Pm));
        for hour in 0..24 {
            let (hour12, period) = to_twelve_hour(hour);
            assert_eq!(to_twenty_four_hour(hour12, period), hour);
        }
    }

    #[test]
    fn wheels_start_at_time() {
        let state = TimeWheelsState::new(21, 5);
        assert_eq!(state.hour_wheel().with(|s| s.selected()), WheelValue::Hour(9));
        assert_eq!(
            state.period_wheel().with(|s| s.selected()),
            WheelValue::Period(DayPeriod::Pm)
        );
        assert_eq!((state.hour24(), state.minute()), (21, 5));

        state.sync(0, 59);
        assert_eq!((state.hour24(), state.minute()), (0, 59));
        assert_eq!(state.hour_wheel().with(|s| s.center_row()), 12.0);
    }

    #[test]
    fn wheel_changes_report_combined_time() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let state = TimeWheelsState::new(9, 30);
        let view = time_wheels(
            TimeWheelsArgs::default().on_change(move |time| sink.lock().push(time)),
            &state,
        );

        view.period.rows[3].on_tap.call();
        view.hour.rows[12].on_tap.call();
        view.minute.rows[75].on_tap.call();
        assert_eq!(*seen.lock(), vec![(21, 30), (12, 30), (12, 15)]);
    }
}
