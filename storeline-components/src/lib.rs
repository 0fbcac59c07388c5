//! Date and time picker components for the storeline back office.
//!
//! Every component is headless: a state type that owns the interaction
//! logic, a setter-style `*Args` struct, and a render function that turns
//! both into a view model with event handlers attached. The ambient
//! [`Theme`](theme::Theme) colors the views.
//!
//! - [`wheel_picker`]: looping hour/minute/AM-PM wheel.
//! - [`time_wheels`]: three wheels combined into a 24-hour time.
//! - [`date_grid`]: month calendar with bounds and quick picks.
//! - [`date_time_picker`]: the modal hosting either of them.
//! - [`date_range`]: screen-side start/end range and report queries.
//! - [`theme`]: seeded palettes and the persisted light/dark store.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod calendar;
pub mod date_grid;
pub mod date_range;
pub mod date_time_picker;
pub mod theme;
pub mod time_wheels;
pub mod wheel_picker;

pub use crate::{
    calendar::{CalendarError, Clock, DateBounds, PickerValue, SystemClock, YearMonth},
    date_grid::{DateGridArgs, DateGridState, QuickPick, date_grid},
    date_range::{DateRangeState, RangeError, RangeField, ReportQuery, ResolvedRange},
    date_time_picker::{
        DateTimePickerArgs, DateTimePickerState, DateTimePickerView, PickerMode,
        date_time_picker,
    },
    theme::{Theme, ThemeMode, ThemeStore, ThemeStoreError},
    time_wheels::{TimeWheelsArgs, TimeWheelsState, time_wheels},
    wheel_picker::{
        DayPeriod, PickerError, WheelKind, WheelPickerArgs, WheelPickerState, WheelValue,
        wheel_picker,
    },
};
