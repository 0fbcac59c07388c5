//! Month calendar grid with bounds and quick picks.
//!
//! ## Usage
//!
//! Shown in date mode of the date/time picker. Tapping a day changes the
//! date and keeps the time of day of the tracked value.

use std::{fmt, sync::Arc};

use chrono::{NaiveDate, Weekday};
use derive_setters::Setters;
use storeline_ui::{Callback, CallbackWith, Color, State, use_context};
use tracing::debug;

use crate::{
    calendar::{
        Clock, DateBounds, PickerValue, YearMonth, format_headline, system_clock,
        weekday_sequence,
    },
    theme::Theme,
};

/// Number of columns in the grid.
pub const DAYS_PER_WEEK: usize = 7;

/// Shortcuts offered under the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickPick {
    /// Now.
    Today,
    /// Now minus one day.
    Yesterday,
    /// Now minus seven days.
    LastWeek,
}

impl QuickPick {
    /// All shortcuts in display order.
    pub const ALL: [QuickPick; 3] = [Self::Today, Self::Yesterday, Self::LastWeek];

    /// Whole days subtracted from now.
    pub fn days_back(&self) -> u64 {
        match self {
            Self::Today => 0,
            Self::Yesterday => 1,
            Self::LastWeek => 7,
        }
    }

    /// Button text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::LastWeek => "Last Week",
        }
    }
}

/// Visual style of a day cell. `Selected` wins over `Today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayStyle {
    /// Plain day.
    Normal,
    /// Today's date, not selected.
    Today,
    /// The tracked date.
    Selected,
}

/// One slot of the 7-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    /// Empty slot before day 1.
    Placeholder,
    /// A day of the displayed month.
    Day {
        /// The date.
        date: NaiveDate,
        /// Day of month.
        day: u32,
        /// Whether the day violates a bound.
        disabled: bool,
        /// Visual style.
        style: DayStyle,
    },
}

/// Displayed month, tracked value and bounds of a date grid.
pub struct DateGridState {
    selected: PickerValue,
    displayed: YearMonth,
    bounds: DateBounds,
    clock: Arc<dyn Clock>,
}

impl DateGridState {
    /// Creates a grid showing the month of `selected`.
    pub fn new(selected: PickerValue, bounds: DateBounds) -> Self {
        Self {
            selected,
            displayed: selected.year_month(),
            bounds,
            clock: system_clock(),
        }
    }

    /// Replaces the clock used for quick picks and today highlighting.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Tracked value.
    pub fn selected(&self) -> PickerValue {
        self.selected
    }

    /// Month on screen.
    pub fn displayed_month(&self) -> YearMonth {
        self.displayed
    }

    /// Active bounds.
    pub fn bounds(&self) -> DateBounds {
        self.bounds
    }

    /// Replaces the bounds. The tracked value is not touched.
    pub fn set_bounds(&mut self, bounds: DateBounds) {
        self.bounds = bounds;
    }

    /// Today's date according to the grid's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Tracks `value` and shows its month.
    pub fn reset(&mut self, value: PickerValue) {
        self.selected = value;
        self.displayed = value.year_month();
    }

    /// Tracks `value` without moving the displayed month.
    pub fn track(&mut self, value: PickerValue) {
        self.selected = value;
    }

    /// Shows the previous month.
    pub fn previous_month(&mut self) {
        self.displayed = self.displayed.previous();
        debug!(month = %self.displayed.title(), "date grid moved back");
    }

    /// Shows the next month.
    pub fn next_month(&mut self) {
        self.displayed = self.displayed.next();
        debug!(month = %self.displayed.title(), "date grid moved forward");
    }

    /// Selects `day` of the displayed month, keeping the time of day.
    ///
    /// Returns `false` without changing anything when the day does not exist
    /// or violates a bound.
    pub fn select_day(&mut self, day: u32) -> bool {
        let Some(date) = self.displayed.date(day) else {
            return false;
        };
        if !self.bounds.contains(date) {
            debug!(%date, "day outside bounds ignored");
            return false;
        }
        match self
            .selected
            .on_day(self.displayed.year(), self.displayed.month0(), day)
        {
            Ok(value) => {
                self.selected = value;
                debug!(%value, "day selected");
                true
            }
            Err(_) => false,
        }
    }

    /// Applies a shortcut. The result keeps now's time of day; on success
    /// the grid shows the month of the new date.
    pub fn quick_select(&mut self, pick: QuickPick) -> bool {
        let Some(candidate) = self.quick_pick_value(pick) else {
            return false;
        };
        if !self.bounds.admits(candidate) {
            debug!(?pick, %candidate, "quick pick outside bounds ignored");
            return false;
        }
        self.selected = candidate;
        self.displayed = candidate.year_month();
        debug!(?pick, value = %candidate, "quick pick applied");
        true
    }

    /// Value a shortcut would select.
    pub fn quick_pick_value(&self, pick: QuickPick) -> Option<PickerValue> {
        self.clock.now().days_before(pick.days_back())
    }

    /// Grid cells: leading placeholders, then every day of the month.
    pub fn cells(&self, week_start: Weekday) -> Vec<GridCell> {
        let month = self.displayed;
        let today = self.today();
        let selected = self.selected.date();
        let blanks = month.leading_blanks(week_start) as usize;

        let mut cells = vec![GridCell::Placeholder; blanks];
        cells.extend((1..=month.days_in_month()).filter_map(|day| {
            let date = month.date(day)?;
            let style = if date == selected {
                DayStyle::Selected
            } else if date == today {
                DayStyle::Today
            } else {
                DayStyle::Normal
            };
            Some(GridCell::Day {
                date,
                day,
                disabled: !self.bounds.contains(date),
                style,
            })
        }));
        cells
    }
}

impl fmt::Debug for DateGridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateGridState")
            .field("selected", &self.selected)
            .field("displayed", &self.displayed)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// Arguments for [`date_grid`].
#[derive(Clone, PartialEq, Setters)]
pub struct DateGridArgs {
    /// First column of the grid.
    pub week_start: Weekday,
    /// Whether the quick-pick row is shown.
    pub show_quick_picks: bool,
    /// Called with the new value after a day or shortcut is accepted.
    #[setters(skip)]
    pub on_select: CallbackWith<PickerValue>,
}

impl Default for DateGridArgs {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            show_quick_picks: true,
            on_select: CallbackWith::default(),
        }
    }
}

impl DateGridArgs {
    /// Sets the selection handler.
    pub fn on_select<F>(mut self, on_select: F) -> Self
    where
        F: Fn(PickerValue) + Send + Sync + 'static,
    {
        self.on_select = CallbackWith::new(on_select);
        self
    }

    /// Sets the selection handler using a shared callback.
    pub fn on_select_shared(mut self, on_select: impl Into<CallbackWith<PickerValue>>) -> Self {
        self.on_select = on_select.into();
        self
    }
}

/// Rendered day or placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCellView {
    /// Underlying cell.
    pub cell: GridCell,
    /// Day number, empty for placeholders.
    pub label: String,
    /// Text color.
    pub text_color: Color,
    /// Filled background, if any.
    pub container: Option<Color>,
    /// Ring color, if any.
    pub border: Option<Color>,
    /// Tap handler; `None` for placeholders and disabled days.
    pub on_tap: Option<Callback>,
}

/// Rendered quick-pick button.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickPickView {
    /// Shortcut.
    pub pick: QuickPick,
    /// Button text.
    pub label: &'static str,
    /// Whether the shortcut's date satisfies the bounds.
    pub enabled: bool,
    /// Tap handler.
    pub on_tap: Callback,
}

/// Render model produced by [`date_grid`].
#[derive(Debug, Clone, PartialEq)]
pub struct DateGridView {
    /// Month title, e.g. "January 2025".
    pub title: String,
    /// Selected date, e.g. "Wed, Jan 1, 2025".
    pub headline: String,
    /// Weekday header labels in column order.
    pub weekdays: Vec<&'static str>,
    /// Cells in row-major order.
    pub cells: Vec<DayCellView>,
    /// Previous-month button.
    pub on_previous: Callback,
    /// Next-month button.
    pub on_next: Callback,
    /// Shortcut buttons; empty when hidden.
    pub quick_picks: Vec<QuickPickView>,
}

/// # date_grid
///
/// Builds the render model of a month calendar.
///
/// ## Parameters
///
/// - `args` — week start and selection handler; see [`DateGridArgs`].
/// - `state` — displayed month, tracked value and bounds; see
///   [`DateGridState`].
///
/// ## Examples
///
/// ```
/// use storeline_components::{
///     calendar::{DateBounds, PickerValue},
///     date_grid::{DateGridArgs, DateGridState, date_grid},
/// };
/// use storeline_ui::State;
///
/// let value = PickerValue::new(2025, 0, 15, 9, 30).unwrap();
/// let state = State::new(DateGridState::new(value, DateBounds::unbounded()));
/// let view = date_grid(DateGridArgs::default(), &state);
/// assert_eq!(view.title, "January 2025");
/// assert_eq!(view.cells.len(), 3 + 31);
/// ```
pub fn date_grid(args: DateGridArgs, state: &State<DateGridState>) -> DateGridView {
    let theme = use_context::<Theme>();
    let (title, headline, cells, quick_picks) = state.with(|s| {
        let picks: Vec<(QuickPick, bool)> = QuickPick::ALL
            .iter()
            .map(|pick| {
                let enabled = s
                    .quick_pick_value(*pick)
                    .is_some_and(|value| s.bounds().admits(value));
                (*pick, enabled)
            })
            .collect();
        (
            s.displayed_month().title(),
            format_headline(s.selected()),
            s.cells(args.week_start),
            picks,
        )
    });

    let cells = cells
        .into_iter()
        .map(|cell| cell_view(cell, &theme, state, &args.on_select))
        .collect();

    let quick_picks = if args.show_quick_picks {
        quick_picks
            .into_iter()
            .map(|(pick, enabled)| {
                let state = state.clone();
                let on_select = args.on_select.clone();
                QuickPickView {
                    pick,
                    label: pick.label(),
                    enabled,
                    on_tap: Callback::new(move || {
                        let accepted = state.with_mut(|s| s.quick_select(pick).then(|| s.selected()));
                        if let Some(value) = accepted {
                            on_select.call(value);
                        }
                    }),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    let on_previous = {
        let state = state.clone();
        Callback::new(move || state.with_mut(|s| s.previous_month()))
    };
    let on_next = {
        let state = state.clone();
        Callback::new(move || state.with_mut(|s| s.next_month()))
    };

    DateGridView {
        title,
        headline,
        weekdays: weekday_sequence(args.week_start)
            .into_iter()
            .map(weekday_short_label)
            .collect(),
        cells,
        on_previous,
        on_next,
        quick_picks,
    }
}

fn cell_view(
    cell: GridCell,
    theme: &Theme,
    state: &State<DateGridState>,
    on_select: &CallbackWith<PickerValue>,
) -> DayCellView {
    let GridCell::Day {
        day,
        disabled,
        style,
        ..
    } = cell
    else {
        return DayCellView {
            cell,
            label: String::new(),
            text_color: Color::TRANSPARENT,
            container: None,
            border: None,
            on_tap: None,
        };
    };

    let text_color = match (style, disabled) {
        (DayStyle::Selected, _) => theme.on_primary,
        (_, true) => theme.text_secondary.with_alpha(theme.disabled_alpha),
        _ => theme.text_primary,
    };
    let container = (style == DayStyle::Selected).then_some(theme.primary);
    let border = (style == DayStyle::Today).then_some(theme.primary);
    let on_tap = (!disabled).then(|| {
        let state = state.clone();
        let on_select = on_select.clone();
        Callback::new(move || {
            let accepted = state.with_mut(|s| s.select_day(day).then(|| s.selected()));
            if let Some(value) = accepted {
                on_select.call(value);
            }
        })
    });

    DayCellView {
        cell,
        label: day.to_string(),
        text_color,
        container,
        border,
        on_tap,
    }
}

fn weekday_short_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, Weekday};
    use parking_lot::Mutex;
    use storeline_ui::State;

    use super::{DateGridArgs, DateGridState, DayStyle, GridCell, QuickPick, date_grid};
    use crate::calendar::{DateBounds, FixedClock, PickerValue};

    fn value(y: i32, m0: u32, d: u32, h: u32, min: u32) -> PickerValue {
        PickerValue::new(y, m0, d, h, min).expect("valid value")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn grid(selected: PickerValue, bounds: DateBounds) -> DateGridState {
        DateGridState::new(selected, bounds)
            .with_clock(Arc::new(FixedClock(value(2025, 2, 10, 14, 20))))
    }

    fn day_numbers(cells: &[GridCell]) -> Vec<u32> {
        cells
            .iter()
            .filter_map(|cell| match cell {
                GridCell::Day { day, .. } => Some(*day),
                GridCell::Placeholder => None,
            })
            .collect()
    }

    #[test]
    fn december_to_january_layout() {
        let mut state = grid(value(2024, 11, 20, 8, 0), DateBounds::unbounded());
        state.next_month();
        let month = state.displayed_month();
        assert_eq!((month.year(), month.month0()), (2025, 0));

        let cells = state.cells(Weekday::Sun);
        assert_eq!(cells[..3], [GridCell::Placeholder; 3]);
        assert!(matches!(cells[3], GridCell::Day { day: 1, .. }));
        assert_eq!(day_numbers(&cells), (1..=31).collect::<Vec<_>>());
        assert_eq!(cells.len(), 34);
    }

    #[test]
    fn january_rolls_back_to_december() {
        let mut state = grid(value(2025, 0, 5, 8, 0), DateBounds::unbounded());
        state.previous_month();
        let month = state.displayed_month();
        assert_eq!((month.year(), month.month0()), (2024, 11));
    }

    #[test]
    fn select_day_respects_bounds() {
        let bounds = DateBounds::new(Some(date(2025, 1, 10)), Some(date(2025, 1, 20)));
        let mut state = grid(value(2025, 0, 15, 9, 30), bounds);

        assert!(!state.select_day(9));
        assert!(!state.select_day(21));
        assert_eq!(state.selected(), value(2025, 0, 15, 9, 30));

        assert!(state.select_day(10));
        assert!(state.select_day(20));
        assert_eq!(state.selected().date(), date(2025, 1, 20));
        assert!(!state.select_day(32));
    }

    #[test]
    fn select_day_keeps_time_of_day() {
        let start = PickerValue::from_naive(
            date(2025, 1, 15)
                .and_hms_opt(21, 45, 12)
                .expect("valid time"),
        );
        let mut state = grid(start, DateBounds::unbounded());
        state.next_month();
        assert!(state.select_day(3));
        let selected = state.selected();
        assert_eq!(selected.date(), date(2025, 2, 3));
        assert_eq!(
            (selected.hour(), selected.minute(), selected.second()),
            (21, 45, 12)
        );
    }

    #[test]
    fn quick_picks_use_clock_and_move_month() {
        let mut state = grid(value(2024, 5, 1, 7, 0), DateBounds::unbounded());
        assert!(state.quick_select(QuickPick::LastWeek));
        assert_eq!(state.selected(), value(2025, 2, 3, 14, 20));
        let month = state.displayed_month();
        assert_eq!((month.year(), month.month0()), (2025, 2));

        assert!(state.quick_select(QuickPick::Yesterday));
        assert_eq!(state.selected(), value(2025, 2, 9, 14, 20));
    }

    #[test]
    fn quick_pick_outside_bounds_is_ignored() {
        let bounds = DateBounds::new(Some(date(2025, 3, 5)), None);
        let mut state = grid(value(2025, 2, 6, 7, 0), bounds);
        assert!(!state.quick_select(QuickPick::LastWeek));
        assert_eq!(state.selected(), value(2025, 2, 6, 7, 0));
        assert!(state.quick_select(QuickPick::Today));
    }

    #[test]
    fn selected_style_wins_over_today() {
        let mut state = grid(value(2025, 2, 10, 9, 0), DateBounds::unbounded());
        let styles = |state: &DateGridState| -> Vec<(u32, DayStyle)> {
            state
                .cells(Weekday::Sun)
                .into_iter()
                .filter_map(|cell| match cell {
                    GridCell::Day { day, style, .. } if style != DayStyle::Normal => {
                        Some((day, style))
                    }
                    _ => None,
                })
                .collect()
        };
        assert_eq!(styles(&state), vec![(10, DayStyle::Selected)]);

        assert!(state.select_day(12));
        assert_eq!(
            styles(&state),
            vec![(10, DayStyle::Today), (12, DayStyle::Selected)]
        );
    }

    #[test]
    fn out_of_bound_days_render_disabled() {
        let bounds = DateBounds::new(None, Some(date(2025, 1, 2)));
        let state = grid(value(2025, 0, 1, 9, 0), bounds);
        let disabled: Vec<u32> = state
            .cells(Weekday::Sun)
            .into_iter()
            .filter_map(|cell| match cell {
                GridCell::Day {
                    day,
                    disabled: true,
                    ..
                } => Some(day),
                _ => None,
            })
            .collect();
        assert_eq!(disabled, (3..=31).collect::<Vec<_>>());
    }

    #[test]
    fn view_routes_taps_and_navigation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let bounds = DateBounds::new(None, Some(date(2025, 1, 20)));
        let state = State::new(grid(value(2025, 0, 15, 9, 30), bounds));
        let args = DateGridArgs::default().on_select(move |value| sink.lock().push(value));

        let view = date_grid(args.clone(), &state);
        assert_eq!(view.title, "January 2025");
        assert_eq!(view.headline, "Wed, Jan 15, 2025");
        assert_eq!(view.weekdays[0], "Sun");
        assert!(view.cells[0].on_tap.is_none());
        assert!(view.cells[3 + 24].on_tap.is_none());
        assert_eq!(view.cells[3].label, "1");

        if let Some(on_tap) = &view.cells[3 + 1].on_tap {
            on_tap.call();
        }
        assert_eq!(*seen.lock(), vec![value(2025, 0, 2, 9, 30)]);

        assert!(!view.quick_picks[0].enabled);
        view.quick_picks[0].on_tap.call();
        assert_eq!(seen.lock().len(), 1);

        view.on_next.call();
        let view = date_grid(args.clone().week_start(Weekday::Mon), &state);
        assert_eq!(view.title, "February 2025");
        assert_eq!(view.weekdays[0], "Mon");
        assert_eq!(view.cells[0].label, "");
        assert_eq!(view.cells[5].label, "1");
    }
}
