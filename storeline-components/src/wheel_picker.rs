//! Looping wheel picker for hours, minutes and AM/PM.
//!
//! ## Usage
//!
//! Pick one value from a small fixed set by scrolling a visually endless
//! wheel. The wheel reports the centered value only when scrolling settles
//! or a row is tapped.
//!
//! The base list of `N` values is rendered three times. The selection always
//! rests in the middle copy (rows `N..2N`), so the user can scroll a full
//! rotation in either direction before reaching an edge.

use std::fmt;

use derive_setters::Setters;
use storeline_ui::{Callback, CallbackWith, Color, Dp, State, use_context};
use thiserror::Error;
use tracing::debug;

use crate::{calendar::CalendarError, theme::Theme};

/// Default height of one wheel row.
pub const DEFAULT_ROW_HEIGHT: Dp = Dp(44.0);

const COPIES: usize = 3;

/// Errors raised by picker components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    /// The value is not part of the wheel's base list.
    #[error("{value} is not a value of the {kind} wheel")]
    ValueNotOnWheel {
        /// Wheel that rejected the value.
        kind: WheelKind,
        /// Rejected value.
        value: WheelValue,
    },
    /// A date or time could not be built.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Indicates whether a 12-hour time is before or after noon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPeriod {
    /// Ante meridiem (before noon).
    Am,
    /// Post meridiem (after noon).
    Pm,
}

impl DayPeriod {
    /// Period of a 24-hour clock hour.
    pub fn of_hour(hour24: u32) -> Self {
        if hour24 >= 12 { Self::Pm } else { Self::Am }
    }

    /// "AM" or "PM".
    pub fn label(&self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

/// The three wheels of the time view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelKind {
    /// Hours 12, 1, 2 … 11.
    Hour,
    /// Minutes 0 … 59.
    Minute,
    /// AM, PM.
    Period,
}

impl WheelKind {
    /// Number of values in the base list.
    pub fn len(&self) -> usize {
        match self {
            Self::Hour => 12,
            Self::Minute => 60,
            Self::Period => 2,
        }
    }

    /// Always `false`; every wheel has values.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Logical value for a base-list index.
    ///
    /// The hour wheel maps index 0 to 12; the other wheels map 1:1.
    pub fn value_at(&self, logical_index: usize) -> WheelValue {
        let index = logical_index % self.len();
        match self {
            Self::Hour if index == 0 => WheelValue::Hour(12),
            Self::Hour => WheelValue::Hour(index as u32),
            Self::Minute => WheelValue::Minute(index as u32),
            Self::Period if index == 0 => WheelValue::Period(DayPeriod::Am),
            Self::Period => WheelValue::Period(DayPeriod::Pm),
        }
    }

    /// Base-list index of `value`, if it belongs to this wheel.
    pub fn position_of(&self, value: WheelValue) -> Option<usize> {
        match (self, value) {
            (Self::Hour, WheelValue::Hour(12)) => Some(0),
            (Self::Hour, WheelValue::Hour(hour @ 1..=11)) => Some(hour as usize),
            (Self::Minute, WheelValue::Minute(minute @ 0..=59)) => Some(minute as usize),
            (Self::Period, WheelValue::Period(DayPeriod::Am)) => Some(0),
            (Self::Period, WheelValue::Period(DayPeriod::Pm)) => Some(1),
            _ => None,
        }
    }

    /// The base list in display order.
    pub fn base_values(&self) -> Vec<WheelValue> {
        (0..self.len()).map(|idx| self.value_at(idx)).collect()
    }
}

impl fmt::Display for WheelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Period => "period",
        })
    }
}

/// A value shown on a wheel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelValue {
    /// 12-hour clock hour (1-12).
    Hour(u32),
    /// Minute (0-59).
    Minute(u32),
    /// AM/PM.
    Period(DayPeriod),
}

impl WheelValue {
    /// Row text: zero-padded numbers ("07"), unpadded periods ("AM").
    pub fn label(&self) -> String {
        match self {
            Self::Hour(value) | Self::Minute(value) => format!("{value:02}"),
            Self::Period(period) => period.label().to_string(),
        }
    }
}

impl fmt::Display for WheelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Scroll position and tracked value of one wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelPickerState {
    kind: WheelKind,
    selected: WheelValue,
    offset: Dp,
    row_height: Dp,
}

impl WheelPickerState {
    /// Creates a wheel centered on `selected` in the middle copy.
    pub fn new(kind: WheelKind, selected: WheelValue) -> Result<Self, PickerError> {
        let position = kind
            .position_of(selected)
            .ok_or(PickerError::ValueNotOnWheel {
                kind,
                value: selected,
            })?;
        Ok(Self {
            kind,
            selected,
            offset: DEFAULT_ROW_HEIGHT * (kind.len() + position) as f64,
            row_height: DEFAULT_ROW_HEIGHT,
        })
    }

    /// Creates a wheel tracking the value at `logical_index` (taken modulo
    /// the base list length).
    pub fn at_index(kind: WheelKind, logical_index: usize) -> Self {
        let position = logical_index % kind.len();
        Self {
            kind,
            selected: kind.value_at(position),
            offset: DEFAULT_ROW_HEIGHT * (kind.len() + position) as f64,
            row_height: DEFAULT_ROW_HEIGHT,
        }
    }

    /// Returns the state with another row height, keeping the centered row.
    pub fn with_row_height(mut self, row_height: Dp) -> Self {
        self.set_row_height(row_height);
        self
    }

    /// Which wheel this is.
    pub fn kind(&self) -> WheelKind {
        self.kind
    }

    /// Tracked value.
    pub fn selected(&self) -> WheelValue {
        self.selected
    }

    /// Scroll offset of the list top from the center line.
    pub fn offset(&self) -> Dp {
        self.offset
    }

    /// Height of one row.
    pub fn row_height(&self) -> Dp {
        self.row_height
    }

    /// Number of rendered rows (three copies of the base list).
    pub fn row_count(&self) -> usize {
        self.kind.len() * COPIES
    }

    /// Fractional row currently under the center line.
    pub fn center_row(&self) -> f64 {
        self.offset / self.row_height
    }

    /// Changes the row height, keeping the centered row.
    pub fn set_row_height(&mut self, row_height: Dp) {
        if row_height.0 <= 0.0 || row_height == self.row_height {
            return;
        }
        let row = self.center_row();
        self.row_height = row_height;
        self.offset = row_height * row;
    }

    fn max_offset(&self) -> Dp {
        self.row_height * (self.row_count() - 1) as f64
    }

    fn middle_row_of(&self, logical_index: usize) -> usize {
        self.kind.len() + logical_index
    }

    /// Moves the list during a drag or fling. Never changes the tracked
    /// value.
    pub fn scroll_by(&mut self, delta: Dp) {
        self.offset = (self.offset + delta).clamp(Dp::ZERO, self.max_offset());
    }

    /// Jumps to `row` without animation.
    pub fn scroll_to_row(&mut self, row: usize) {
        self.offset = (self.row_height * row as f64).clamp(Dp::ZERO, self.max_offset());
    }

    /// Handles the end of a drag or fling.
    ///
    /// Snaps to the nearest row, re-centers into the middle copy when the
    /// row lies outside it, and returns the new value when it differs from
    /// the tracked one. Re-centering itself never reports a value.
    pub fn settle(&mut self) -> Option<WheelValue> {
        let n = self.kind.len();
        let last = (self.row_count() - 1) as f64;
        let index = self.center_row().round().clamp(0.0, last) as usize;
        let logical_index = index % n;

        if (n..2 * n).contains(&index) {
            self.scroll_to_row(index);
        } else {
            let target = self.middle_row_of(logical_index);
            debug!(wheel = %self.kind, from = index, to = target, "wheel re-centered");
            self.scroll_to_row(target);
        }

        self.apply(self.kind.value_at(logical_index))
    }

    /// Handles a tap on `row`. Same outcome as settling on that row's value;
    /// the wheel jumps so the row's value sits centered in the middle copy.
    pub fn tap_row(&mut self, row: usize) -> Option<WheelValue> {
        if row >= self.row_count() {
            return None;
        }
        let logical_index = row % self.kind.len();
        self.scroll_to_row(self.middle_row_of(logical_index));
        self.apply(self.kind.value_at(logical_index))
    }

    /// Moves the tracked value to `value` from outside (a new external
    /// value). Values not on this wheel are ignored and the previous value
    /// is kept.
    pub fn sync_selected(&mut self, value: WheelValue) -> bool {
        let Some(position) = self.kind.position_of(value) else {
            debug!(wheel = %self.kind, %value, "ignored value not on wheel");
            return false;
        };
        self.selected = value;
        self.scroll_to_row(self.middle_row_of(position));
        true
    }

    /// All rendered rows with their values.
    pub fn rows(&self) -> impl Iterator<Item = (usize, WheelValue)> + '_ {
        (0..self.row_count()).map(|row| (row, self.kind.value_at(row)))
    }

    fn apply(&mut self, value: WheelValue) -> Option<WheelValue> {
        if value == self.selected {
            return None;
        }
        debug!(wheel = %self.kind, from = %self.selected, to = %value, "wheel value changed");
        self.selected = value;
        Some(value)
    }
}

/// Arguments for [`wheel_picker`].
#[derive(Clone, PartialEq, Setters)]
pub struct WheelPickerArgs {
    /// Height of one row.
    pub row_height: Dp,
    /// Called with the new value when a settle or tap changes it.
    #[setters(skip)]
    pub on_change: CallbackWith<WheelValue>,
}

impl Default for WheelPickerArgs {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            on_change: CallbackWith::default(),
        }
    }
}

impl WheelPickerArgs {
    /// Sets the value-change handler.
    pub fn on_change<F>(mut self, on_change: F) -> Self
    where
        F: Fn(WheelValue) + Send + Sync + 'static,
    {
        self.on_change = CallbackWith::new(on_change);
        self
    }

    /// Sets the value-change handler using a shared callback.
    pub fn on_change_shared(mut self, on_change: impl Into<CallbackWith<WheelValue>>) -> Self {
        self.on_change = on_change.into();
        self
    }
}

/// One rendered wheel row.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelRow {
    /// Row index in the tripled list.
    pub index: usize,
    /// Value shown by the row.
    pub value: WheelValue,
    /// Row text.
    pub label: String,
    /// Whether the row shows the tracked value.
    pub emphasized: bool,
    /// Text color.
    pub color: Color,
    /// Text opacity.
    pub opacity: f32,
    /// Text size.
    pub font_size: Dp,
    /// Whether the text is bold.
    pub bold: bool,
    /// Tap handler.
    pub on_tap: Callback,
}

/// Render model produced by [`wheel_picker`].
#[derive(Debug, Clone, PartialEq)]
pub struct WheelPickerView {
    /// Wheel kind.
    pub kind: WheelKind,
    /// Current scroll offset.
    pub offset: Dp,
    /// Height of one row.
    pub row_height: Dp,
    /// Background of the band behind the centered row.
    pub selection_band: Color,
    /// Rows in list order.
    pub rows: Vec<WheelRow>,
    /// Drag/fling handler; receives the scroll delta.
    pub on_scroll: CallbackWith<Dp>,
    /// Momentum end / drag release handler.
    pub on_settle: Callback,
}

/// # wheel_picker
///
/// Builds the render model of a looping wheel.
///
/// ## Usage
///
/// Use for hour, minute and AM/PM selection inside the time view of the
/// date/time picker.
///
/// ## Parameters
///
/// - `args` — row height and change handler; see [`WheelPickerArgs`].
/// - `state` — scroll position and tracked value; see [`WheelPickerState`].
///
/// ## Examples
///
/// ```
/// use storeline_components::wheel_picker::{
///     WheelKind, WheelPickerArgs, WheelPickerState, WheelValue, wheel_picker,
/// };
/// use storeline_ui::State;
///
/// let state = State::new(WheelPickerState::new(WheelKind::Minute, WheelValue::Minute(5)).unwrap());
/// let view = wheel_picker(WheelPickerArgs::default(), &state);
/// assert_eq!(view.rows.len(), 180);
/// assert!(view.rows[65].emphasized);
/// assert_eq!(view.rows[65].label, "05");
/// ```
pub fn wheel_picker(args: WheelPickerArgs, state: &State<WheelPickerState>) -> WheelPickerView {
    let theme = use_context::<Theme>();
    state.with_mut(|s| s.set_row_height(args.row_height));

    let (kind, offset, row_height, selected, values) = state.with(|s| {
        (
            s.kind(),
            s.offset(),
            s.row_height(),
            s.selected(),
            s.rows().collect::<Vec<_>>(),
        )
    });

    let rows = values
        .into_iter()
        .map(|(index, value)| {
            let emphasized = value == selected;
            let on_tap = {
                let state = state.clone();
                let on_change = args.on_change.clone();
                Callback::new(move || {
                    if let Some(value) = state.with_mut(|s| s.tap_row(index)) {
                        on_change.call(value);
                    }
                })
            };
            WheelRow {
                index,
                value,
                label: value.label(),
                emphasized,
                color: theme.text_primary,
                opacity: if emphasized { 1.0 } else { theme.muted_alpha },
                font_size: if emphasized {
                    theme.wheel_selected_text_size
                } else {
                    theme.wheel_text_size
                },
                bold: emphasized,
                on_tap,
            }
        })
        .collect();

    let on_scroll = {
        let state = state.clone();
        CallbackWith::new(move |delta: Dp| state.with_mut(|s| s.scroll_by(delta)))
    };
    let on_settle = {
        let state = state.clone();
        let on_change = args.on_change.clone();
        Callback::new(move || {
            if let Some(value) = state.with_mut(|s| s.settle()) {
                on_change.call(value);
            }
        })
    };

    WheelPickerView {
        kind,
        offset,
        row_height,
        selection_band: theme.selected_container,
        rows,
        on_scroll,
        on_settle,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use storeline_ui::{Dp, State};

    use super::{
        DEFAULT_ROW_HEIGHT, DayPeriod, PickerError, WheelKind, WheelPickerArgs, WheelPickerState,
        WheelValue, wheel_picker,
    };
    use crate::theme::Theme;

    const H: Dp = DEFAULT_ROW_HEIGHT;

    fn hour_wheel(hour: u32) -> WheelPickerState {
        WheelPickerState::new(WheelKind::Hour, WheelValue::Hour(hour)).expect("hour on wheel")
    }

    fn assert_in_middle_copy(state: &WheelPickerState) {
        let n = state.kind().len() as f64;
        let row = state.center_row();
        assert!(row >= n && row < 2.0 * n, "row {row} outside middle copy");
        assert_eq!(row.fract(), 0.0);
    }

    #[test]
    fn initial_offset_targets_middle_copy() {
        let state = hour_wheel(7);
        assert_eq!(state.offset(), H * 19.0);
        let state = hour_wheel(12);
        assert_eq!(state.offset(), H * 12.0);
        let minute =
            WheelPickerState::new(WheelKind::Minute, WheelValue::Minute(30)).expect("on wheel");
        assert_eq!(minute.offset(), H * 90.0);
    }

    #[test]
    fn construction_rejects_foreign_values() {
        assert_eq!(
            WheelPickerState::new(WheelKind::Hour, WheelValue::Hour(0)),
            Err(PickerError::ValueNotOnWheel {
                kind: WheelKind::Hour,
                value: WheelValue::Hour(0),
            })
        );
        assert!(WheelPickerState::new(WheelKind::Minute, WheelValue::Hour(3)).is_err());
    }

    #[test]
    fn hour_wheel_maps_zero_to_twelve() {
        assert_eq!(WheelKind::Hour.value_at(0), WheelValue::Hour(12));
        assert_eq!(WheelKind::Hour.value_at(12), WheelValue::Hour(12));
        assert_eq!(WheelKind::Hour.value_at(5), WheelValue::Hour(5));
        assert_eq!(WheelKind::Minute.value_at(0), WheelValue::Minute(0));
        assert_eq!(WheelKind::Minute.value_at(61), WheelValue::Minute(1));
        assert_eq!(
            WheelKind::Period.value_at(1),
            WheelValue::Period(DayPeriod::Pm)
        );
    }

    #[test]
    fn full_rotations_return_to_same_value() {
        for kind in [WheelKind::Hour, WheelKind::Minute, WheelKind::Period] {
            for index in 0..kind.len() {
                let start = kind.value_at(index);
                let mut state = WheelPickerState::new(kind, start).expect("on wheel");
                for _ in 0..4 {
                    state.scroll_by(H * kind.len() as f64);
                    assert_eq!(state.settle(), None, "{kind} from {start}");
                    assert_eq!(state.selected(), start);
                    assert_in_middle_copy(&state);
                }
                state.scroll_by(H * -(kind.len() as f64));
                assert_eq!(state.settle(), None, "{kind} back to {start}");
                assert_eq!(state.selected(), start);
            }
        }
    }

    #[test]
    fn settle_rounds_and_notifies_once() {
        let mut state = hour_wheel(7);
        state.scroll_by(H * 2.4);
        assert_eq!(state.settle(), Some(WheelValue::Hour(9)));
        assert_eq!(state.offset(), H * 21.0);
        assert_eq!(state.settle(), None);

        state.scroll_by(H * -0.6);
        assert_eq!(state.settle(), Some(WheelValue::Hour(8)));
    }

    #[test]
    fn settle_outside_middle_recenters() {
        let mut state = hour_wheel(3);
        state.scroll_by(H * -14.0);
        assert_eq!(state.center_row(), 1.0);
        assert_eq!(state.settle(), Some(WheelValue::Hour(1)));
        assert_eq!(state.center_row(), 13.0);

        state.scroll_by(H * 1000.0);
        assert_eq!(state.center_row(), 35.0);
        assert_eq!(state.settle(), Some(WheelValue::Hour(11)));
        assert_in_middle_copy(&state);
    }

    #[test]
    fn settle_always_lands_in_middle_copy() {
        let mut state =
            WheelPickerState::new(WheelKind::Minute, WheelValue::Minute(0)).expect("on wheel");
        for step in [-7.3, 13.9, -61.2, 90.0, 0.49, -200.0, 45.5] {
            state.scroll_by(H * step);
            state.settle();
            assert_in_middle_copy(&state);
        }
    }

    #[test]
    fn scroll_is_clamped_to_list() {
        let mut state = hour_wheel(1);
        state.scroll_by(H * -100.0);
        assert_eq!(state.offset(), Dp::ZERO);
        state.scroll_by(H * 100.0);
        assert_eq!(state.offset(), H * 35.0);
        assert_eq!(state.selected(), WheelValue::Hour(1));
    }

    #[test]
    fn tap_selects_and_centers() {
        let mut state = hour_wheel(7);
        assert_eq!(state.tap_row(28), Some(WheelValue::Hour(4)));
        assert_eq!(state.center_row(), 16.0);
        assert_eq!(state.tap_row(16), None);
        assert_eq!(state.tap_row(99), None);
    }

    #[test]
    fn unknown_sync_value_keeps_previous() {
        let mut state = hour_wheel(7);
        assert!(!state.sync_selected(WheelValue::Minute(3)));
        assert!(!state.sync_selected(WheelValue::Hour(13)));
        assert_eq!(state.selected(), WheelValue::Hour(7));
        assert!(state.sync_selected(WheelValue::Hour(12)));
        assert_eq!(state.center_row(), 12.0);
    }

    #[test]
    fn row_height_change_keeps_center_row() {
        let state = hour_wheel(7).with_row_height(Dp(50.0));
        assert_eq!(state.center_row(), 19.0);
        assert_eq!(state.offset(), Dp(950.0));
    }

    #[test]
    fn labels_are_padded_except_period() {
        assert_eq!(WheelValue::Hour(7).label(), "07");
        assert_eq!(WheelValue::Minute(0).label(), "00");
        assert_eq!(WheelValue::Hour(12).label(), "12");
        assert_eq!(WheelValue::Period(DayPeriod::Am).label(), "AM");
    }

    #[test]
    fn view_emphasizes_tracked_rows_and_routes_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let state = State::new(hour_wheel(7));
        let args = WheelPickerArgs::default().on_change(move |value| sink.lock().push(value));

        let view = wheel_picker(args.clone(), &state);
        assert_eq!(view.rows.len(), 36);
        assert_eq!(view.selection_band, Theme::default().selected_container);
        let emphasized: Vec<usize> = view
            .rows
            .iter()
            .filter(|row| row.emphasized)
            .map(|row| row.index)
            .collect();
        assert_eq!(emphasized, vec![7, 19, 31]);
        assert!(view.rows[19].bold);
        assert!(view.rows[18].opacity < 1.0);

        view.on_scroll.call(H * 1.2);
        assert!(seen.lock().is_empty());
        view.on_settle.call();
        assert_eq!(*seen.lock(), vec![WheelValue::Hour(8)]);

        view.rows[2].on_tap.call();
        assert_eq!(state.with(|s| s.selected()), WheelValue::Hour(2));
        assert_eq!(seen.lock().len(), 2);

        let view = wheel_picker(args, &state);
        assert!(view.rows[14].emphasized);
    }
}
