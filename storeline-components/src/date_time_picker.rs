//! Modal date/time picker.
//!
//! ## Usage
//!
//! A screen keeps the committed value and the `visible` flag, opens the
//! picker by setting `visible`, and receives the edited value through
//! `on_confirm`. Edits made while the modal is open live in a working copy
//! that is discarded on cancel.
//!
//! The modal moves `Closed → Open(mode) → Closed`. It opens on every
//! `visible` false-to-true transition, starting from the caller's value.

use std::sync::Arc;

use chrono::Weekday;
use derive_setters::Setters;
use storeline_ui::{Callback, CallbackWith, Color, Dp, State, use_context};
use tracing::{debug, warn};

use crate::{
    calendar::{Clock, DateBounds, PickerValue, format_headline, system_clock},
    date_grid::{DateGridArgs, DateGridState, DateGridView, date_grid},
    theme::Theme,
    time_wheels::{TimeWheelsArgs, TimeWheelsState, TimeWheelsView, time_wheels},
    wheel_picker::{DEFAULT_ROW_HEIGHT, PickerError},
};

/// What the picker edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PickerMode {
    /// Calendar grid.
    #[default]
    Date,
    /// Hour/minute/AM-PM wheels.
    Time,
}

impl PickerMode {
    fn default_title(&self) -> &'static str {
        match self {
            Self::Date => "Select date",
            Self::Time => "Select time",
        }
    }
}

/// Modal lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerPhase {
    /// Not shown.
    Closed,
    /// Shown in the given mode.
    Open(PickerMode),
}

/// Where a tap landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapTarget {
    /// The dimmed area around the picker.
    Overlay,
    /// The picker surface itself.
    Surface,
}

/// Props of [`date_time_picker`].
#[derive(Clone, PartialEq, Setters)]
pub struct DateTimePickerArgs {
    /// What the picker edits.
    pub mode: PickerMode,
    /// The caller's committed value.
    pub value: PickerValue,
    /// Whether the caller wants the modal shown.
    pub visible: bool,
    /// Earliest selectable day (date mode).
    #[setters(strip_option)]
    pub minimum_date: Option<PickerValue>,
    /// Latest selectable day (date mode).
    #[setters(strip_option)]
    pub maximum_date: Option<PickerValue>,
    /// Advisory message shown in a banner. Never blocks confirm.
    #[setters(strip_option, into)]
    pub validation_error: Option<String>,
    /// Title override.
    #[setters(strip_option, into)]
    pub title: Option<String>,
    /// First column of the calendar.
    pub week_start: Weekday,
    /// Height of one wheel row.
    pub row_height: Dp,
    /// Receives the working value on confirm.
    #[setters(skip)]
    pub on_confirm: CallbackWith<PickerValue>,
    /// Called after cancel.
    #[setters(skip)]
    pub on_cancel: Callback,
}

impl DateTimePickerArgs {
    /// Creates props for `value` with the modal hidden.
    pub fn new(value: PickerValue) -> Self {
        Self {
            mode: PickerMode::Date,
            value,
            visible: false,
            minimum_date: None,
            maximum_date: None,
            validation_error: None,
            title: None,
            week_start: Weekday::Sun,
            row_height: DEFAULT_ROW_HEIGHT,
            on_confirm: CallbackWith::default(),
            on_cancel: Callback::noop(),
        }
    }

    /// Sets the confirm handler.
    pub fn on_confirm<F>(mut self, on_confirm: F) -> Self
    where
        F: Fn(PickerValue) + Send + Sync + 'static,
    {
        self.on_confirm = CallbackWith::new(on_confirm);
        self
    }

    /// Sets the confirm handler using a shared callback.
    pub fn on_confirm_shared(mut self, on_confirm: impl Into<CallbackWith<PickerValue>>) -> Self {
        self.on_confirm = on_confirm.into();
        self
    }

    /// Sets the cancel handler.
    pub fn on_cancel<F>(mut self, on_cancel: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_cancel = Callback::new(on_cancel);
        self
    }

    /// Sets the cancel handler using a shared callback.
    pub fn on_cancel_shared(mut self, on_cancel: impl Into<Callback>) -> Self {
        self.on_cancel = on_cancel.into();
        self
    }

    /// Bounds for date mode. Time mode ignores them.
    pub fn bounds(&self) -> DateBounds {
        match self.mode {
            PickerMode::Date => DateBounds::from_values(self.minimum_date, self.maximum_date),
            PickerMode::Time => DateBounds::unbounded(),
        }
    }
}

/// Internal state of one picker instance.
#[derive(Debug, Clone)]
pub struct DateTimePickerState {
    phase: PickerPhase,
    external: PickerValue,
    working: PickerValue,
    was_visible: bool,
    grid: State<DateGridState>,
    time: TimeWheelsState,
}

impl DateTimePickerState {
    /// Creates a closed picker for `value`.
    pub fn new(value: PickerValue) -> Self {
        Self::with_clock(value, system_clock())
    }

    /// Like [`new`](Self::new) with a custom clock for the calendar.
    pub fn with_clock(value: PickerValue, clock: Arc<dyn Clock>) -> Self {
        Self {
            phase: PickerPhase::Closed,
            external: value,
            working: value,
            was_visible: false,
            grid: State::new(DateGridState::new(value, DateBounds::unbounded()).with_clock(clock)),
            time: TimeWheelsState::new(value.hour(), value.minute()),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> PickerPhase {
        self.phase
    }

    /// Whether the modal is shown.
    pub fn is_open(&self) -> bool {
        matches!(self.phase, PickerPhase::Open(_))
    }

    /// Last value received from the caller.
    pub fn external(&self) -> PickerValue {
        self.external
    }

    /// Value being edited.
    pub fn working(&self) -> PickerValue {
        self.working
    }

    /// Calendar state used in date mode.
    pub fn grid(&self) -> &State<DateGridState> {
        &self.grid
    }

    /// Wheels used in time mode.
    pub fn time_wheels(&self) -> &TimeWheelsState {
        &self.time
    }

    /// Applies the caller's props.
    ///
    /// Opens on a `visible` false-to-true transition and re-syncs the
    /// working value whenever the caller's value changes.
    pub fn sync_props(&mut self, args: &DateTimePickerArgs) {
        self.grid.with_mut(|g| g.set_bounds(args.bounds()));

        let opening = args.visible && !self.was_visible;
        self.was_visible = args.visible;

        if opening {
            self.external = args.value;
            self.reset_working(args.value);
            self.phase = PickerPhase::Open(args.mode);
            debug!(mode = ?args.mode, value = %args.value, "picker opened");
            return;
        }
        if !args.visible {
            if self.is_open() {
                debug!("picker hidden by caller");
            }
            self.phase = PickerPhase::Closed;
        }
        if args.value != self.external {
            self.external = args.value;
            self.reset_working(args.value);
        }
        if let PickerPhase::Open(mode) = self.phase
            && mode != args.mode
        {
            self.set_working(self.working);
            self.phase = PickerPhase::Open(args.mode);
            debug!(mode = ?args.mode, value = %self.working, "picker mode switched");
        }
    }

    /// Replaces the working value, e.g. after a day tap.
    ///
    /// The calendar and the wheels both follow, so an edit in one mode is
    /// kept when the other mode edits next.
    pub fn set_working(&mut self, value: PickerValue) {
        self.working = value;
        self.grid.with_mut(|g| g.track(value));
        self.time.sync(value.hour(), value.minute());
    }

    /// Replaces the working time of day, keeping the date.
    pub fn set_working_time(&mut self, hour24: u32, minute: u32) -> Result<(), PickerError> {
        let value = self.working.with_hour_minute(hour24, minute)?;
        self.set_working(value);
        Ok(())
    }

    /// Closes the modal and returns the value to hand to `on_confirm`.
    /// The working value is kept.
    pub fn confirm(&mut self) -> Option<PickerValue> {
        if !self.is_open() {
            return None;
        }
        self.phase = PickerPhase::Closed;
        debug!(value = %self.working, "picker confirmed");
        Some(self.working)
    }

    /// Discards edits and closes. Returns whether the modal was open.
    pub fn cancel(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.reset_working(self.external);
        self.phase = PickerPhase::Closed;
        debug!("picker cancelled");
        true
    }

    /// Routes a tap. Overlay taps cancel; surface taps do nothing.
    pub fn tap(&mut self, target: TapTarget) -> bool {
        match target {
            TapTarget::Overlay => self.cancel(),
            TapTarget::Surface => false,
        }
    }

    fn reset_working(&mut self, value: PickerValue) {
        self.working = value;
        self.grid.with_mut(|g| g.reset(value));
        self.time.sync(value.hour(), value.minute());
    }
}

/// Inline validation banner.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBanner {
    /// Message text.
    pub message: String,
    /// Banner background.
    pub background: Color,
    /// Message color.
    pub text_color: Color,
}

/// Mode-specific picker body.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerContent {
    /// Calendar grid.
    Date(DateGridView),
    /// Time wheels.
    Time(TimeWheelsView),
}

/// Render model produced by [`date_time_picker`].
#[derive(Debug, Clone, PartialEq)]
pub struct DateTimePickerView {
    /// Active mode.
    pub mode: PickerMode,
    /// Title text.
    pub title: String,
    /// Working value as text.
    pub headline: String,
    /// Overlay color.
    pub scrim: Color,
    /// Surface color.
    pub surface: Color,
    /// Surface border; error-colored while a validation error is shown.
    pub border_color: Color,
    /// Surface border width.
    pub border_width: Dp,
    /// Validation banner.
    pub error_banner: Option<ErrorBanner>,
    /// Mode body.
    pub content: PickerContent,
    /// Tap on the dimmed overlay; cancels.
    pub on_overlay_tap: Callback,
    /// Tap on the surface; consumed so it never reaches the overlay.
    pub on_surface_tap: Callback,
    /// Confirm button.
    pub on_confirm: Callback,
    /// Cancel button.
    pub on_cancel: Callback,
}

/// # date_time_picker
///
/// Builds the modal picker, or `None` while it is closed.
///
/// ## Usage
///
/// Call on every render with the screen's current props. The caller flips
/// `visible` back to `false` from its `on_confirm` / `on_cancel` handlers.
///
/// ## Parameters
///
/// - `args` — props; see [`DateTimePickerArgs`].
/// - `state` — picker state; see [`DateTimePickerState`].
///
/// ## Examples
///
/// ```
/// use storeline_components::{
///     calendar::PickerValue,
///     date_time_picker::{DateTimePickerArgs, DateTimePickerState, date_time_picker},
/// };
/// use storeline_ui::State;
///
/// let value = PickerValue::new(2025, 0, 15, 9, 30).unwrap();
/// let state = State::new(DateTimePickerState::new(value));
/// let args = DateTimePickerArgs::new(value);
/// assert!(date_time_picker(args.clone(), &state).is_none());
///
/// let view = date_time_picker(args.visible(true), &state).unwrap();
/// assert_eq!(view.headline, "Wed, Jan 15, 2025");
/// ```
pub fn date_time_picker(
    args: DateTimePickerArgs,
    state: &State<DateTimePickerState>,
) -> Option<DateTimePickerView> {
    state.with_mut(|s| s.sync_props(&args));
    let (phase, working, grid, time) =
        state.with(|s| (s.phase(), s.working(), s.grid.clone(), s.time.clone()));
    let PickerPhase::Open(mode) = phase else {
        return None;
    };

    let theme = use_context::<Theme>();

    let content = match mode {
        PickerMode::Date => {
            let picker = state.clone();
            let grid_args = DateGridArgs::default()
                .week_start(args.week_start)
                .on_select(move |value| picker.with_mut(|s| s.set_working(value)));
            PickerContent::Date(date_grid(grid_args, &grid))
        }
        PickerMode::Time => {
            let picker = state.clone();
            let wheel_args = TimeWheelsArgs::default()
                .row_height(args.row_height)
                .on_change(move |(hour, minute)| {
                    if let Err(err) = picker.with_mut(|s| s.set_working_time(hour, minute)) {
                        warn!(error = %err, "wheel time rejected");
                    }
                });
            PickerContent::Time(time_wheels(wheel_args, &time))
        }
    };

    let headline = match mode {
        PickerMode::Date => format_headline(working),
        PickerMode::Time => working.naive().format("%I:%M %p").to_string(),
    };

    let error_banner = args.validation_error.as_ref().map(|message| ErrorBanner {
        message: message.clone(),
        background: theme.error_container,
        text_color: theme.on_error_container,
    });
    let (border_color, border_width) = if error_banner.is_some() {
        (theme.error, Dp(2.0))
    } else {
        (theme.outline, Dp(1.0))
    };

    let on_confirm = {
        let state = state.clone();
        let on_confirm = args.on_confirm.clone();
        Callback::new(move || {
            if let Some(value) = state.with_mut(|s| s.confirm()) {
                on_confirm.call(value);
            }
        })
    };
    let on_cancel = {
        let state = state.clone();
        let on_cancel = args.on_cancel.clone();
        Callback::new(move || {
            if state.with_mut(|s| s.tap(TapTarget::Overlay)) {
                on_cancel.call();
            }
        })
    };
    let on_surface_tap = {
        let state = state.clone();
        Callback::new(move || {
            state.with_mut(|s| s.tap(TapTarget::Surface));
        })
    };

    Some(DateTimePickerView {
        mode,
        title: args
            .title
            .clone()
            .unwrap_or_else(|| mode.default_title().to_string()),
        headline,
        scrim: theme.scrim.with_alpha(theme.scrim_alpha),
        surface: theme.surface,
        border_color,
        border_width,
        error_banner,
        content,
        on_overlay_tap: on_cancel.clone(),
        on_surface_tap,
        on_confirm,
        on_cancel,
    })
}
