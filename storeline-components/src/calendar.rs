//! Calendar values shared by the date grid, the time wheels and screens.
//!
//! Months are zero-based throughout (`0` = January), matching the picker
//! props that screens pass around.

use std::{fmt, sync::Arc};

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use thiserror::Error;

/// Errors raised when building calendar values from raw components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The year/month/day triple does not name a real day.
    #[error("invalid date {year}-{month:02}-{day:02}", month = month0 + 1)]
    InvalidDate {
        /// Year.
        year: i32,
        /// Zero-based month.
        month0: u32,
        /// Day of month.
        day: u32,
    },
    /// Hour or minute out of range.
    #[error("invalid time {hour:02}:{minute:02}")]
    InvalidTime {
        /// Hour (0-23).
        hour: u32,
        /// Minute (0-59).
        minute: u32,
    },
}

/// A wall-clock date-time selected through the picker.
///
/// No timezone is attached; display conversion belongs to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PickerValue(NaiveDateTime);

impl PickerValue {
    /// Builds a value with seconds set to zero.
    pub fn new(
        year: i32,
        month0: u32,
        day: u32,
        hour: u32,
        minute: u32,
    ) -> Result<Self, CalendarError> {
        let date = date_from_parts(year, month0, day)?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or(CalendarError::InvalidTime { hour, minute })?;
        Ok(Self(date.and_time(time)))
    }

    /// Wraps a chrono date-time.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// Returns the chrono date-time.
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar date part.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Time-of-day part, seconds included.
    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    /// Year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Zero-based month.
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// Day of month.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Minute.
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Second.
    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// Moves to another day, keeping hour, minute and second.
    pub fn on_day(self, year: i32, month0: u32, day: u32) -> Result<Self, CalendarError> {
        let date = date_from_parts(year, month0, day)?;
        Ok(Self(date.and_time(self.time())))
    }

    /// Replaces hour and minute, keeping the date and second.
    pub fn with_hour_minute(self, hour: u32, minute: u32) -> Result<Self, CalendarError> {
        let time = NaiveTime::from_hms_opt(hour, minute, self.second())
            .ok_or(CalendarError::InvalidTime { hour, minute })?;
        Ok(Self(self.date().and_time(time)))
    }

    /// Subtracts whole days. `None` only at the edge of the representable
    /// range.
    pub fn days_before(self, days: u64) -> Option<Self> {
        self.0.checked_sub_days(Days::new(days)).map(Self)
    }

    /// The month containing this value.
    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year(),
            month0: self.month0(),
        }
    }
}

impl From<NaiveDateTime> for PickerValue {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl From<PickerValue> for NaiveDateTime {
    fn from(value: PickerValue) -> Self {
        value.0
    }
}

impl fmt::Display for PickerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

fn date_from_parts(year: i32, month0: u32, day: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month0 + 1, day).ok_or(CalendarError::InvalidDate {
        year,
        month0,
        day,
    })
}

/// Source of "now" for quick picks and today highlighting.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> PickerValue;

    /// Current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The device's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> PickerValue {
        PickerValue(Local::now().naive_local())
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub PickerValue);

impl Clock for FixedClock {
    fn now(&self) -> PickerValue {
        self.0
    }
}

/// Returns the system clock as a shareable handle.
pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

/// A displayed year and zero-based month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month0: u32,
}

impl YearMonth {
    /// Creates a year/month pair; `None` when `month0 > 11`.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        (month0 < 12).then_some(Self { year, month0 })
    }

    /// Year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month.
    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// Adds or subtracts months, carrying into the year.
    pub fn add_months(&self, delta: i32) -> Self {
        let total = self.year * 12 + self.month0 as i32 + delta;
        Self {
            year: total.div_euclid(12),
            month0: total.rem_euclid(12) as u32,
        }
    }

    /// Next month; December rolls into January of the next year.
    pub fn next(&self) -> Self {
        self.add_months(1)
    }

    /// Previous month; January rolls into December of the previous year.
    pub fn previous(&self) -> Self {
        self.add_months(-1)
    }

    /// Number of days in this month.
    pub fn days_in_month(&self) -> u32 {
        match (self.date(1), self.next().date(1)) {
            (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
            _ => 0,
        }
    }

    /// Weekday of the first day.
    pub fn first_weekday(&self) -> Weekday {
        self.date(1)
            .map(|date| date.weekday())
            .unwrap_or(Weekday::Sun)
    }

    /// Leading placeholder cells before day 1 in a grid starting on
    /// `week_start`.
    pub fn leading_blanks(&self, week_start: Weekday) -> u32 {
        let first = self.first_weekday().num_days_from_sunday();
        let start = week_start.num_days_from_sunday();
        (first + 7 - start) % 7
    }

    /// The date for `day` in this month.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, day)
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    /// Title such as "January 2025".
    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month0), self.year)
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }
}

/// Inclusive calendar-day bounds.
///
/// Comparison ignores time of day: a bound of `2025-01-10 18:00` still admits
/// any time on January 10.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    minimum: Option<NaiveDate>,
    maximum: Option<NaiveDate>,
}

impl DateBounds {
    /// Creates bounds; reversed bounds are swapped.
    pub fn new(minimum: Option<NaiveDate>, maximum: Option<NaiveDate>) -> Self {
        match (minimum, maximum) {
            (Some(min), Some(max)) if min > max => Self {
                minimum: Some(max),
                maximum: Some(min),
            },
            _ => Self { minimum, maximum },
        }
    }

    /// Bounds that admit every day.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Builds bounds from picker props.
    pub fn from_values(minimum: Option<PickerValue>, maximum: Option<PickerValue>) -> Self {
        Self::new(minimum.map(|v| v.date()), maximum.map(|v| v.date()))
    }

    /// Lower bound.
    pub fn minimum(&self) -> Option<NaiveDate> {
        self.minimum
    }

    /// Upper bound.
    pub fn maximum(&self) -> Option<NaiveDate> {
        self.maximum
    }

    /// Whether `date` satisfies both bounds.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.minimum.is_none_or(|min| date >= min) && self.maximum.is_none_or(|max| date <= max)
    }

    /// Whether the day of `value` satisfies both bounds.
    pub fn admits(&self, value: PickerValue) -> bool {
        self.contains(value.date())
    }
}

/// Full English month name for a zero-based month.
pub fn month_name(month0: u32) -> &'static str {
    match month0 {
        0 => "January",
        1 => "February",
        2 => "March",
        3 => "April",
        4 => "May",
        5 => "June",
        6 => "July",
        7 => "August",
        8 => "September",
        9 => "October",
        10 => "November",
        _ => "December",
    }
}

/// Headline for a selected value, e.g. "Wed, Jan 1, 2025".
pub fn format_headline(value: PickerValue) -> String {
    value.naive().format("%a, %b %-d, %Y").to_string()
}

/// Seven weekdays starting at `week_start`.
pub fn weekday_sequence(week_start: Weekday) -> [Weekday; 7] {
    let mut days = [week_start; 7];
    let mut day = week_start;
    for slot in days.iter_mut() {
        *slot = day;
        day = day.succ();
    }
    days
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use super::{CalendarError, DateBounds, PickerValue, YearMonth, format_headline};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn december_rolls_into_january() {
        let december = YearMonth::new(2024, 11).expect("valid month");
        let january = december.next();
        assert_eq!((january.year(), january.month0()), (2025, 0));
        assert_eq!(january.previous(), december);
    }

    #[test]
    fn add_months_handles_negative_years() {
        let month = YearMonth::new(0, 0).expect("valid month");
        let back = month.add_months(-1);
        assert_eq!((back.year(), back.month0()), (-1, 11));
        assert_eq!(month.add_months(25), YearMonth::new(2, 1).expect("valid month"));
    }

    #[test]
    fn days_in_month_follows_leap_rules() {
        let feb = |y| YearMonth::new(y, 1).expect("valid month").days_in_month();
        assert_eq!(feb(2024), 29);
        assert_eq!(feb(2025), 28);
        assert_eq!(feb(1900), 28);
        assert_eq!(feb(2000), 29);
        assert_eq!(YearMonth::new(2025, 0).expect("valid month").days_in_month(), 31);
        assert_eq!(YearMonth::new(2025, 3).expect("valid month").days_in_month(), 30);
        assert_eq!(YearMonth::new(2024, 11).expect("valid month").days_in_month(), 31);
    }

    #[test]
    fn leading_blanks_depend_on_week_start() {
        let january = YearMonth::new(2025, 0).expect("valid month");
        assert_eq!(january.first_weekday(), Weekday::Wed);
        assert_eq!(january.leading_blanks(Weekday::Sun), 3);
        assert_eq!(january.leading_blanks(Weekday::Mon), 2);
        assert_eq!(january.leading_blanks(Weekday::Wed), 0);
    }

    #[test]
    fn on_day_keeps_time_of_day() {
        let value = PickerValue::from_naive(
            date(2025, 3, 14)
                .and_hms_opt(21, 45, 30)
                .expect("valid time"),
        );
        let moved = value.on_day(2025, 1, 28).expect("valid day");
        assert_eq!(moved.date(), date(2025, 2, 28));
        assert_eq!((moved.hour(), moved.minute(), moved.second()), (21, 45, 30));
        assert_eq!(
            value.on_day(2025, 1, 30),
            Err(CalendarError::InvalidDate {
                year: 2025,
                month0: 1,
                day: 30
            })
        );
    }

    #[test]
    fn bounds_are_inclusive_and_swapped() {
        let bounds = DateBounds::new(Some(date(2025, 1, 31)), Some(date(2025, 1, 1)));
        assert_eq!(bounds.minimum(), Some(date(2025, 1, 1)));
        assert!(bounds.contains(date(2025, 1, 1)));
        assert!(bounds.contains(date(2025, 1, 31)));
        assert!(!bounds.contains(date(2024, 12, 31)));
        assert!(!bounds.contains(date(2025, 2, 1)));
        assert!(DateBounds::unbounded().contains(date(1, 1, 1)));
    }

    #[test]
    fn labels() {
        let value = PickerValue::new(2025, 0, 1, 9, 5).expect("valid value");
        assert_eq!(format_headline(value), "Wed, Jan 1, 2025");
        assert_eq!(value.year_month().title(), "January 2025");
        assert_eq!(value.to_string(), "2025-01-01 09:05:00");
    }

    #[test]
    fn invalid_time_is_rejected() {
        assert_eq!(
            PickerValue::new(2025, 0, 1, 24, 0),
            Err(CalendarError::InvalidTime { hour: 24, minute: 0 })
        );
    }
}
