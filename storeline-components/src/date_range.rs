//! Report date ranges edited through the picker.
//!
//! ## Usage
//!
//! A report screen keeps one [`DateRangeState`], merges confirmed picker
//! values into it with [`DateRangeState::apply`], and turns it into a
//! [`ReportQuery`] before fetching.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use thiserror::Error;
use tracing::debug;

use crate::calendar::PickerValue;

const QUERY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Errors found while combining a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The end date is on an earlier day than the start date.
    #[error("End date ({end}) is before start date ({start})")]
    EndBeforeStart {
        /// Start day.
        start: NaiveDate,
        /// End day.
        end: NaiveDate,
    },
    /// Advancing an overnight end left the representable range.
    #[error("End date {end} cannot be moved to the next day")]
    OutOfRange {
        /// End day.
        end: NaiveDate,
    },
}

/// One of the four independently edited fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeField {
    /// Start day.
    StartDate,
    /// End day.
    EndDate,
    /// Start time of day.
    StartTime,
    /// End time of day.
    EndTime,
}

impl RangeField {
    /// Whether the picker edits this field in time mode.
    pub fn is_time(&self) -> bool {
        matches!(self, Self::StartTime | Self::EndTime)
    }
}

/// Start/end dates and times owned by a report screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeState {
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl DateRangeState {
    /// Creates a range from its four fields.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            start_date,
            end_date,
            start_time,
            end_time,
        }
    }

    /// The whole of `date`, 00:00 to 23:59.
    pub fn whole_day(date: NaiveDate) -> Self {
        Self::new(date, date, NaiveTime::default(), end_of_day())
    }

    /// Start day.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// End day.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Start time of day.
    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    /// End time of day.
    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    /// Value to open the picker with when editing `field`.
    pub fn picker_value(&self, field: RangeField) -> PickerValue {
        let value = match field {
            RangeField::StartDate | RangeField::StartTime => {
                self.start_date.and_time(self.start_time)
            }
            RangeField::EndDate | RangeField::EndTime => self.end_date.and_time(self.end_time),
        };
        PickerValue::from_naive(value)
    }

    /// Merges a confirmed picker value: date fields take its date, time
    /// fields its time of day.
    pub fn apply(&mut self, field: RangeField, value: PickerValue) {
        match field {
            RangeField::StartDate => self.start_date = value.date(),
            RangeField::EndDate => self.end_date = value.date(),
            RangeField::StartTime => self.start_time = value.time(),
            RangeField::EndTime => self.end_time = value.time(),
        }
        debug!(?field, %value, "range field updated");
    }

    /// Combines dates and times into timestamps.
    ///
    /// On a single day, an end time not after the start time is read as an
    /// overnight range and the end moves to the next day. An end day before
    /// the start day is an error and is not corrected.
    pub fn resolve(&self) -> Result<ResolvedRange, RangeError> {
        if self.end_date < self.start_date {
            return Err(RangeError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        let start = self.start_date.and_time(self.start_time);
        let end = self.end_date.and_time(self.end_time);

        if self.end_date == self.start_date && end <= start {
            let end = end
                .checked_add_days(Days::new(1))
                .ok_or(RangeError::OutOfRange { end: self.end_date })?;
            debug!(%start, %end, "same-day range treated as overnight");
            return Ok(ResolvedRange {
                start,
                end,
                overnight: true,
            });
        }

        Ok(ResolvedRange {
            start,
            end,
            overnight: false,
        })
    }

    /// Message for the picker's `validation_error` prop, if the range is
    /// invalid.
    pub fn validation_message(&self) -> Option<String> {
        self.resolve().err().map(|err| err.to_string())
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default()
}

/// A range with full start and end timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    /// Start timestamp.
    pub start: NaiveDateTime,
    /// End timestamp, after `start`.
    pub end: NaiveDateTime,
    /// Whether the end was moved to the next day.
    pub overnight: bool,
}

impl ResolvedRange {
    /// Length of the range.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Query for a report endpoint.
    pub fn query(&self) -> ReportQuery {
        ReportQuery {
            start: self.start,
            end: self.end,
        }
    }
}

/// Parameters of a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
    /// Start timestamp.
    pub start: NaiveDateTime,
    /// End timestamp.
    pub end: NaiveDateTime,
}

impl ReportQuery {
    /// `start` / `end` parameters as ISO-8601 local timestamps.
    pub fn params(&self) -> [(&'static str, String); 2] {
        [
            ("start", self.start.format(QUERY_FORMAT).to_string()),
            ("end", self.end.format(QUERY_FORMAT).to_string()),
        ]
    }
}

impl TryFrom<&DateRangeState> for ReportQuery {
    type Error = RangeError;

    fn try_from(range: &DateRangeState) -> Result<Self, Self::Error> {
        range.resolve().map(|resolved| resolved.query())
    }
}
