//! Calendar date validation and elapsed-time breakdowns.
//!
//! A [`CalendarDate`] is only constructed after its year, month and day have
//! been checked against a [`LeapRule`]. [`DateValidator`] reports that check as
//! a [`Validity`] and [`DifferenceCalculator`] turns two valid dates into a
//! [`DateDifference`].

mod consts;
mod difference;
mod prelude;
mod types;
mod validator;

pub mod config;
pub mod shell;

pub use consts::*;
pub use difference::{DateDifference, DifferenceCalculator, ReversedDates, SpanError};
pub use types::{Day, LeapRule, Month, Year};
pub use validator::{DateValidator, Validity};

use crate::prelude::*;
use std::str::FromStr;

/// A validated (year, month, day) triple.
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CalendarDate {
    year: Year,
    month: Month,
    day: Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {} or later)", "_0", MIN_YEAR)]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: i32 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}

impl CalendarDate {
    /// Creates a date from raw components with a one-based month.
    ///
    /// # Errors
    /// Returns the `DateError` of the first component that is out of range.
    pub fn new(year: i32, month: u8, day: i32, rule: LeapRule) -> Result<Self, DateError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month, rule)?;
        Ok(Self { year, month, day })
    }

    /// Returns the year component
    pub const fn year(&self) -> i32 {
        self.year.get()
    }

    /// Returns the one-based month component
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day-of-month component
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns the Year type
    pub const fn year_typed(&self) -> Year {
        self.year
    }

    /// Returns the Month type
    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Returns the Day type
    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// Whether this date also exists under `rule`. Only a 29th of February in
    /// a century year can differ between rules.
    pub const fn is_valid_under(&self, rule: LeapRule) -> bool {
        self.day.get() <= rule.days_in_month(self.year.get(), self.month)
    }

    /// Parses an ISO `YYYY-MM-DD` string, checking the day against `rule`.
    ///
    /// # Errors
    /// Returns `DateError::EmptyInput` for blank input, `InvalidFormat` for a
    /// wrong shape or non-numeric parts, or the component error otherwise.
    pub fn parse_with(s: &str, rule: LeapRule) -> Result<Self, DateError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(DateError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {trimmed}"
            )));
        };

        let year = Self::parse_component::<i32>(year)?;
        let month = Self::parse_component::<u8>(month)?;
        let day = Self::parse_component::<i32>(day)?;

        Self::new(year, month, day, rule)
    }

    /// Helper to parse a numeric component with better error messages
    fn parse_component<T: FromStr>(s: &str) -> Result<T, DateError> {
        s.parse::<T>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }

    /// Days since the start of year 1 under `rule`
    pub(crate) fn epoch_day(&self, rule: LeapRule) -> i64 {
        rule.epoch_day(self.year.get(), self.month.get(), self.day.get())
    }

    /// Months since the start of year 0, used for whole-month arithmetic
    pub(crate) fn month_ordinal(&self) -> i64 {
        i64::from(self.year.get()) * i64::from(MONTHS_PER_YEAR) + i64::from(self.month.get()) - 1
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, LeapRule::default())
    }
}

impl TryFrom<(i32, u8, i32)> for CalendarDate {
    type Error = DateError;

    fn try_from(value: (i32, u8, i32)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2, LeapRule::default())
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
