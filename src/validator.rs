use crate::prelude::*;
use crate::{CalendarDate, DateError, LeapRule, Month};
use serde::{Deserialize, Serialize};

/// Outcome of checking one date.
///
/// Displays as the status shown next to a date field: `READY` or `ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Validity {
    #[display(fmt = "READY")]
    Valid,
    #[display(fmt = "ERROR")]
    Invalid,
}

impl Validity {
    /// True for `Valid`
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Checks raw (year, month, day) triples against a leap rule.
///
/// A date is invalid when the year is before 1000, the month is outside
/// 1..=12, or the day is not between 1 and the length of the month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateValidator {
    rule: LeapRule,
}

impl DateValidator {
    /// Validator that checks February against `rule`
    pub const fn new(rule: LeapRule) -> Self {
        Self { rule }
    }

    /// Leap rule this validator checks against
    pub const fn rule(&self) -> LeapRule {
        self.rule
    }

    /// Validates a date with a one-based month (1 is January).
    pub fn validate(&self, year: i32, month: u8, day: i32) -> Validity {
        match self.check(year, month, day) {
            Ok(_) => Validity::Valid,
            Err(_) => Validity::Invalid,
        }
    }

    /// Validates a date with a zero-based month index (0 is January).
    pub fn validate_index(&self, year: i32, month_index: usize, day: i32) -> Validity {
        match Month::from_index(month_index) {
            Ok(month) => self.validate(year, month.get(), day),
            Err(_) => Validity::Invalid,
        }
    }

    /// Like [`validate`](Self::validate) but returns the typed date or the reason it was rejected.
    ///
    /// # Errors
    /// Returns the `DateError` for the first out-of-range component.
    pub fn check(&self, year: i32, month: u8, day: i32) -> Result<CalendarDate, DateError> {
        let result = CalendarDate::new(year, month, day, self.rule);
        match &result {
            Ok(date) => tracing::debug!(%date, rule = %self.rule, "date ready"),
            Err(err) => tracing::debug!(year, month, day, rule = %self.rule, %err, "date rejected"),
        }
        result
    }
}
