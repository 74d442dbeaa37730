use crate::consts::{
    DECEMBER, HOURS_PER_DAY, JANUARY, MINUTES_PER_HOUR, MONTHS_PER_YEAR, SECONDS_PER_MINUTE,
};
use crate::prelude::*;
use crate::{CalendarDate, DateError, LeapRule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Elapsed time between two dates, broken down by calendar units and as totals.
///
/// `years`/`months`/`days` follow calendar period subtraction. The totals are
/// independent counts: `total_days` comes from day arithmetic, not from
/// `total_months`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DateDifference {
    years: u64,
    months: u64,
    days: u64,
    total_months: u64,
    total_days: u64,
    total_hours: u64,
    total_minutes: u64,
    total_seconds: u64,
}

impl DateDifference {
    fn from_parts(whole_months: u64, days: u64, total_days: u64) -> Self {
        let months_per_year = u64::from(MONTHS_PER_YEAR);
        let total_hours = total_days * HOURS_PER_DAY;
        let total_minutes = total_hours * MINUTES_PER_HOUR;

        Self {
            years: whole_months / months_per_year,
            months: whole_months % months_per_year,
            days,
            total_months: whole_months,
            total_days,
            total_hours,
            total_minutes,
            total_seconds: total_minutes * SECONDS_PER_MINUTE,
        }
    }

    /// Whole years
    pub const fn years(&self) -> u64 {
        self.years
    }

    /// Whole months left after the whole years (0..=11)
    pub const fn months(&self) -> u64 {
        self.months
    }

    /// Days left after the whole months
    pub const fn days(&self) -> u64 {
        self.days
    }

    /// `years * 12 + months`
    pub const fn total_months(&self) -> u64 {
        self.total_months
    }

    /// Calendar days between the two dates
    pub const fn total_days(&self) -> u64 {
        self.total_days
    }

    /// `total_days` in hours
    pub const fn total_hours(&self) -> u64 {
        self.total_hours
    }

    /// `total_days` in minutes
    pub const fn total_minutes(&self) -> u64 {
        self.total_minutes
    }

    /// `total_days` in seconds
    pub const fn total_seconds(&self) -> u64 {
        self.total_seconds
    }
}

impl fmt::Display for DateDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} years {} months {} Days",
            self.years, self.months, self.days
        )?;
        writeln!(f, "or {} months  and {} days", self.total_months, self.days)?;
        writeln!(f, "or {} days", self.total_days)?;
        writeln!(f, "or {} hours", self.total_hours)?;
        writeln!(f, "or {} minutes", self.total_minutes)?;
        writeln!(f, "or {} seconds", self.total_seconds)
    }
}

/// What to do when the reference date is earlier than the date of birth.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ReversedDates {
    /// Fail with [`SpanError::Reversed`]
    #[default]
    #[display(fmt = "reject")]
    Reject,
    /// Measure the span between the two dates in chronological order
    #[display(fmt = "swap")]
    Swap,
}

/// Error type for difference calculations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpanError {
    /// One of the dates does not exist under the calculator's leap rule.
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// Reference date is before the date of birth.
    #[error("Reference date ({reference}) is before date of birth ({birth})")]
    Reversed {
        birth: CalendarDate,
        reference: CalendarDate,
    },
}

/// Computes [`DateDifference`] values under one leap rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifferenceCalculator {
    rule: LeapRule,
    reversed: ReversedDates,
}

impl DifferenceCalculator {
    /// Calculator for `rule` that rejects reversed dates
    pub const fn new(rule: LeapRule) -> Self {
        Self {
            rule,
            reversed: ReversedDates::Reject,
        }
    }

    /// Sets the policy for a reference date before the date of birth
    #[must_use]
    pub const fn with_reversed(mut self, reversed: ReversedDates) -> Self {
        self.reversed = reversed;
        self
    }

    /// Leap rule used for validation and day counting
    pub const fn rule(&self) -> LeapRule {
        self.rule
    }

    /// Reversed-date policy
    pub const fn reversed(&self) -> ReversedDates {
        self.reversed
    }

    /// Elapsed time from `birth` to `reference`.
    ///
    /// # Errors
    /// Returns `SpanError::InvalidDate` if either date does not exist under this
    /// calculator's leap rule, and `SpanError::Reversed` if `reference` is
    /// before `birth` while reversed dates are rejected.
    pub fn between(
        &self,
        birth: &CalendarDate,
        reference: &CalendarDate,
    ) -> Result<DateDifference, SpanError> {
        self.ensure_valid(birth)?;
        self.ensure_valid(reference)?;

        let (start, end) = if reference < birth {
            match self.reversed {
                ReversedDates::Reject => {
                    return Err(SpanError::Reversed {
                        birth: *birth,
                        reference: *reference,
                    });
                }
                ReversedDates::Swap => (reference, birth),
            }
        } else {
            (birth, reference)
        };

        let difference = self.span(start, end);
        tracing::debug!(
            %start,
            %end,
            rule = %self.rule,
            years = difference.years,
            months = difference.months,
            days = difference.days,
            total_days = difference.total_days,
            "computed difference"
        );
        Ok(difference)
    }

    fn ensure_valid(&self, date: &CalendarDate) -> Result<(), DateError> {
        if date.is_valid_under(self.rule) {
            return Ok(());
        }
        // Rebuild under our rule to get the precise error
        CalendarDate::new(
            date.year(),
            date.month(),
            i32::from(date.day()),
            self.rule,
        )
        .map(|_| ())
    }

    /// `start` must not be after `end`.
    fn span(&self, start: &CalendarDate, end: &CalendarDate) -> DateDifference {
        let mut whole_months = end.month_ordinal() - start.month_ordinal();
        let mut days = i64::from(end.day()) - i64::from(start.day());

        // Borrow a month: count the remaining days from the birth day-of-month
        // in the month before `end`, clamped to that month's length.
        if whole_months > 0 && days < 0 {
            whole_months -= 1;

            let (prev_year, prev_month) = if end.month() == JANUARY {
                (end.year() - 1, DECEMBER)
            } else {
                (end.year(), end.month() - 1)
            };
            let anchor_day = start
                .day()
                .min(self.rule.month_length(prev_year, prev_month));
            days = end.epoch_day(self.rule) - self.rule.epoch_day(prev_year, prev_month, anchor_day);
        }

        let total_days = end.epoch_day(self.rule) - start.epoch_day(self.rule);
        debug_assert!(whole_months >= 0 && days >= 0 && total_days >= 0);

        DateDifference::from_parts(
            whole_months.unsigned_abs(),
            days.unsigned_abs(),
            total_days.unsigned_abs(),
        )
    }
}
