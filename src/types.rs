use crate::DateError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DAYS_PER_COMMON_YEAR, FEBRUARY, FEBRUARY_DAYS_LEAP,
    GREGORIAN_CYCLE, LEAP_YEAR_CYCLE, MAX_DAY, MAX_MONTH, MIN_YEAR, MONTH_NAMES,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// Which years get a 29th of February.
///
/// `Simplified` treats every year divisible by 4 as a leap year, so 1900 and
/// 2100 are leap years. `Gregorian` applies the century exceptions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LeapRule {
    #[default]
    #[display(fmt = "simplified")]
    Simplified,
    #[display(fmt = "gregorian")]
    Gregorian,
}

impl LeapRule {
    /// Whether `year` has a 29th of February under this rule
    pub const fn is_leap_year(self, year: i32) -> bool {
        match self {
            Self::Simplified => year % LEAP_YEAR_CYCLE == 0,
            Self::Gregorian => {
                (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0)
                    || year % GREGORIAN_CYCLE == 0
            }
        }
    }

    /// Number of days in `month` of `year` under this rule
    pub const fn days_in_month(self, year: i32, month: Month) -> u8 {
        self.month_length(year, month.get())
    }

    /// Raw-month form of `days_in_month`; `month` must be in 1..=12.
    pub(crate) const fn month_length(self, year: i32, month: u8) -> u8 {
        debug_assert!(month != 0 && month <= MAX_MONTH);

        if month == FEBRUARY && self.is_leap_year(year) {
            FEBRUARY_DAYS_LEAP
        } else {
            DAYS_IN_MONTH[month as usize]
        }
    }

    /// Number of days from the start of year 1 up to and including the given date.
    /// Only meaningful for positive years, which `Year` guarantees.
    pub(crate) fn epoch_day(self, year: i32, month: u8, day: u8) -> i64 {
        let prior = i64::from(year) - 1;
        let mut days = prior * DAYS_PER_COMMON_YEAR + prior / i64::from(LEAP_YEAR_CYCLE);
        if self == Self::Gregorian {
            days += prior / i64::from(GREGORIAN_CYCLE) - prior / i64::from(CENTURY_CYCLE);
        }

        for m in 1..month {
            days += i64::from(self.month_length(year, m));
        }

        days + i64::from(day)
    }
}

/// A year value guaranteed to be at least `MIN_YEAR` (1000).
/// There is no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Year(i32);

impl Year {
    /// Creates a new Year, validating that it's >= `MIN_YEAR`
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` if the value is below `MIN_YEAR`.
    pub fn new(value: i32) -> Result<Self, DateError> {
        if value < MIN_YEAR {
            return Err(DateError::InvalidYear(value));
        }
        Ok(Self(value))
    }

    /// Returns the year value as i32
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Year {
    type Error = DateError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for i32 {
    fn from(year: Year) -> Self {
        year.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, DateError> {
        let non_zero = NonZeroU8::new(value).ok_or(DateError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(DateError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Creates a Month from a zero-based index (0 is January), the order of
    /// `MONTH_NAMES`.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the index is 12 or more.
    pub fn from_index(index: usize) -> Result<Self, DateError> {
        let value = index
            .checked_add(1)
            .and_then(|v| u8::try_from(v).ok())
            .ok_or(DateError::InvalidMonth(u8::MAX))?;
        Self::new(value)
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Zero-based position of the month (0 is January)
    #[inline]
    pub const fn index(self) -> usize {
        self.0.get() as usize - 1
    }

    /// English name of the month
    pub const fn name(self) -> &'static str {
        MONTH_NAMES[self.index()]
    }
}

impl TryFrom<u8> for Month {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day-of-month value. `Day::new` checks it against a year, month and leap
/// rule; without that context (`TryFrom<u8>`, serde) it is only held to 1..=31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's positive and fits the month
    ///
    /// # Errors
    /// Returns `DateError::InvalidDay` if the value is below 1 or past the
    /// last day of the month under `rule`.
    pub fn new(value: i32, year: Year, month: Month, rule: LeapRule) -> Result<Self, DateError> {
        let invalid = || DateError::InvalidDay {
            year: year.get(),
            month: month.get(),
            day: value,
        };

        let max_day = rule.days_in_month(year.get(), month);
        let day = u8::try_from(value).map_err(|_| invalid())?;
        if day > max_day {
            return Err(invalid());
        }

        NonZeroU8::new(day).map(Self).ok_or_else(invalid)
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        NonZeroU8::new(value)
            .filter(|day| day.get() <= MAX_DAY)
            .map(Self)
            .ok_or(DateError::InvalidDay {
                year: 0,
                month: 0,
                day: i32::from(value),
            })
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u8) -> (Year, Month) {
        (Year::new(year).unwrap(), Month::new(month).unwrap())
    }

    #[test]
    fn test_year_new_valid() {
        assert!(Year::new(1000).is_ok());
        assert!(Year::new(2024).is_ok());
        assert!(Year::new(12_345).is_ok());
    }

    #[test]
    fn test_year_new_below_minimum() {
        assert!(matches!(Year::new(999), Err(DateError::InvalidYear(999))));
        assert!(matches!(Year::new(0), Err(DateError::InvalidYear(0))));
        assert!(matches!(Year::new(-5), Err(DateError::InvalidYear(-5))));
    }

    #[test]
    fn test_year_conversions() {
        let year: Year = 2024.try_into().unwrap();
        assert_eq!(year.get(), 2024);
        assert_eq!(year.to_string(), "2024");
        let raw: i32 = year.into();
        assert_eq!(raw, 2024);

        let result: Result<Year, _> = 500.try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_year_serde() {
        let year = Year::new(2024).unwrap();
        let json = serde_json::to_string(&year).unwrap();
        assert_eq!(json, "2024");

        let parsed: Year = serde_json::from_str(&json).unwrap();
        assert_eq!(year, parsed);

        assert!(serde_json::from_str::<Year>("999").is_err());
    }

    #[test]
    fn test_month_new() {
        for m in 1..=12 {
            assert!(Month::new(m).is_ok(), "Month {m} should be valid");
        }
        assert!(matches!(Month::new(0), Err(DateError::InvalidMonth(0))));
        assert!(matches!(Month::new(13), Err(DateError::InvalidMonth(13))));
    }

    #[test]
    fn test_month_from_index() {
        let january = Month::from_index(0).unwrap();
        assert_eq!(january.get(), 1);
        assert_eq!(january.index(), 0);
        assert_eq!(january.name(), "January");

        let december = Month::from_index(11).unwrap();
        assert_eq!(december.get(), 12);
        assert_eq!(december.name(), "December");

        assert!(Month::from_index(12).is_err());
        assert!(Month::from_index(usize::MAX).is_err());
    }

    #[test]
    fn test_month_serde() {
        let month = Month::new(8).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "8");
        let parsed: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(month, parsed);
        assert!(serde_json::from_str::<Month>("13").is_err());
    }

    #[test]
    fn test_day_new_valid() {
        let rule = LeapRule::Simplified;

        let (y, m) = ym(2024, 1);
        assert!(Day::new(1, y, m, rule).is_ok());
        assert!(Day::new(31, y, m, rule).is_ok());
        assert!(Day::new(32, y, m, rule).is_err());

        let (y, m) = ym(2023, 2);
        assert!(Day::new(28, y, m, rule).is_ok());
        assert!(Day::new(29, y, m, rule).is_err());

        let (y, m) = ym(2024, 2);
        assert!(Day::new(29, y, m, rule).is_ok());
        assert!(Day::new(30, y, m, rule).is_err());

        let (y, m) = ym(2024, 4);
        assert!(Day::new(30, y, m, rule).is_ok());
        assert!(Day::new(31, y, m, rule).is_err());
    }

    #[test]
    fn test_day_new_rejects_zero_and_negative() {
        let (y, m) = ym(2024, 1);
        assert!(matches!(
            Day::new(0, y, m, LeapRule::Simplified),
            Err(DateError::InvalidDay { day: 0, .. })
        ));
        assert!(matches!(
            Day::new(-3, y, m, LeapRule::Simplified),
            Err(DateError::InvalidDay { day: -3, .. })
        ));
        assert!(matches!(
            Day::new(300, y, m, LeapRule::Simplified),
            Err(DateError::InvalidDay {
                year: 2024,
                month: 1,
                day: 300
            })
        ));
    }

    #[test]
    fn test_day_try_from_u8() {
        let day: Day = 15.try_into().unwrap();
        assert_eq!(day.get(), 15);
        assert_eq!(day.to_string(), "15");

        let result: Result<Day, _> = 0.try_into();
        assert!(result.is_err());

        let result: Result<Day, _> = 32.try_into();
        assert!(matches!(result, Err(DateError::InvalidDay { day: 32, .. })));
    }

    #[test]
    fn test_day_serde_bounds() {
        let day: Day = serde_json::from_str("31").unwrap();
        assert_eq!(day.get(), 31);
        assert_eq!(serde_json::to_string(&day).unwrap(), "31");

        assert!(serde_json::from_str::<Day>("0").is_err());
        assert!(serde_json::from_str::<Day>("32").is_err());
        assert!(serde_json::from_str::<Day>("200").is_err());
    }

    #[test]
    fn test_leap_rule_cases() {
        struct TestCase {
            year: i32,
            simplified: bool,
            gregorian: bool,
        }

        let cases = [
            TestCase { year: 2020, simplified: true, gregorian: true },
            TestCase { year: 2023, simplified: false, gregorian: false },
            TestCase { year: 1900, simplified: true, gregorian: false },
            TestCase { year: 2100, simplified: true, gregorian: false },
            TestCase { year: 2000, simplified: true, gregorian: true },
            TestCase { year: 2400, simplified: true, gregorian: true },
        ];

        for case in &cases {
            assert_eq!(
                LeapRule::Simplified.is_leap_year(case.year),
                case.simplified,
                "Year {} under the simplified rule",
                case.year
            );
            assert_eq!(
                LeapRule::Gregorian.is_leap_year(case.year),
                case.gregorian,
                "Year {} under the Gregorian rule",
                case.year
            );
        }
    }

    #[test]
    fn test_days_in_month_table() {
        let expected = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for month in 1..=12 {
            assert_eq!(
                LeapRule::Simplified.days_in_month(2023, Month::new(month).unwrap()),
                expected[month as usize],
                "Month {month} has incorrect day count"
            );
        }
        let february = Month::new(2).unwrap();
        assert_eq!(LeapRule::Simplified.days_in_month(1900, february), 29);
        assert_eq!(LeapRule::Gregorian.days_in_month(1900, february), 28);
    }

    #[test]
    fn test_days_in_month_needs_a_real_month() {
        // Out-of-range months are stopped when the Month is built
        for raw in [0, 13, u8::MAX] {
            let length = Month::new(raw).map(|m| LeapRule::Simplified.days_in_month(2020, m));
            assert!(matches!(length, Err(DateError::InvalidMonth(v)) if v == raw));
        }
    }

    #[test]
    fn test_epoch_day() {
        let rule = LeapRule::Simplified;
        assert_eq!(rule.epoch_day(1, 1, 1), 1);
        assert_eq!(rule.epoch_day(2000, 3, 1) - rule.epoch_day(2000, 2, 28), 2);
        assert_eq!(rule.epoch_day(2001, 1, 1) - rule.epoch_day(2000, 1, 1), 366);

        // 1900 only has a 29th of February under the simplified rule
        assert_eq!(rule.epoch_day(1901, 1, 1) - rule.epoch_day(1900, 1, 1), 366);
        let gregorian = LeapRule::Gregorian;
        assert_eq!(
            gregorian.epoch_day(1901, 1, 1) - gregorian.epoch_day(1900, 1, 1),
            365
        );
    }

    #[test]
    fn test_leap_rule_display_and_serde() {
        assert_eq!(LeapRule::Gregorian.to_string(), "gregorian");
        assert_eq!(LeapRule::default(), LeapRule::Simplified);

        let json = serde_json::to_string(&LeapRule::Gregorian).unwrap();
        assert_eq!(json, r#""gregorian""#);
        let parsed: LeapRule = serde_json::from_str(r#""simplified""#).unwrap();
        assert_eq!(parsed, LeapRule::Simplified);
        assert!(serde_json::from_str::<LeapRule>(r#""julian""#).is_err());
    }
}
