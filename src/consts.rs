/// Minimum valid year (inclusive); earlier years are rejected
pub const MIN_YEAR: i32 = 1000;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Longest month length; bound for a day checked without its month
pub const MAX_DAY: u8 = 31;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by the leap rule)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// English month names, index 0 is January
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Days in a common year
pub(crate) const DAYS_PER_COMMON_YEAR: i64 = 365;

pub const MONTHS_PER_YEAR: u32 = 12;
pub const HOURS_PER_DAY: u64 = 24;
pub const MINUTES_PER_HOUR: u64 = 60;
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
