//! Command-line front end. Collects two dates, shows READY/ERROR for each,
//! and prints the difference.
//!
//! Dates come either from arguments (`YYYY-MM-DD`) or from inquire prompts.
//! Nothing here does calendar arithmetic; it only turns text into
//! [`CalendarDate`] values and hands them to the calculator.

use crate::config::{AppConfig, OutputFormat};
use crate::{
    CalendarDate, DateDifference, DateError, DateValidator, DifferenceCalculator, MONTH_NAMES,
    Month, SpanError, Validity,
};
use chrono::{Datelike, NaiveDate};
use inquire::{Select, Text};
use tracing::{debug, info};

pub const USAGE: &str = "usage: age-span [DATE_OF_BIRTH [REFERENCE_DATE]]\n\
    dates are YYYY-MM-DD; the reference date defaults to today;\n\
    with no arguments the dates are asked for interactively";

/// Text in a numeric field that is not a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("please enter valid numbers: {field} {value:?} is not a number")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Span(#[from] SpanError),

    #[error("prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("could not encode result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
}

/// Parses a day or year field, keeping the field name for the error.
///
/// # Errors
/// Returns `InputError::InvalidNumber` if `text` is not an integer.
pub fn parse_number(field: &'static str, text: &str) -> Result<i32, InputError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| InputError::InvalidNumber {
            field,
            value: text.to_owned(),
        })
}

/// Converts a chrono date (e.g. today) into a checked calendar date.
///
/// # Errors
/// Returns the `DateError` if the date is not valid for `validator`.
pub fn from_naive(date: NaiveDate, validator: &DateValidator) -> Result<CalendarDate, DateError> {
    let month = u8::try_from(date.month()).map_err(|_| DateError::InvalidMonth(u8::MAX))?;
    let day = i32::try_from(date.day()).map_err(|_| DateError::InvalidFormat(date.to_string()))?;
    validator.check(date.year(), month, day)
}

/// Result of one pass through a date form: the line to show and, once the
/// date is accepted, the date itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub message: String,
    pub date: Option<CalendarDate>,
}

impl Attempt {
    /// Whether the form has to be asked again
    pub const fn needs_retry(&self) -> bool {
        self.date.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Shell {
    validator: DateValidator,
    calculator: DifferenceCalculator,
    output: OutputFormat,
}

impl Shell {
    /// Builds the shell from the loaded configuration
    pub fn new(config: &AppConfig) -> Self {
        Self {
            validator: config.validator(),
            calculator: config.calculator(),
            output: config.output_or_default(),
        }
    }

    /// Checks one side of the form: day and year as typed, month as picked.
    ///
    /// # Errors
    /// Returns `InputError` if the day or year text is not a number. A number
    /// that makes an impossible date is reported as `Validity::Invalid` instead.
    pub fn check(
        &self,
        year: &str,
        month: Month,
        day: &str,
    ) -> Result<(Validity, Option<CalendarDate>), InputError> {
        let year = parse_number("year", year)?;
        let day = parse_number("day", day)?;
        let date = self.validator.check(year, month.get(), day).ok();
        let validity = if date.is_some() {
            Validity::Valid
        } else {
            Validity::Invalid
        };
        Ok((validity, date))
    }

    /// Checks one filled-in form and decides what to show next.
    ///
    /// A valid date gives `"{label} : READY"` and the date. An impossible date
    /// gives `"{label} : ERROR"`, and text that is not a number gives the input
    /// error message; both leave `date` empty so the form is asked again.
    pub fn attempt(&self, label: &str, year: &str, month: Month, day: &str) -> Attempt {
        match self.check(year, month, day) {
            Ok((validity, date)) => {
                if date.is_none() {
                    debug!(label, %year, %day, month = month.get(), "rejected date");
                }
                Attempt {
                    message: format!("{label} : {validity}"),
                    date,
                }
            }
            Err(err) => Attempt {
                message: err.to_string(),
                date: None,
            },
        }
    }

    /// Difference from `birth` to `reference`.
    ///
    /// # Errors
    /// Propagates the calculator's `SpanError`.
    pub fn calculate(
        &self,
        birth: &CalendarDate,
        reference: &CalendarDate,
    ) -> Result<DateDifference, SpanError> {
        self.calculator.between(birth, reference)
    }

    /// Formats a difference in the configured output format.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if JSON encoding fails.
    pub fn render(&self, difference: &DateDifference) -> Result<String, serde_json::Error> {
        match self.output {
            OutputFormat::Text => Ok(difference.to_string()),
            OutputFormat::Json => serde_json::to_string_pretty(difference),
        }
    }

    /// Argument mode: `[birth]` or `[birth, reference]`, reference defaulting to `today`.
    ///
    /// # Errors
    /// Returns `ShellError::Usage` for a wrong argument count, or the date or
    /// span error for bad dates.
    pub fn run_args(&self, args: &[String], today: NaiveDate) -> Result<String, ShellError> {
        let (birth, reference) = match args {
            [birth] => (self.parse_date(birth)?, from_naive(today, &self.validator)?),
            [birth, reference] => (self.parse_date(birth)?, self.parse_date(reference)?),
            _ => {
                return Err(ShellError::Usage(format!(
                    "expected 1 or 2 dates, found {}",
                    args.len()
                )));
            }
        };
        info!(%birth, %reference, "calculating from arguments");
        self.finish(&birth, &reference)
    }

    /// Interactive mode: asks for the date of birth and the reference date
    /// (pre-filled with `today`), re-asking each until it is valid.
    ///
    /// # Errors
    /// Returns `ShellError::Prompt` if the terminal prompt is cancelled, or
    /// the span error if the dates are out of order.
    pub fn run_interactive(&self, today: NaiveDate) -> Result<String, ShellError> {
        let birth = self.prompt_date("DATE OF BIRTH", None)?;
        let reference = self.prompt_date("AGE AT THE DATE OF", Some(today))?;
        self.finish(&birth, &reference)
    }

    fn finish(&self, birth: &CalendarDate, reference: &CalendarDate) -> Result<String, ShellError> {
        let difference = self.calculate(birth, reference)?;
        Ok(self.render(&difference)?)
    }

    fn parse_date(&self, text: &str) -> Result<CalendarDate, DateError> {
        CalendarDate::parse_with(text, self.validator.rule())
    }

    fn prompt_date(&self, label: &str, prefill: Option<NaiveDate>) -> Result<CalendarDate, ShellError> {
        let cursor = prefill.map_or(0, |d| d.month0() as usize);
        let day_default = prefill.map(|d| d.day().to_string()).unwrap_or_default();
        let year_default = prefill.map(|d| d.year().to_string()).unwrap_or_default();

        loop {
            let picked = Select::new(&format!("{label} - month:"), MONTH_NAMES.to_vec())
                .with_starting_cursor(cursor)
                .raw_prompt()?;
            let month = Month::from_index(picked.index)?;
            let day = Text::new(&format!("{label} - day:"))
                .with_default(&day_default)
                .prompt()?;
            let year = Text::new(&format!("{label} - year:"))
                .with_default(&year_default)
                .prompt()?;

            let attempt = self.attempt(label, &year, month, &day);
            println!("{}", attempt.message);
            if let Some(date) = attempt.date {
                return Ok(date);
            }
        }
    }
}
