//! Application configuration. Leap rule, reversed-date policy, output format.

use crate::{DateValidator, DifferenceCalculator, LeapRule, ReversedDates};
use serde::Deserialize;

/// Environment prefix: `AGE_SPAN_LEAP_RULE`, `AGE_SPAN_REVERSED`, `AGE_SPAN_OUTPUT`.
pub const ENV_PREFIX: &str = "AGE_SPAN";

/// Names an optional config file (any format the `config` crate understands).
pub const CONFIG_PATH_VAR: &str = "AGE_SPAN_CONFIG";

/// How a computed difference is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Multi-line "X years Y months Z Days / or ..." block
    #[default]
    Text,
    /// One JSON object with every field
    Json,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// `simplified` (every 4th year) or `gregorian`. Read from AGE_SPAN_LEAP_RULE.
    #[serde(default)]
    pub leap_rule: Option<LeapRule>,

    /// `reject` or `swap` when the reference date precedes the birth date. Read from AGE_SPAN_REVERSED.
    #[serde(default)]
    pub reversed: Option<ReversedDates>,

    /// `text` or `json`. Read from AGE_SPAN_OUTPUT.
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment wins over the file
        c = c.add_source(config::Environment::with_prefix(ENV_PREFIX));
        c.build()?.try_deserialize()
    }

    /// Returns the leap rule. Defaults to the simplified rule.
    pub fn leap_rule_or_default(&self) -> LeapRule {
        self.leap_rule.unwrap_or_default()
    }

    /// Returns the reversed-date policy. Defaults to rejecting.
    pub fn reversed_or_default(&self) -> ReversedDates {
        self.reversed.unwrap_or_default()
    }

    /// Returns the output format. Defaults to text.
    pub fn output_or_default(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }

    pub fn validator(&self) -> DateValidator {
        DateValidator::new(self.leap_rule_or_default())
    }

    pub fn calculator(&self) -> DifferenceCalculator {
        DifferenceCalculator::new(self.leap_rule_or_default())
            .with_reversed(self.reversed_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_overrides(pairs: &[(&str, &str)]) -> Result<AppConfig, config::ConfigError> {
        let mut builder = config::Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()?.try_deserialize()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.leap_rule_or_default(), LeapRule::Simplified);
        assert_eq!(cfg.reversed_or_default(), ReversedDates::Reject);
        assert_eq!(cfg.output_or_default(), OutputFormat::Text);
        assert_eq!(cfg.validator(), DateValidator::new(LeapRule::Simplified));
        assert_eq!(cfg.calculator(), DifferenceCalculator::default());
    }

    #[test]
    fn test_empty_source_deserializes_to_defaults() {
        let cfg = from_overrides(&[]).unwrap();
        assert!(cfg.leap_rule.is_none());
        assert!(cfg.reversed.is_none());
        assert!(cfg.output.is_none());
    }

    #[test]
    fn test_values_from_source() {
        let cfg = from_overrides(&[
            ("leap_rule", "gregorian"),
            ("reversed", "swap"),
            ("output", "json"),
        ])
        .unwrap();
        assert_eq!(cfg.leap_rule_or_default(), LeapRule::Gregorian);
        assert_eq!(cfg.reversed_or_default(), ReversedDates::Swap);
        assert_eq!(cfg.output_or_default(), OutputFormat::Json);

        let calc = cfg.calculator();
        assert_eq!(calc.rule(), LeapRule::Gregorian);
        assert_eq!(calc.reversed(), ReversedDates::Swap);
        assert_eq!(cfg.validator().rule(), LeapRule::Gregorian);
    }

    #[test]
    fn test_unknown_value_is_an_error() {
        assert!(from_overrides(&[("leap_rule", "julian")]).is_err());
    }
}
