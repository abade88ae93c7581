//! Donor age ranges normalised to seconds.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const YEAR: f64 = 365.0 * DAY;
const MONTH: f64 = YEAR / 12.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgeError {
    #[error("invalid age {0:?}: expected a number or a range like \"20-30\"")]
    InvalidAge(String),

    #[error("unknown age unit {0:?}")]
    UnknownUnit(String),

    #[error("invalid age range {0:?}: minimum exceeds maximum")]
    Inverted(String),
}

/// Units an organism age may be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl AgeUnit {
    /// Length of one unit in seconds.
    pub fn seconds(self) -> f64 {
        match self {
            Self::Second => 1.0,
            Self::Minute => MINUTE,
            Self::Hour => HOUR,
            Self::Day => DAY,
            Self::Week => WEEK,
            Self::Month => MONTH,
            Self::Year => YEAR,
        }
    }
}

impl FromStr for AgeUnit {
    type Err = AgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let singular = normalized.strip_suffix('s').unwrap_or(&normalized);
        match singular {
            "second" => Ok(Self::Second),
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(AgeError::UnknownUnit(s.to_owned())),
        }
    }
}

/// A closed interval `[min, max]` of ages in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
}

impl AgeRange {
    /// Parses an age (`"20"` or `"20-30"`) expressed in `unit`.
    pub fn parse(age: &str, unit: &str) -> Result<Self, AgeError> {
        let unit: AgeUnit = unit.parse()?;
        let number = |s: &str| -> Result<f64, AgeError> {
            let s = s.trim();
            s.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .ok_or_else(|| AgeError::InvalidAge(age.to_owned()))
        };
        let (min, max) = match age.split_once('-') {
            Some((min, max)) => (number(min)?, number(max)?),
            None => {
                let n = number(age)?;
                (n, n)
            }
        };
        if min > max {
            return Err(AgeError::Inverted(age.to_owned()));
        }
        Ok(Self {
            min: min * unit.seconds(),
            max: max * unit.seconds(),
        })
    }

    pub fn contains(&self, seconds: f64) -> bool {
        self.min <= seconds && seconds <= self.max
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} s", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_value() {
        assert_eq!(
            AgeRange::parse("20", "year").unwrap(),
            AgeRange { min: 20.0 * YEAR, max: 20.0 * YEAR }
        );
    }

    #[test]
    fn range_with_whitespace() {
        let range = AgeRange::parse("20 - 30", "years").unwrap();
        assert_eq!(range.min, 630_720_000.0);
        assert_eq!(range.max, 946_080_000.0);
        assert!(range.contains(25.0 * YEAR));
    }

    #[test]
    fn all_units() {
        let cases = [
            ("second", 1.0),
            ("minutes", 60.0),
            ("Hour", 3600.0),
            ("days", 86_400.0),
            ("week", 604_800.0),
            ("month", 2_628_000.0),
            ("year", 31_536_000.0),
        ];
        for (unit, seconds) in cases {
            assert_eq!(AgeRange::parse("1", unit).unwrap().min, seconds, "{unit}");
        }
    }

    #[test]
    fn errors() {
        assert_eq!(
            AgeRange::parse("20", "fortnight"),
            Err(AgeError::UnknownUnit("fortnight".into()))
        );
        assert_eq!(AgeRange::parse("abc", "year"), Err(AgeError::InvalidAge("abc".into())));
        assert_eq!(AgeRange::parse("20-", "year"), Err(AgeError::InvalidAge("20-".into())));
        assert_eq!(AgeRange::parse("30-20", "year"), Err(AgeError::Inverted("30-20".into())));
    }
}
