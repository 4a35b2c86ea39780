//! Migration version numbers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Version number of a migration.
///
/// Wraps an `f64`. When the version was read from a migration document, the
/// literal it was written as is kept so that [`Display`](fmt::Display)
/// reproduces the original text exactly (`1.0` stays `1.0`, and so does a
/// literal with more digits than an `f64` can hold).
///
/// Equality and ordering only look at the numeric value.
#[derive(Debug, Clone)]
pub struct Version {
    value: f64,
    literal: Option<Box<str>>,
}

impl Version {
    /// Create a version from a number, formatted with the shortest representation.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            literal: None,
        }
    }

    /// Create a version that formats with exactly `precision` fractional digits.
    pub fn with_precision(value: f64, precision: usize) -> Self {
        Self {
            value,
            literal: Some(format!("{:.*}", precision, value).into_boxed_str()),
        }
    }

    /// Parse a decimal literal such as `1`, `1.10` or `-2.5`.
    ///
    /// Returns `None` for anything that is not `[-+]?digits[.digits]`.
    pub fn parse(literal: &str) -> Option<Self> {
        let unsigned = literal
            .strip_prefix('-')
            .or_else(|| literal.strip_prefix('+'))
            .unwrap_or(literal);

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
            return None;
        }

        let value: f64 = literal.parse().ok()?;
        Some(Self {
            value,
            literal: Some(literal.into()),
        })
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The text this version was written as, if it came from a literal.
    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    /// Fractional digits this version was written with, if known.
    pub fn precision(&self) -> Option<usize> {
        self.literal
            .as_deref()
            .map(|l| l.split_once('.').map_or(0, |(_, frac)| frac.len()))
    }

    /// Whether this version is a legal migration version (finite and > 0).
    pub fn is_positive(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Some(literal) => f.write_str(literal),
            None => write!(f, "{}", self.value),
        }
    }
}

impl From<f64> for Version {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Version {
    fn from(value: i32) -> Self {
        Self::new(f64::from(value))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
