//! Percentage value object rounded to one decimal place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A share of a whole on the 0-100 scale, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0.0);

    /// Computes `part / whole * 100`, rounded half away from zero to one decimal.
    ///
    /// A zero `whole` yields zero.
    pub fn from_ratio(part: u64, whole: u64) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let tenths = (part as f64 * 1000.0 / whole as f64).round();
        Self(tenths / 10.0)
    }

    /// Returns the value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}
