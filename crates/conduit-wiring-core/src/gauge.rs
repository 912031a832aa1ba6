//! Gauge designations.
//!
//! Models store wire gauges as locale-formatted strings (`"2.5"`, `"4"`,
//! `"6,0"`). Target parameter names always use the decimal-comma form with at
//! least one decimal place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized gauge designation such as `2,5` or `4,0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gauge(String);

impl Gauge {
    /// Normalize a raw gauge string read from the model.
    ///
    /// `.` becomes `,`; a value with no decimal separator gets `,0`.
    pub fn normalize(raw: &str) -> Self {
        let mut gauge = raw.trim().replace('.', ",");
        if !gauge.contains(',') {
            gauge.push_str(",0");
        }
        Gauge(gauge)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Gauge {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
