//! Numeric bounds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric interval with per-side inclusivity
///
/// A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    #[serde(default = "default_inclusive")]
    pub inclusive_lower: bool,
    #[serde(default = "default_inclusive")]
    pub inclusive_upper: bool,
}

fn default_inclusive() -> bool {
    true
}

impl Bounds {
    /// Closed interval `[lower, upper]`
    pub fn closed(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
            inclusive_lower: true,
            inclusive_upper: true,
        }
    }

    /// Open interval `(lower, upper)`
    pub fn open(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
            inclusive_lower: false,
            inclusive_upper: false,
        }
    }

    pub fn at_least(lower: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
            inclusive_lower: true,
            inclusive_upper: true,
        }
    }

    pub fn at_most(upper: f64) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
            inclusive_lower: true,
            inclusive_upper: true,
        }
    }

    pub fn with_inclusive(mut self, lower: bool, upper: bool) -> Self {
        self.inclusive_lower = lower;
        self.inclusive_upper = upper;
        self
    }

    pub fn contains(&self, x: f64) -> bool {
        if x.is_nan() {
            return false;
        }
        let above = match self.lower {
            Some(lo) if self.inclusive_lower => x >= lo,
            Some(lo) => x > lo,
            None => true,
        };
        let below = match self.upper {
            Some(hi) if self.inclusive_upper => x <= hi,
            Some(hi) => x < hi,
            None => true,
        };
        above && below
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.inclusive_lower { '[' } else { '(' };
        let close = if self.inclusive_upper { ']' } else { ')' };
        let lower = self
            .lower
            .map(|lo| lo.to_string())
            .unwrap_or_else(|| "-inf".to_string());
        let upper = self
            .upper
            .map(|hi| hi.to_string())
            .unwrap_or_else(|| "inf".to_string());
        write!(f, "{}{}, {}{}", open, lower, upper, close)
    }
}
