//! Style Lengths
//!
//! A declared length is either a fixed pixel value, a percentage of some
//! reference size, or `auto`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared style length
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Length {
    /// Left to the layout algorithm
    #[default]
    Auto,
    /// Absolute size in pixels
    Fixed(f32),
    /// Percentage of a reference size (`50.0` is 50%)
    Percent(f32),
}

impl Length {
    /// Zero pixels
    pub const ZERO: Length = Length::Fixed(0.0);

    /// Fixed pixel length
    pub fn px(value: f32) -> Self {
        Length::Fixed(value)
    }

    /// Percentage length
    pub fn percent(value: f32) -> Self {
        Length::Percent(value)
    }

    /// Resolve against a reference size.
    ///
    /// `Auto` resolves to 0. A NaN reference propagates through percentages.
    pub fn resolve(self, reference: f32) -> f32 {
        match self {
            Length::Fixed(value) => value,
            Length::Percent(value) => reference * value / 100.0,
            Length::Auto => 0.0,
        }
    }

    /// Resolve to a definite size, if there is one.
    ///
    /// `None` for `Auto` and for a percentage of an indefinite (NaN) reference.
    pub fn resolve_definite(self, reference: f32) -> Option<f32> {
        match self {
            Length::Auto => None,
            Length::Fixed(value) => Some(value),
            Length::Percent(value) => {
                let resolved = reference * value / 100.0;
                (!resolved.is_nan()).then_some(resolved)
            }
        }
    }

    /// Resolve, treating `Auto` and indefinite percentages as 0.
    pub(crate) fn resolve_or_zero(self, reference: f32) -> f32 {
        self.resolve_definite(reference).unwrap_or(0.0)
    }

    pub fn is_auto(self) -> bool {
        matches!(self, Length::Auto)
    }
}

impl From<f32> for Length {
    fn from(value: f32) -> Self {
        Length::Fixed(value)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Auto => f.write_str("auto"),
            Length::Fixed(value) => write!(f, "{value}px"),
            Length::Percent(value) => write!(f, "{value}%"),
        }
    }
}
