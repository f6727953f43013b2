use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum RatingError {
    #[error("rating must be a finite number")]
    NotFinite,

    #[error("rating {0} is outside 0..=100")]
    OutOfRange(f64),
}

/// Opinion score on the 0–100 slider scale.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;
    /// Granularity of the slider controls.
    pub const STEP: f64 = 0.1;
    /// Where the starting slider sits before the participant touches it.
    pub const NEUTRAL: Rating = Rating(50.0);

    /// Validate a raw slider value.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::NotFinite` for NaN/infinite input and
    /// `RatingError::OutOfRange` when the value falls outside `0..=100`.
    pub fn new(value: f64) -> Result<Self, RatingError> {
        if !value.is_finite() {
            return Err(RatingError::NotFinite);
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RatingError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Clamp arbitrary input onto the scale. NaN maps to the neutral midpoint.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::NEUTRAL;
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Absolute distance between two ratings.
    #[must_use]
    pub fn distance(self, other: Rating) -> f64 {
        (self.0 - other.0).abs()
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl TryFrom<f64> for Rating {
    type Error = RatingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Debug for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rating({})", self.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Rating::new(0.0).unwrap().value(), 0.0);
        assert_eq!(Rating::new(100.0).unwrap().value(), 100.0);
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert_eq!(Rating::new(100.1), Err(RatingError::OutOfRange(100.1)));
        assert_eq!(Rating::new(-1.0), Err(RatingError::OutOfRange(-1.0)));
        assert_eq!(Rating::new(f64::NAN), Err(RatingError::NotFinite));
    }

    #[test]
    fn clamps_to_scale() {
        assert_eq!(Rating::clamped(140.0).value(), 100.0);
        assert_eq!(Rating::clamped(-3.0).value(), 0.0);
        assert_eq!(Rating::clamped(f64::NAN), Rating::NEUTRAL);
    }

    #[test]
    fn displays_one_decimal() {
        assert_eq!(Rating::new(72.26).unwrap().to_string(), "72.3");
        assert_eq!(Rating::NEUTRAL.to_string(), "50.0");
    }

    #[test]
    fn deserialize_validates_range() {
        let ok: Rating = serde_json::from_str("12.5").unwrap();
        assert_eq!(ok.value(), 12.5);
        assert!(serde_json::from_str::<Rating>("120").is_err());
    }
}
