//! Opinion-volatility scoring.
//!
//! The score is derived from the mean absolute difference between each
//! post-exposure rating and the starting score (`avg_delta`). It is never
//! stored; callers recompute it from the session's ratings on demand.

use crate::model::Rating;

/// Discrete volatility bucket shown to the participant once they finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLevel {
    /// Mean swing above 20 points.
    FlipFlopper,
    /// Mean swing above 10 points.
    MalleableMind,
    /// Mean swing above 5 points.
    ModeratelyMoved,
    /// Small swing, or no swing without a strong starting opinion.
    SteadySupporter,
    /// No meaningful swing from a starting score of 80 or more.
    Stan,
}

impl ScoreLevel {
    /// Numeric level on the 1–5 scale.
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            ScoreLevel::FlipFlopper => 1,
            ScoreLevel::MalleableMind => 2,
            ScoreLevel::ModeratelyMoved => 3,
            ScoreLevel::SteadySupporter => 4,
            ScoreLevel::Stan => 5,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreLevel::FlipFlopper => "Flip-Flopper",
            ScoreLevel::MalleableMind => "Malleable Mind",
            ScoreLevel::ModeratelyMoved => "Moderately Moved",
            ScoreLevel::SteadySupporter => "Steady Supporter",
            ScoreLevel::Stan => "Buttigieg Stan",
        }
    }
}

/// Starting score at or above which a steady participant counts as a fan.
pub const STAN_THRESHOLD: f64 = 80.0;

/// Mean absolute difference from the starting score; 0 for no responses.
#[must_use]
pub fn average_delta(starting_score: Rating, responses: &[Rating]) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }
    let total: f64 = responses
        .iter()
        .map(|rating| rating.distance(starting_score))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let count = responses.len() as f64;
    total / count
}

/// Map a session's ratings onto a volatility level. First matching band wins.
#[must_use]
pub fn compute_level(starting_score: Rating, responses: &[Rating]) -> ScoreLevel {
    let avg = average_delta(starting_score, responses);
    if avg > 20.0 {
        ScoreLevel::FlipFlopper
    } else if avg > 10.0 {
        ScoreLevel::MalleableMind
    } else if avg > 5.0 {
        ScoreLevel::ModeratelyMoved
    } else if avg > 2.0 {
        ScoreLevel::SteadySupporter
    } else if starting_score.value() >= STAN_THRESHOLD {
        ScoreLevel::Stan
    } else {
        ScoreLevel::SteadySupporter
    }
}

/// Everything the final screen reports about a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreReport {
    pub level: ScoreLevel,
    pub start: Rating,
    /// Last rating given; `None` when the survey had no exposures.
    pub end: Option<Rating>,
    pub avg_delta: f64,
}

impl ScoreReport {
    #[must_use]
    pub fn from_responses(starting_score: Rating, responses: &[Rating]) -> Self {
        Self {
            level: compute_level(starting_score, responses),
            start: starting_score,
            end: responses.last().copied(),
            avg_delta: average_delta(starting_score, responses),
        }
    }
}
