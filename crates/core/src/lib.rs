#![forbid(unsafe_code)]

pub mod model;
pub mod score;
pub mod time;

pub use score::{ScoreLevel, ScoreReport, average_delta, compute_level};
pub use time::Clock;
