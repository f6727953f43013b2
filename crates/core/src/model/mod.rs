mod exposure;
mod ids;
mod payload;
mod rating;
mod session;

pub use exposure::{Exposure, ExposureError};
pub use ids::{ParseIdError, SessionId};
pub use payload::{PayloadError, PersistedRow, assemble_rows};
pub use rating::{Rating, RatingError};
pub use session::SessionPhase;
