use sqlx::Row;
use survey_core::model::{PersistedRow, Rating, SessionId};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn exposure_index_from_i64(v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid exposure_index: {v}")))
}

pub(crate) fn rating_from_f64(field: &'static str, v: f64) -> Result<Rating, StorageError> {
    Rating::new(v).map_err(|e| StorageError::Serialization(format!("invalid {field}: {e}")))
}

pub(crate) fn map_response_row(row: &sqlx::sqlite::SqliteRow) -> Result<PersistedRow, StorageError> {
    let session_id: SessionId = row
        .try_get::<String, _>("session_id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let starting_score = rating_from_f64(
        "starting_score",
        row.try_get::<f64, _>("starting_score").map_err(ser)?,
    )?;
    let exposure_index =
        exposure_index_from_i64(row.try_get::<i64, _>("exposure_index").map_err(ser)?)?;
    let headline: String = row.try_get("headline").map_err(ser)?;
    let summary: String = row.try_get("summary").map_err(ser)?;
    let rating = rating_from_f64("rating", row.try_get::<f64, _>("rating").map_err(ser)?)?;

    Ok(PersistedRow {
        session_id,
        starting_score,
        exposure_index,
        headline,
        summary,
        rating,
    })
}

/// Unique-constraint violations mean the session was already saved.
pub(crate) fn map_insert_error(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
    }
    StorageError::Connection(err.to_string())
}
