use chrono::Utc;
use survey_core::model::{PersistedRow, SessionId};

use super::SqliteResponseStore;
use super::mapping::{map_insert_error, map_response_row};
use crate::repository::{ResponseStore, StorageError};

impl SqliteResponseStore {
    /// Rows stored for one session, ordered by exposure index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails or a row cannot be mapped.
    pub async fn list_session_rows(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<PersistedRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    session_id, starting_score, exposure_index,
                    headline, summary, rating
                FROM survey_responses
                WHERE session_id = ?1
                ORDER BY exposure_index ASC
            ",
        )
        .bind(session_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_response_row).collect()
    }
}

#[async_trait::async_trait]
impl ResponseStore for SqliteResponseStore {
    async fn insert_batch(&self, rows: &[PersistedRow]) -> Result<usize, StorageError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let recorded_at = Utc::now();
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for row in rows {
            sqlx::query(
                r"
                    INSERT INTO survey_responses (
                        session_id, starting_score, exposure_index,
                        headline, summary, rating, recorded_at
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )
            .bind(row.session_id.to_string())
            .bind(row.starting_score.value())
            .bind(i64::from(row.exposure_index))
            .bind(&row.headline)
            .bind(&row.summary)
            .bind(row.rating.value())
            .bind(recorded_at)
            .execute(&mut *tx)
            .await
            .map_err(map_insert_error)?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        tracing::debug!(rows = rows.len(), "stored survey rows in sqlite");
        Ok(rows.len())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
