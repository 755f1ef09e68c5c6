use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// One student submission. Records are never changed once appended.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub student_id: String,
    pub score: u32,
    #[serde(rename = "totalQuestions")]
    pub total: u32,
    pub quiz_name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn new(
        student_id: &str,
        score: u32,
        total: u32,
        quiz_name: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Self> {
        let record = AttemptRecord {
            student_id: student_id.to_string(),
            score,
            total,
            quiz_name: quiz_name.to_string(),
            timestamp,
        };
        record.validate()?;
        Ok(record)
    }

    /// `0 <= score <= total` and `total > 0`. Deserialized records skip `new`,
    /// so restored data is checked with this.
    pub fn validate(&self) -> AppResult<()> {
        if self.total == 0 {
            return Err(AppError::ValidationError(
                "Attempt total must be greater than zero".to_string(),
            ));
        }
        if self.score > self.total {
            return Err(AppError::ValidationError(format!(
                "Attempt score {} exceeds total {}",
                self.score, self.total
            )));
        }
        Ok(())
    }
}
