//! Exam record
//!
//! The shape the caller persists after a successful analysis. The relay
//! never builds or stores one; this lives here so every caller agrees on
//! the columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::relay::AnalysisResult;

/// Exam lifecycle as shown in the history list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    Processing,
    Completed,
    Failed,
}

/// Persisted exam row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: Uuid,
    pub user_id: String,
    pub image_name: String,
    /// Where the caller stored the image bytes
    pub image_url: String,
    pub diagnosis: String,
    pub confidence: f64,
    pub status: ExamStatus,
    pub created_at: DateTime<Utc>,
}

impl Exam {
    /// Combine a successful analysis with caller-owned metadata
    pub fn completed(
        user_id: impl Into<String>,
        image_name: impl Into<String>,
        image_url: impl Into<String>,
        result: AnalysisResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            image_name: image_name.into(),
            image_url: image_url.into(),
            diagnosis: result.diagnosis_text,
            confidence: result.confidence_score,
            status: ExamStatus::Completed,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_exam_carries_result() {
        let result = AnalysisResult {
            diagnosis_text: "Conclusão: normal".to_string(),
            confidence_score: 80.3,
        };

        let exam = Exam::completed("user-1", "torax.jpg", "xray-images/user-1/torax.jpg", result);

        assert_eq!(exam.user_id, "user-1");
        assert_eq!(exam.diagnosis, "Conclusão: normal");
        assert_eq!(exam.confidence, 80.3);
        assert_eq!(exam.status, ExamStatus::Completed);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ExamStatus::Completed).unwrap(), "completed");
        assert_eq!(serde_json::to_value(ExamStatus::Failed).unwrap(), "failed");
    }
}
