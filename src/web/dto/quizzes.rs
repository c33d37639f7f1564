use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::quiz::TakeQuizOutcome;

/// One quiz attempt: the recorded submission plus how many questions the
/// quiz had at grading time, so clients can render "7/10" without another
/// round trip.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizSubmissionResponse {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub student_id: Uuid,
    pub score: i32,
    pub total_questions: usize,
    pub taken_at: DateTime<Utc>,
}

impl From<TakeQuizOutcome> for QuizSubmissionResponse {
    fn from(outcome: TakeQuizOutcome) -> Self {
        Self {
            id: outcome.submission.id(),
            quiz_id: outcome.submission.quiz_id(),
            student_id: outcome.submission.student_id(),
            score: outcome.submission.score(),
            total_questions: outcome.total_questions,
            taken_at: outcome.submission.taken_at(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TakeQuizRequest {
    pub student_id: Uuid,
    /// Question id → selected option ids. Unanswered questions are simply
    /// absent.
    pub answers_by_question: HashMap<Uuid, Vec<Uuid>>,
}
