use thiserror::Error;
use uuid::Uuid;

use crate::model::{DatabaseError, ResourceType};

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Domain failures of the service layer. Every variant carries the ids it
/// complains about so the rendered message names the offender.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found: {1}")]
    NotFound(ResourceType, Uuid),

    #[error("Question {question_id} does not belong to quiz {quiz_id}")]
    QuestionNotInQuiz { question_id: Uuid, quiz_id: Uuid },

    #[error("Option {option_id} does not belong to question {question_id}")]
    OptionNotInQuestion { option_id: Uuid, question_id: Uuid },

    #[error("Student {student_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled { student_id: Uuid, course_id: Uuid },

    #[error("Student {student_id} has already submitted assignment {assignment_id}")]
    AlreadySubmitted {
        student_id: Uuid,
        assignment_id: Uuid,
    },

    #[error("Score cannot be negative")]
    NegativeScore,

    #[error("Score {score} exceeds maximum score {max_score} for this assignment")]
    ScoreExceedsMax { score: i32, max_score: i32 },

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    pub fn not_found(resource: ResourceType, id: Uuid) -> Self {
        Self::NotFound(resource, id)
    }

    /// True for the validation failures that reference an id outside its
    /// claimed parent (a bad request, not a missing resource).
    pub fn is_invalid_reference(&self) -> bool {
        matches!(
            self,
            Self::QuestionNotInQuiz { .. } | Self::OptionNotInQuestion { .. }
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyEnrolled { .. } | Self::AlreadySubmitted { .. }
        )
    }
}
