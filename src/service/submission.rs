//! Duplicate-safe assignment submissions and grading. Same guard shape as
//! enrollment: pre-check for the message, UNIQUE constraint for the
//! guarantee.

use chrono::Utc;
use uuid::Uuid;

use crate::model::{
    ModelManager, ResourceType,
    entity::{Assignment, Submission, SubmissionCreate, UserEntity},
};
use crate::service::{ServiceError, ServiceResult};

#[tracing::instrument(skip(mm, content))]
pub async fn submit(
    mm: &ModelManager,
    student_id: Uuid,
    assignment_id: Uuid,
    content: String,
) -> ServiceResult<Submission> {
    let mut tx = mm.begin().await?;

    let student = UserEntity::fetch_by_id(&mut *tx, student_id)
        .await?
        .ok_or(ServiceError::not_found(ResourceType::User, student_id))?;

    let assignment = Assignment::fetch_by_id(&mut *tx, assignment_id)
        .await?
        .ok_or(ServiceError::not_found(
            ResourceType::Assignment,
            assignment_id,
        ))?;

    if Submission::fetch_by_student_and_assignment(&mut *tx, student.id(), assignment.id())
        .await?
        .is_some()
    {
        return Err(ServiceError::AlreadySubmitted {
            student_id,
            assignment_id,
        });
    }

    let result = Submission::insert(
        &mut *tx,
        SubmissionCreate {
            assignment_id: assignment.id(),
            student_id: student.id(),
            submitted_at: Utc::now(),
            content,
        },
    )
    .await;

    match result {
        Ok(submission) => {
            tx.commit().await.map_err(crate::model::DatabaseError::from)?;
            Ok(submission)
        }
        Err(e) if e.is_unique_violation() => Err(ServiceError::AlreadySubmitted {
            student_id,
            assignment_id,
        }),
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(skip(mm, feedback))]
pub async fn grade(
    mm: &ModelManager,
    submission_id: Uuid,
    score: i32,
    feedback: Option<String>,
) -> ServiceResult<Submission> {
    let mut tx = mm.begin().await?;

    let submission = Submission::fetch_by_id(&mut *tx, submission_id)
        .await?
        .ok_or(ServiceError::not_found(
            ResourceType::Submission,
            submission_id,
        ))?;

    let assignment = Assignment::fetch_by_id(&mut *tx, submission.assignment_id())
        .await?
        .ok_or(ServiceError::not_found(
            ResourceType::Assignment,
            submission.assignment_id(),
        ))?;

    validate_score(score, assignment.max_score())?;

    let graded = submission.set_grade(&mut *tx, score, feedback).await?;
    tx.commit().await.map_err(crate::model::DatabaseError::from)?;

    Ok(graded)
}

/// Negative scores are rejected first; the max-score cap only applies when
/// the assignment has one. A score equal to the cap is valid.
fn validate_score(score: i32, max_score: Option<i32>) -> ServiceResult<()> {
    if score < 0 {
        return Err(ServiceError::NegativeScore);
    }

    if let Some(max_score) = max_score {
        if score > max_score {
            return Err(ServiceError::ScoreExceedsMax { score, max_score });
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn negative_score_rejected() {
        let err = validate_score(-1, None).unwrap_err();
        assert!(matches!(err, ServiceError::NegativeScore));

        // negative wins even when it would also exceed nothing
        let err = validate_score(-5, Some(100)).unwrap_err();
        assert!(matches!(err, ServiceError::NegativeScore));
    }

    #[test]
    fn score_above_max_rejected() {
        let err = validate_score(101, Some(100)).unwrap_err();
        match err {
            ServiceError::ScoreExceedsMax { score, max_score } => {
                assert_eq!(score, 101);
                assert_eq!(max_score, 100);
                assert!(err_msg(&ServiceError::ScoreExceedsMax { score, max_score })
                    .contains("exceeds maximum score"));
            }
            other => panic!("expected ScoreExceedsMax, got {other:?}"),
        }
    }

    #[test]
    fn score_at_max_accepted() {
        assert!(validate_score(100, Some(100)).is_ok());
        assert!(validate_score(0, Some(100)).is_ok());
    }

    #[test]
    fn unlimited_when_no_max() {
        assert!(validate_score(10_000, None).is_ok());
    }

    fn err_msg(e: &ServiceError) -> String {
        e.to_string()
    }
}
