use crate::model::error::DatabaseResult;
use crate::model::repo::ResourceTyped;
use crate::model::ModelManager;
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// One quiz attempt. Attempts are never merged or deduplicated; a student
/// may have any number of rows per quiz.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct QuizSubmission {
    id: Uuid,
    quiz_id: Uuid,
    student_id: Uuid,
    score: i32,
    taken_at: DateTime<Utc>,
}

pub struct QuizSubmissionCreate {
    pub quiz_id: Uuid,
    pub student_id: Uuid,
    pub score: i32,
    pub taken_at: DateTime<Utc>,
}

impl ResourceTyped for QuizSubmission {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::QuizSubmission
    }
}

impl QuizSubmission {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz_id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub async fn insert<'e, E>(executor: E, data: QuizSubmissionCreate) -> DatabaseResult<Self>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let row = sqlx::query_as(
            r#"
            INSERT INTO quiz_submissions (id, quiz_id, student_id, score, taken_at)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING id, quiz_id, student_id, score, taken_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.quiz_id)
        .bind(data.student_id)
        .bind(data.score)
        .bind(data.taken_at)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn find_all_by_quiz(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        quiz_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> =
            sqlx::query_as("SELECT * FROM quiz_submissions WHERE quiz_id = $1 ORDER BY taken_at")
                .bind(quiz_id)
                .fetch_all(mm.executor())
                .await?;

        Ok(rows)
    }

    pub async fn find_all_by_student(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        student_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as(
            "SELECT * FROM quiz_submissions WHERE student_id = $1 ORDER BY taken_at",
        )
        .bind(student_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
