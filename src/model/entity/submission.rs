use crate::model::error::DatabaseResult;
use crate::model::repo::ResourceTyped;
use crate::model::ModelManager;
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// One assignment hand-in. `UNIQUE (student_id, assignment_id)` in the
/// schema is the authoritative one-submission-per-student guarantee.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Submission {
    id: Uuid,
    assignment_id: Uuid,
    student_id: Uuid,
    submitted_at: DateTime<Utc>,
    content: String,
    score: Option<i32>,
    feedback: Option<String>,
}

pub struct SubmissionCreate {
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub content: String,
}

impl ResourceTyped for Submission {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Submission
    }
}

impl Submission {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn assignment_id(&self) -> Uuid {
        self.assignment_id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn score(&self) -> Option<i32> {
        self.score
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub async fn insert<'e, E>(executor: E, data: SubmissionCreate) -> DatabaseResult<Self>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let row = sqlx::query_as(
            r#"
            INSERT INTO submissions (id, assignment_id, student_id, submitted_at, content)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING id, assignment_id, student_id, submitted_at, content, score, feedback
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.assignment_id)
        .bind(data.student_id)
        .bind(data.submitted_at)
        .bind(&data.content)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn fetch_by_id<'e, E>(executor: E, id: Uuid) -> DatabaseResult<Option<Self>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query_as("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_one(executor)
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    pub async fn fetch_by_student_and_assignment<'e, E>(
        executor: E,
        student_id: Uuid,
        assignment_id: Uuid,
    ) -> DatabaseResult<Option<Self>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query_as(
            "SELECT * FROM submissions WHERE student_id = $1 AND assignment_id = $2",
        )
        .bind(student_id)
        .bind(assignment_id)
        .fetch_one(executor)
        .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    /// Overwrites score and feedback; grading twice is allowed and simply
    /// replaces the previous grade.
    pub async fn set_grade<'e, E>(
        mut self,
        executor: E,
        score: i32,
        feedback: Option<String>,
    ) -> DatabaseResult<Self>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query("UPDATE submissions SET score = $1, feedback = $2 WHERE id = $3")
            .bind(score)
            .bind(&feedback)
            .bind(self.id)
            .execute(executor)
            .await?;

        self.score = Some(score);
        self.feedback = feedback;
        Ok(self)
    }

    pub async fn find_all_by_assignment(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        assignment_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as(
            "SELECT * FROM submissions WHERE assignment_id = $1 ORDER BY submitted_at",
        )
        .bind(assignment_id)
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
            "SELECT * FROM submissions WHERE student_id = $1 ORDER BY submitted_at",
        )
        .bind(student_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
