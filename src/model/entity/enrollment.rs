use crate::model::error::DatabaseResult;
use crate::model::repo::ResourceTyped;
use crate::model::ModelManager;
use crate::web::AuthenticatedUser;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// One (student, course) membership. The table carries
/// `UNIQUE (student_id, course_id)`; `insert` surfaces its violation through
/// `DatabaseError::is_unique_violation` for the write guard to translate.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Enrollment {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    enroll_date: NaiveDate,
    status: String,
}

pub struct EnrollmentCreate {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enroll_date: NaiveDate,
    pub status: String,
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Enrollment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn enroll_date(&self) -> NaiveDate {
        self.enroll_date
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub async fn insert<'e, E>(executor: E, data: EnrollmentCreate) -> DatabaseResult<Self>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let row = sqlx::query_as(
            r#"
            INSERT INTO enrollments (id, student_id, course_id, enroll_date, status)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING id, student_id, course_id, enroll_date, status
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(data.course_id)
        .bind(data.enroll_date)
        .bind(&data.status)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn fetch_by_student_and_course<'e, E>(
        executor: E,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Option<Self>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result =
            sqlx::query_as("SELECT * FROM enrollments WHERE student_id = $1 AND course_id = $2")
                .bind(student_id)
                .bind(course_id)
                .fetch_one(executor)
                .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    pub async fn delete<'e, E>(self, executor: E) -> DatabaseResult<()>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(self.id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn find_all_by_course(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        course_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as("SELECT * FROM enrollments WHERE course_id = $1")
            .bind(course_id)
            .fetch_all(mm.executor())
            .await?;

        Ok(rows)
    }
}
