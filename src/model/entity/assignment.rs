use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Assignment {
    id: Uuid,
    lesson_id: Uuid,
    title: String,
    description: String,
    due_date: Option<NaiveDate>,
    max_score: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AssignmentCreate {
    pub lesson_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub max_score: Option<i32>,
}

impl ResourceTyped for Assignment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Assignment
    }
}

impl Assignment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn max_score(&self) -> Option<i32> {
        self.max_score
    }
}

#[async_trait]
impl CrudRepository<Assignment, AssignmentCreate, Uuid> for Assignment {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: AssignmentCreate,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query(
            "INSERT INTO assignments (id, lesson_id, title, description, due_date, max_score) VALUES ($1,$2,$3,$4,$5,$6) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.lesson_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.due_date)
        .bind(data.max_score)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(Assignment {
            id,
            lesson_id: data.lesson_id,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            max_score: data.max_score,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: AssignmentCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            "UPDATE assignments SET title = $1, description = $2, due_date = $3, max_score = $4 WHERE id = $5",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.due_date)
        .bind(data.max_score)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.title = data.title;
        self.description = data.description;
        self.due_date = data.due_date;
        self.max_score = data.max_score;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        Self::fetch_by_id(mm.executor(), id).await
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM assignments LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignments")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl HasOwner for Assignment {
    type OwnerId = Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.lesson_id)
    }
}

// Utils

impl Assignment {
    pub async fn fetch_by_id<'e, E>(executor: E, id: Uuid) -> DatabaseResult<Option<Self>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query_as("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_one(executor)
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    pub async fn find_all_by_lesson(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        lesson_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as(
            r#"
            SELECT *
            FROM assignments a
            WHERE a.lesson_id = $1
            "#,
        )
        .bind(lesson_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
