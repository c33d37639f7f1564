use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Quiz {
    id: Uuid,
    module_id: Uuid,
    title: String,
    time_limit: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct QuizCreate {
    pub module_id: Uuid,
    pub title: String,
    /// Seconds; no limit when absent.
    pub time_limit: Option<i32>,
}

impl ResourceTyped for Quiz {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Quiz
    }
}

impl Quiz {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn time_limit(&self) -> Option<i32> {
        self.time_limit
    }
}

#[async_trait]
impl CrudRepository<Quiz, QuizCreate, Uuid> for Quiz {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: QuizCreate,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query(
            "INSERT INTO quizzes (id, module_id, title, time_limit) VALUES ($1,$2,$3,$4) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.module_id)
        .bind(&data.title)
        .bind(data.time_limit)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(Quiz {
            id,
            module_id: data.module_id,
            title: data.title,
            time_limit: data.time_limit,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: QuizCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query("UPDATE quizzes SET title = $1, time_limit = $2 WHERE id = $3")
            .bind(&data.title)
            .bind(data.time_limit)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.title = data.title;
        self.time_limit = data.time_limit;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        // questions and their options cascade with the quiz
        sqlx::query("DELETE FROM quizzes WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM quizzes LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl HasOwner for Quiz {
    type OwnerId = Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.module_id)
    }
}

// Utils

impl Quiz {
    pub async fn fetch_by_id<'e, E>(executor: E, id: Uuid) -> DatabaseResult<Option<Self>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query_as("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_one(executor)
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }
}
