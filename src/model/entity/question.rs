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
pub struct Question {
    id: Uuid,
    quiz_id: Uuid,
    text: String,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct QuestionCreate {
    pub quiz_id: Uuid,
    pub text: String,
}

impl ResourceTyped for Question {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Question
    }
}

impl Question {
    pub fn new(id: Uuid, quiz_id: Uuid, text: String) -> Self {
        Self { id, quiz_id, text }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[async_trait]
impl CrudRepository<Question, QuestionCreate, Uuid> for Question {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: QuestionCreate,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query(
            "INSERT INTO questions (id, quiz_id, text) VALUES ($1,$2,$3) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.quiz_id)
        .bind(&data.text)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(Question {
            id,
            quiz_id: data.quiz_id,
            text: data.text,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: QuestionCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query("UPDATE questions SET text = $1 WHERE id = $2")
            .bind(&data.text)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.text = data.text;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM questions WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM questions WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM questions LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl HasOwner for Question {
    type OwnerId = Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.quiz_id)
    }
}

// Utils

impl Question {
    /// Executor-generic; the grading engine loads the quiz structure inside
    /// its transaction.
    pub async fn fetch_by_quiz<'e, E>(executor: E, quiz_id: Uuid) -> DatabaseResult<Vec<Self>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows: Vec<Self> = sqlx::query_as(
            r#"
            SELECT *
            FROM questions q
            WHERE q.quiz_id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
