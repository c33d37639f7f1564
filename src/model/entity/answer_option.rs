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
pub struct AnswerOption {
    id: Uuid,
    question_id: Uuid,
    text: String,
    is_correct: bool,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AnswerOptionCreate {
    pub question_id: Uuid,
    pub text: String,
    pub is_correct: Option<bool>,
}

impl ResourceTyped for AnswerOption {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::AnswerOption
    }
}

impl AnswerOption {
    pub fn new(id: Uuid, question_id: Uuid, text: String, is_correct: bool) -> Self {
        Self {
            id,
            question_id,
            text,
            is_correct,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question_id(&self) -> Uuid {
        self.question_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

#[async_trait]
impl CrudRepository<AnswerOption, AnswerOptionCreate, Uuid> for AnswerOption {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: AnswerOptionCreate,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query(
            "INSERT INTO answer_options (id, question_id, text, is_correct) VALUES ($1,$2,$3,$4) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.question_id)
        .bind(&data.text)
        .bind(data.is_correct.unwrap_or(false))
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(AnswerOption {
            id,
            question_id: data.question_id,
            text: data.text,
            is_correct: data.is_correct.unwrap_or(false),
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: AnswerOptionCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query("UPDATE answer_options SET text = $1, is_correct = $2 WHERE id = $3")
            .bind(&data.text)
            .bind(data.is_correct.unwrap_or(false))
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.text = data.text;
        self.is_correct = data.is_correct.unwrap_or(false);
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM answer_options WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM answer_options WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM answer_options LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM answer_options")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl HasOwner for AnswerOption {
    type OwnerId = Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.question_id)
    }
}

// Utils

impl AnswerOption {
    pub async fn fetch_by_question<'e, E>(
        executor: E,
        question_id: Uuid,
    ) -> DatabaseResult<Vec<Self>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows: Vec<Self> = sqlx::query_as(
            r#"
            SELECT *
            FROM answer_options o
            WHERE o.question_id = $1
            "#,
        )
        .bind(question_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
