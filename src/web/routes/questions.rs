use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, ResourceTyped,
        entity::{AnswerOption, AnswerOptionCreate, Question},
    },
    web::{AppState, RequestContext, WebError, WebResult, error::ErrorResponse, middlewares},
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct OptionCreateBody {
    pub text: String,
    pub is_correct: Option<bool>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}", axum::routing::delete(question_delete_handler))
        .route(
            "/{id}/options",
            get(question_options_handler).post(question_option_create_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn question_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let found = Question::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(Question::get_resource_type()));
    };

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

async fn question_options_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let options = AnswerOption::fetch_by_question(state.pool().executor(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(AnswerOption::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(options)))
}

#[utoipa::path(
    post,
    path = "/api/v1/questions/{id}/options",
    request_body = OptionCreateBody,
    responses(
        (status = 201, description = "Option created", body = AnswerOption),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "questions",
    security(
        ("cookie" = [])
    )
)]
pub async fn question_option_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OptionCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let question = Question::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    if question.is_none() {
        return Err(WebError::resource_not_found(Question::get_resource_type()));
    }

    let created = AnswerOption::create(
        state.pool(),
        user,
        AnswerOptionCreate {
            question_id: id,
            text: payload.text,
            is_correct: payload.is_correct,
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(AnswerOption::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}
