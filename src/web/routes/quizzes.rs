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
        entity::{Question, QuestionCreate, Quiz, QuizSubmission},
    },
    service::quiz,
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::quizzes::{QuizSubmissionResponse, TakeQuizRequest},
        error::ErrorResponse,
        middlewares,
    },
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct QuestionCreateBody {
    pub text: String,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}", get(quiz_get_handler).delete(quiz_delete_handler))
        .route(
            "/{id}/questions",
            get(quiz_questions_handler).post(quiz_question_create_handler),
        )
        .route("/{id}/take", axum::routing::post(quiz_take_handler))
        .route("/{id}/submissions", get(quiz_submissions_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn quiz_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = Quiz::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Quiz::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(Quiz::get_resource_type()));
    };

    Ok((StatusCode::OK, Json(found)))
}

async fn quiz_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let found = Quiz::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Quiz::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(Quiz::get_resource_type()));
    };

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Quiz::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

async fn quiz_questions_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let questions = Question::fetch_by_quiz(state.pool().executor(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(questions)))
}

#[utoipa::path(
    post,
    path = "/api/v1/quizzes/{id}/questions",
    request_body = QuestionCreateBody,
    responses(
        (status = 201, description = "Question created", body = Question),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Quiz not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quizzes",
    security(
        ("cookie" = [])
    )
)]
pub async fn quiz_question_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let found = Quiz::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Quiz::get_resource_type(), e))?;

    if found.is_none() {
        return Err(WebError::resource_not_found(Quiz::get_resource_type()));
    }

    let created = Question::create(
        state.pool(),
        user,
        QuestionCreate {
            quiz_id: id,
            text: payload.text,
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/v1/quizzes/{id}/take",
    request_body = TakeQuizRequest,
    description = "Grades the submitted answers and records the attempt. \
        Every call records a new attempt; retakes are never merged",
    responses(
        (status = 201, description = "Attempt graded and recorded", body = QuizSubmissionResponse),
        (status = 400, description = "An answer references a foreign question or option", body = ErrorResponse),
        (status = 404, description = "Quiz or student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quizzes",
    security(
        ("cookie" = [])
    )
)]
pub async fn quiz_take_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TakeQuizRequest>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let outcome = quiz::take_quiz(
        state.pool(),
        payload.student_id,
        id,
        &payload.answers_by_question,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(QuizSubmissionResponse::from(outcome)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/quizzes/{id}/submissions",
    description = "All recorded attempts for the quiz, oldest first",
    responses(
        (status = 200, description = "Attempts", body = Vec<QuizSubmission>),
        (status = 404, description = "Quiz not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quizzes",
    security(
        ("cookie" = [])
    )
)]
pub async fn quiz_submissions_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let attempts = quiz::submissions_by_quiz(state.pool(), user, id).await?;

    Ok((StatusCode::OK, Json(attempts)))
}
