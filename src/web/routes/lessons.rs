use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, ResourceTyped,
        entity::{Assignment, AssignmentCreate, Lesson},
    },
    web::{AppState, RequestContext, WebError, WebResult, error::ErrorResponse, middlewares},
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AssignmentCreateBody {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub max_score: Option<i32>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}", get(lesson_get_handler).delete(lesson_delete_handler))
        .route(
            "/{id}/assignments",
            get(lesson_assignments_handler).post(lesson_assignment_create_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn lesson_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = Lesson::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(Lesson::get_resource_type()));
    };

    Ok((StatusCode::OK, Json(found)))
}

async fn lesson_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let found = Lesson::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(Lesson::get_resource_type()));
    };

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

async fn lesson_assignments_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let assignments = Assignment::find_all_by_lesson(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Assignment::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(assignments)))
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/{id}/assignments",
    request_body = AssignmentCreateBody,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
pub async fn lesson_assignment_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignmentCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let lesson = Lesson::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    if lesson.is_none() {
        return Err(WebError::resource_not_found(Lesson::get_resource_type()));
    }

    let created = Assignment::create(
        state.pool(),
        user,
        AssignmentCreate {
            lesson_id: id,
            title: payload.title,
            description: payload.description,
            due_date: payload.due_date,
            max_score: payload.max_score,
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(Assignment::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}
