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
        entity::{CourseModule, Lesson, LessonCreate, Quiz, QuizCreate},
    },
    web::{AppState, RequestContext, WebError, WebResult, error::ErrorResponse, middlewares},
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LessonCreateBody {
    pub title: String,
    pub content: String,
    pub order_index: Option<i32>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct QuizCreateBody {
    pub title: String,
    /// Seconds; no limit when absent.
    pub time_limit: Option<i32>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}", get(module_get_handler).delete(module_delete_handler))
        .route(
            "/{id}/lessons",
            get(module_lessons_handler).post(module_lesson_create_handler),
        )
        .route("/{id}/quizzes", axum::routing::post(module_quiz_create_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn module_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = CourseModule::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseModule::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(
            CourseModule::get_resource_type(),
        ));
    };

    Ok((StatusCode::OK, Json(found)))
}

async fn module_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let found = CourseModule::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseModule::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(
            CourseModule::get_resource_type(),
        ));
    };

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseModule::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

async fn module_lessons_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let lessons = Lesson::find_all_by_module(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(lessons)))
}

#[utoipa::path(
    post,
    path = "/api/v1/modules/{id}/lessons",
    request_body = LessonCreateBody,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "modules",
    security(
        ("cookie" = [])
    )
)]
pub async fn module_lesson_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LessonCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let module = CourseModule::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseModule::get_resource_type(), e))?;

    if module.is_none() {
        return Err(WebError::resource_not_found(
            CourseModule::get_resource_type(),
        ));
    }

    let created = Lesson::create(
        state.pool(),
        user,
        LessonCreate {
            module_id: id,
            title: payload.title,
            content: payload.content,
            order_index: payload.order_index,
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/v1/modules/{id}/quizzes",
    request_body = QuizCreateBody,
    responses(
        (status = 201, description = "Quiz created", body = Quiz),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "modules",
    security(
        ("cookie" = [])
    )
)]
pub async fn module_quiz_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuizCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let module = CourseModule::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseModule::get_resource_type(), e))?;

    if module.is_none() {
        return Err(WebError::resource_not_found(
            CourseModule::get_resource_type(),
        ));
    }

    let created = Quiz::create(
        state.pool(),
        user,
        QuizCreate {
            module_id: id,
            title: payload.title,
            time_limit: payload.time_limit,
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(Quiz::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}
