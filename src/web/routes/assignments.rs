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
        entity::{Assignment, Submission},
    },
    service::submission,
    web::{AppState, RequestContext, WebError, WebResult, error::ErrorResponse, middlewares},
};

#[derive(Debug, Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct SubmitBody {
    pub student_id: Uuid,
    pub content: String,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}", get(assignment_get_handler))
        .route(
            "/{id}/submissions",
            get(assignment_submissions_handler).post(assignment_submit_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn assignment_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = Assignment::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Assignment::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(
            Assignment::get_resource_type(),
        ));
    };

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments/{id}/submissions",
    request_body = SubmitBody,
    description = "Submits the student's work. A student submits each assignment at most once",
    responses(
        (status = 201, description = "Submission recorded", body = Submission),
        (status = 404, description = "Assignment or student not found", body = ErrorResponse),
        (status = 409, description = "Student has already submitted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "assignments",
    security(
        ("cookie" = [])
    )
)]
pub async fn assignment_submit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitBody>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let created = submission::submit(state.pool(), payload.student_id, id, payload.content).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments/{id}/submissions",
    responses(
        (status = 200, description = "Submissions for the assignment", body = Vec<Submission>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "assignments",
    security(
        ("cookie" = [])
    )
)]
pub async fn assignment_submissions_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let submissions = Submission::find_all_by_assignment(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Submission::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(submissions)))
}
