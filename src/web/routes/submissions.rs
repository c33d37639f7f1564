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
    model::{ResourceTyped, entity::Submission},
    service::submission,
    web::{AppState, RequestContext, WebError, WebResult, error::ErrorResponse, middlewares},
};

#[derive(Debug, Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct GradeBody {
    pub score: i32,
    pub feedback: Option<String>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}", get(submission_get_handler))
        .route("/{id}/grade", axum::routing::post(submission_grade_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn submission_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let found = Submission::fetch_by_id(state.pool().executor(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Submission::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(
            Submission::get_resource_type(),
        ));
    };

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/submissions/{id}/grade",
    request_body = GradeBody,
    description = "Sets score and feedback on the submission. Grading twice overwrites",
    responses(
        (status = 200, description = "Submission graded", body = Submission),
        (status = 400, description = "Score negative or above the assignment maximum", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "submissions",
    security(
        ("cookie" = [])
    )
)]
pub async fn submission_grade_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GradeBody>,
) -> WebResult<impl IntoResponse> {
    ctx.admin_user()?;

    let graded = submission::grade(state.pool(), id, payload.score, payload.feedback).await?;

    Ok((StatusCode::OK, Json(graded)))
}
