use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, PaginatableRepository, ResourceTyped,
        entity::{Course, CourseCreate, CourseModule, CourseModuleCreate, Enrollment},
    },
    service::enrollment,
    web::{
        AppState, RequestContext, WebError, WebResult,
        error::ErrorResponse,
        middlewares,
        routes::PaginationQuery,
    },
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ModuleCreateBody {
    pub title: String,
    pub description: String,
    pub order_index: Option<i32>,
}

#[derive(Debug, Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct EnrollBody {
    pub student_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UnenrollQuery {
    student_id: Uuid,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(course_create_handler))
        .route("/page", get(course_list_handler))
        .route(
            "/{id}",
            get(course_get_handler)
                .put(course_update_handler)
                .delete(course_delete_handler),
        )
        .route(
            "/{id}/modules",
            get(course_modules_handler).post(course_module_create_handler),
        )
        .route(
            "/{id}/enroll",
            post(course_enroll_handler).delete(course_unenroll_handler),
        )
        .route("/{id}/students", get(course_students_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/",
    request_body = CourseCreate,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn course_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let created = Course::create(state.pool(), user, payload)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn course_list_handler(
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let courses = Course::page(state.pool(), user, page.limit, page.offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(courses)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    responses(
        (status = 200, description = "The course", body = Course),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn course_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = Course::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(Course::get_resource_type()));
    };

    Ok((StatusCode::OK, Json(found)))
}

async fn course_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CourseCreate>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let found = Course::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(Course::get_resource_type()));
    };

    let updated = found
        .update(state.pool(), user, payload)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    description = "Deletes the course with its modules, lessons and assignments",
    responses(
        (status = 200, description = "Course deleted"),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn course_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let found = Course::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::resource_not_found(Course::get_resource_type()));
    };

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

async fn course_modules_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let modules = CourseModule::find_all_by_course(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseModule::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(modules)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{id}/modules",
    request_body = ModuleCreateBody,
    responses(
        (status = 201, description = "Module created", body = CourseModule),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn course_module_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModuleCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin_user()?;

    let course = Course::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    if course.is_none() {
        return Err(WebError::resource_not_found(Course::get_resource_type()));
    }

    let created = CourseModule::create(
        state.pool(),
        user,
        CourseModuleCreate {
            course_id: id,
            title: payload.title,
            description: payload.description,
            order_index: payload.order_index,
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(CourseModule::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{id}/enroll",
    request_body = EnrollBody,
    description = "Enrolls the student into the course. Enrolling twice is a conflict",
    responses(
        (status = 201, description = "Enrollment created", body = Enrollment),
        (status = 404, description = "Course or student not found", body = ErrorResponse),
        (status = 409, description = "Student is already enrolled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn course_enroll_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EnrollBody>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let created = enrollment::enroll(state.pool(), id, payload.student_id).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}/enroll",
    params(
        ("student_id" = Uuid, Query, description = "Student to unenroll"),
    ),
    responses(
        (status = 204, description = "Enrollment removed"),
        (status = 404, description = "Student was not enrolled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn course_unenroll_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UnenrollQuery>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;

    let removed = enrollment::unenroll(state.pool(), id, query.student_id).await?;

    if !removed {
        return Err(WebError::resource_not_found(
            Enrollment::get_resource_type(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/students",
    description = "Enrollment roster of the course",
    responses(
        (status = 200, description = "Enrollments", body = Vec<Enrollment>),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn course_students_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let roster = enrollment::students_for_course(state.pool(), user, id).await?;

    Ok((StatusCode::OK, Json(roster)))
}
