//! Duplicate-safe enrollment writes.
//!
//! `enroll` pre-checks the (student, course) pair for a friendly conflict
//! message, then inserts; if a concurrent request wins the race between
//! the two steps, the UNIQUE constraint fires and its violation is
//! translated into the same conflict instead of a raw storage error.

use chrono::Utc;
use uuid::Uuid;

use crate::model::{
    ModelManager, ResourceType,
    entity::{Course, Enrollment, EnrollmentCreate, UserEntity},
};
use crate::service::{ServiceError, ServiceResult};
use crate::web::AuthenticatedUser;

pub static STATUS_ACTIVE: &str = "Active";

#[tracing::instrument(skip(mm))]
pub async fn enroll(mm: &ModelManager, course_id: Uuid, student_id: Uuid) -> ServiceResult<Enrollment> {
    let mut tx = mm.begin().await?;

    let course = Course::fetch_by_id(&mut *tx, course_id)
        .await?
        .ok_or(ServiceError::not_found(ResourceType::Course, course_id))?;

    let student = UserEntity::fetch_by_id(&mut *tx, student_id)
        .await?
        .ok_or(ServiceError::not_found(ResourceType::User, student_id))?;

    if Enrollment::fetch_by_student_and_course(&mut *tx, student.id(), course.id())
        .await?
        .is_some()
    {
        return Err(ServiceError::AlreadyEnrolled {
            student_id,
            course_id,
        });
    }

    let result = Enrollment::insert(
        &mut *tx,
        EnrollmentCreate {
            student_id: student.id(),
            course_id: course.id(),
            enroll_date: Utc::now().date_naive(),
            status: STATUS_ACTIVE.to_string(),
        },
    )
    .await;

    match result {
        Ok(enrollment) => {
            tx.commit().await.map_err(crate::model::DatabaseError::from)?;
            Ok(enrollment)
        }
        // a concurrent enroll slipped in between the pre-check and the
        // insert; the constraint is the source of truth
        Err(e) if e.is_unique_violation() => Err(ServiceError::AlreadyEnrolled {
            student_id,
            course_id,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Removes the enrollment if present. Returns whether anything was removed;
/// the boundary decides whether absence is an error.
#[tracing::instrument(skip(mm))]
pub async fn unenroll(mm: &ModelManager, course_id: Uuid, student_id: Uuid) -> ServiceResult<bool> {
    let mut tx = mm.begin().await?;

    let found = Enrollment::fetch_by_student_and_course(&mut *tx, student_id, course_id).await?;
    match found {
        Some(enrollment) => {
            enrollment.delete(&mut *tx).await?;
            tx.commit().await.map_err(crate::model::DatabaseError::from)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Courses the student is currently enrolled in.
pub async fn courses_for_student(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    student_id: Uuid,
) -> ServiceResult<Vec<Course>> {
    let student = UserEntity::fetch_by_id(mm.executor(), student_id).await?;
    if student.is_none() {
        return Err(ServiceError::not_found(ResourceType::User, student_id));
    }

    Ok(Course::find_all_by_student(mm, actor, student_id).await?)
}

/// Enrollment roster of a course.
pub async fn students_for_course(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    course_id: Uuid,
) -> ServiceResult<Vec<Enrollment>> {
    let course = Course::fetch_by_id(mm.executor(), course_id).await?;
    if course.is_none() {
        return Err(ServiceError::not_found(ResourceType::Course, course_id));
    }

    Ok(Enrollment::find_all_by_course(mm, actor, course_id).await?)
}
