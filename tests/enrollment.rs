mod common;
use axum::http::StatusCode;
use ludus::model::entity::{Course, UserEntity};
use serde_json::json;
use uuid::Uuid;

use crate::common::{Action, Flow, setup_server, setup_test_db, signin_admin_action, signup_action};

fn create_course_action() -> Action {
    Action::new("course_create", "POST", "/api/v1/courses/")
        .with_dyn_body(|ctx| {
            let admin: UserEntity = ctx.get_json("admin");
            json!({
                "title": "Rust 101",
                "description": "An introductory course",
                "teacher_id": admin.id(),
            })
        })
        .with_expect(StatusCode::CREATED)
        .with_save_as("course")
}

fn enroll_action(expect: StatusCode) -> Action {
    Action::new("enroll", "POST", "dynamic")
        .with_dyn_path(|ctx| {
            let course: Course = ctx.get_json("course");
            format!("/api/v1/courses/{}/enroll", course.id())
        })
        .with_dyn_body(|ctx| {
            let student: UserEntity = ctx.get_json("student");
            json!({ "student_id": student.id() })
        })
        .with_expect(expect)
}

fn unenroll_action(expect: StatusCode) -> Action {
    Action::new("unenroll", "DELETE", "dynamic")
        .with_dyn_path(|ctx| {
            let course: Course = ctx.get_json("course");
            let student: UserEntity = ctx.get_json("student");
            format!(
                "/api/v1/courses/{}/enroll?student_id={}",
                course.id(),
                student.id()
            )
        })
        .with_expect(expect)
}

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_enroll_lifecycle_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(
            signup_action("student", "hunter2")
                .with_save_cookies(false)
                .with_save_as("student"),
        )
        .step(signin_admin_action().with_save_as("admin"))
        .step(create_course_action())
        .step(enroll_action(StatusCode::CREATED).assert_body(|body| {
            assert!(body.contains("enroll_date"));
            assert!(body.contains("Active"));
        }))
        // the second enroll is the duplicate the guard exists for
        .step(enroll_action(StatusCode::CONFLICT).assert_body(|body| {
            assert!(body.contains("already enrolled"));
        }))
        .step(
            Action::new("roster", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    let course: Course = ctx.get_json("course");
                    format!("/api/v1/courses/{}/students", course.id())
                })
                .assert_body(|body| {
                    assert!(body.contains("student_id"));
                })
                .with_expect(StatusCode::OK),
        )
        .step(
            Action::new("student_courses", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    let student: UserEntity = ctx.get_json("student");
                    format!("/api/v1/account/{}/courses", student.id())
                })
                .assert_body(|body| {
                    assert!(body.contains("Rust 101"));
                })
                .with_expect(StatusCode::OK),
        )
        .step(unenroll_action(StatusCode::NO_CONTENT))
        // not enrolled anymore
        .step(unenroll_action(StatusCode::NOT_FOUND))
        // unenroll then enroll works again
        .step(enroll_action(StatusCode::CREATED))
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_enroll_missing_refs_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    let missing = Uuid::new_v4();

    Flow::new()
        .step(
            signup_action("student", "hunter2")
                .with_save_cookies(false)
                .with_save_as("student"),
        )
        .step(signin_admin_action().with_save_as("admin"))
        // unknown course
        .step(
            Action::new("enroll_missing_course", "POST", "dynamic")
                .with_dyn_path(move |_| format!("/api/v1/courses/{}/enroll", missing))
                .with_dyn_body(|ctx| {
                    let student: UserEntity = ctx.get_json("student");
                    json!({ "student_id": student.id() })
                })
                .with_expect(StatusCode::NOT_FOUND)
                .assert_body(|body| assert!(body.contains("not found"))),
        )
        .step(create_course_action())
        // unknown student
        .step(
            Action::new("enroll_missing_student", "POST", "dynamic")
                .with_dyn_path(|ctx| {
                    let course: Course = ctx.get_json("course");
                    format!("/api/v1/courses/{}/enroll", course.id())
                })
                .with_body(json!({ "student_id": Uuid::new_v4() }))
                .with_expect(StatusCode::NOT_FOUND)
                .assert_body(|body| assert!(body.contains("not found"))),
        )
        .run(&mut server, pool)
        .await;
}
