mod common;
use axum::http::StatusCode;
use ludus::model::entity::{Course, CourseModule, Lesson, Submission, UserEntity};
use serde_json::json;
use uuid::Uuid;

use crate::common::{Action, Flow, setup_server, setup_test_db, signin_admin_action, signup_action};

/// Admin steps down to an assignment capped at 100 points.
fn build_assignment_flow(flow: Flow) -> Flow {
    flow.step(signin_admin_action().with_save_as("admin"))
        .step(
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
                .with_save_as("course"),
        )
        .step(
            Action::new("module_create", "POST", "dynamic")
                .with_dyn_path(|ctx| {
                    let course: Course = ctx.get_json("course");
                    format!("/api/v1/courses/{}/modules", course.id())
                })
                .with_body(json!({
                    "title": "Ownership",
                    "description": "Moves and borrows",
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("module"),
        )
        .step(
            Action::new("lesson_create", "POST", "dynamic")
                .with_dyn_path(|ctx| {
                    let module: CourseModule = ctx.get_json("module");
                    format!("/api/v1/modules/{}/lessons", module.id())
                })
                .with_body(json!({
                    "title": "Borrow checker",
                    "content": "# Borrowing\n...",
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("lesson"),
        )
        .step(
            Action::new("assignment_create", "POST", "dynamic")
                .with_dyn_path(|ctx| {
                    let lesson: Lesson = ctx.get_json("lesson");
                    format!("/api/v1/lessons/{}/assignments", lesson.id())
                })
                .with_body(json!({
                    "title": "Fix the borrow errors",
                    "description": "Make it compile without clones",
                    "max_score": 100,
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("assignment"),
        )
}

fn submit_action(expect: StatusCode) -> Action {
    Action::new("submit", "POST", "dynamic")
        .with_dyn_path(|ctx| {
            let assignment: serde_json::Value = ctx.get("assignment").clone();
            format!(
                "/api/v1/assignments/{}/submissions",
                assignment["id"].as_str().expect("assignment id")
            )
        })
        .with_dyn_body(|ctx| {
            let student: UserEntity = ctx.get_json("student");
            json!({
                "student_id": student.id(),
                "content": "fn main() {}",
            })
        })
        .with_expect(expect)
}

fn grade_action(score: i32, feedback: &'static str, expect: StatusCode) -> Action {
    Action::new("grade", "POST", "dynamic")
        .with_dyn_path(|ctx| {
            let submission: Submission = ctx.get_json("submission");
            format!("/api/v1/submissions/{}/grade", submission.id())
        })
        .with_body(json!({ "score": score, "feedback": feedback }))
        .with_expect(expect)
}

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_submit_duplicate_guard_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    let flow = Flow::new().step(
        signup_action("student", "hunter2")
            .with_save_cookies(false)
            .with_save_as("student"),
    );

    build_assignment_flow(flow)
        .step(submit_action(StatusCode::CREATED).with_save_as("submission"))
        .step(submit_action(StatusCode::CONFLICT).assert_body(|body| {
            assert!(body.contains("already submitted"));
        }))
        .step(
            Action::new("assignment_submissions", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    let assignment: serde_json::Value = ctx.get("assignment").clone();
                    format!(
                        "/api/v1/assignments/{}/submissions",
                        assignment["id"].as_str().expect("assignment id")
                    )
                })
                .with_expect(StatusCode::OK)
                .assert_body(|body| {
                    let submissions: Vec<serde_json::Value> =
                        serde_json::from_str(body).expect("Invalid body format");
                    assert_eq!(submissions.len(), 1);
                }),
        )
        // submit to an unknown assignment
        .step(
            Action::new("submit_missing", "POST", "dynamic")
                .with_dyn_path(|_| format!("/api/v1/assignments/{}/submissions", Uuid::new_v4()))
                .with_dyn_body(|ctx| {
                    let student: UserEntity = ctx.get_json("student");
                    json!({ "student_id": student.id(), "content": "late" })
                })
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_grade_bounds_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    let flow = Flow::new().step(
        signup_action("student", "hunter2")
            .with_save_cookies(false)
            .with_save_as("student"),
    );

    build_assignment_flow(flow)
        .step(submit_action(StatusCode::CREATED).with_save_as("submission"))
        .step(
            grade_action(101, "too generous", StatusCode::BAD_REQUEST).assert_body(|body| {
                assert!(body.contains("exceeds maximum score"));
            }),
        )
        .step(
            grade_action(-1, "impossible", StatusCode::BAD_REQUEST).assert_body(|body| {
                assert!(body.contains("cannot be negative"));
            }),
        )
        // equal to the cap is fine
        .step(grade_action(100, "perfect", StatusCode::OK).assert_body(|body| {
            assert!(body.contains(r#""score":100"#));
            assert!(body.contains("perfect"));
        }))
        // grading again overwrites
        .step(grade_action(80, "recounted", StatusCode::OK).assert_body(|body| {
            assert!(body.contains(r#""score":80"#));
            assert!(body.contains("recounted"));
        }))
        // unknown submission
        .step(
            Action::new("grade_missing", "POST", "dynamic")
                .with_dyn_path(|_| format!("/api/v1/submissions/{}/grade", Uuid::new_v4()))
                .with_body(json!({ "score": 1, "feedback": null }))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}
