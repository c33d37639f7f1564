mod common;
use std::collections::HashMap;

use axum::http::StatusCode;
use ludus::model::entity::{AnswerOption, Course, CourseModule, Question, Quiz, UserEntity};
use serde_json::json;
use uuid::Uuid;

use crate::common::{Action, Flow, setup_server, setup_test_db, signin_admin_action, signup_action};

/// Admin steps that build a quiz with two questions: A has one correct
/// option of two, B has two correct options of three.
fn build_quiz_flow(flow: Flow) -> Flow {
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
                    "order_index": 0,
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("module"),
        )
        .step(
            Action::new("quiz_create", "POST", "dynamic")
                .with_dyn_path(|ctx| {
                    let module: CourseModule = ctx.get_json("module");
                    format!("/api/v1/modules/{}/quizzes", module.id())
                })
                .with_body(json!({ "title": "Ownership check" }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("quiz"),
        )
        .step(question_action("question_a", "What moves on assignment?"))
        .step(option_action("question_a", "a1", "Owned values", true))
        .step(option_action("question_a", "a2", "References", false))
        .step(question_action("question_b", "Which borrows are allowed at once?"))
        .step(option_action("question_b", "b1", "Many shared", true))
        .step(option_action("question_b", "b2", "One mutable", true))
        .step(option_action("question_b", "b3", "Mutable plus shared", false))
}

fn question_action(save_as: &'static str, text: &'static str) -> Action {
    Action::new("question_create", "POST", "dynamic")
        .with_dyn_path(|ctx| {
            let quiz: Quiz = ctx.get_json("quiz");
            format!("/api/v1/quizzes/{}/questions", quiz.id())
        })
        .with_body(json!({ "text": text }))
        .with_expect(StatusCode::CREATED)
        .with_save_as(save_as)
}

fn option_action(
    question_key: &'static str,
    save_as: &'static str,
    text: &'static str,
    is_correct: bool,
) -> Action {
    Action::new("option_create", "POST", "dynamic")
        .with_dyn_path(move |ctx| {
            let question: Question = ctx.get_json(question_key);
            format!("/api/v1/questions/{}/options", question.id())
        })
        .with_body(json!({ "text": text, "is_correct": is_correct }))
        .with_expect(StatusCode::CREATED)
        .with_save_as(save_as)
}

fn take_action() -> Action {
    Action::new("take_quiz", "POST", "dynamic").with_dyn_path(|ctx| {
        let quiz: Quiz = ctx.get_json("quiz");
        format!("/api/v1/quizzes/{}/take", quiz.id())
    })
}

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_take_quiz_scoring_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    let flow = Flow::new().step(
        signup_action("student", "hunter2")
            .with_save_cookies(false)
            .with_save_as("student"),
    );

    build_quiz_flow(flow)
        // A answered exactly, B missing one correct option: only A counts
        .step(
            take_action()
                .with_dyn_body(|ctx| {
                    let student: UserEntity = ctx.get_json("student");
                    let a: Question = ctx.get_json("question_a");
                    let a1: AnswerOption = ctx.get_json("a1");
                    let b: Question = ctx.get_json("question_b");
                    let b1: AnswerOption = ctx.get_json("b1");
                    let answers = HashMap::from([
                        (a.id(), vec![a1.id()]),
                        (b.id(), vec![b1.id()]),
                    ]);
                    json!({
                        "student_id": student.id(),
                        "answers_by_question": answers,
                    })
                })
                .with_expect(StatusCode::CREATED)
                .assert_body(|body| {
                    assert!(body.contains(r#""score":1"#));
                    assert!(body.contains(r#""total_questions":2"#));
                }),
        )
        // both exact: full score, recorded as a second independent attempt
        .step(
            take_action()
                .with_dyn_body(|ctx| {
                    let student: UserEntity = ctx.get_json("student");
                    let a: Question = ctx.get_json("question_a");
                    let a1: AnswerOption = ctx.get_json("a1");
                    let b: Question = ctx.get_json("question_b");
                    let b1: AnswerOption = ctx.get_json("b1");
                    let b2: AnswerOption = ctx.get_json("b2");
                    let answers = HashMap::from([
                        (a.id(), vec![a1.id()]),
                        (b.id(), vec![b2.id(), b1.id()]),
                    ]);
                    json!({
                        "student_id": student.id(),
                        "answers_by_question": answers,
                    })
                })
                .with_expect(StatusCode::CREATED)
                .assert_body(|body| {
                    assert!(body.contains(r#""score":2"#));
                }),
        )
        // empty answers map is valid and scores zero
        .step(
            take_action()
                .with_dyn_body(|ctx| {
                    let student: UserEntity = ctx.get_json("student");
                    json!({
                        "student_id": student.id(),
                        "answers_by_question": {},
                    })
                })
                .with_expect(StatusCode::CREATED)
                .assert_body(|body| {
                    assert!(body.contains(r#""score":0"#));
                }),
        )
        .step(
            Action::new("quiz_submissions", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    let quiz: Quiz = ctx.get_json("quiz");
                    format!("/api/v1/quizzes/{}/submissions", quiz.id())
                })
                .with_expect(StatusCode::OK)
                .assert_body(|body| {
                    let attempts: Vec<serde_json::Value> =
                        serde_json::from_str(body).expect("Invalid body format");
                    assert_eq!(attempts.len(), 3);
                }),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_take_quiz_validation_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    let flow = Flow::new().step(
        signup_action("student", "hunter2")
            .with_save_cookies(false)
            .with_save_as("student"),
    );

    build_quiz_flow(flow)
        // answer key that is not a question of this quiz
        .step(
            take_action()
                .with_dyn_body(|ctx| {
                    let student: UserEntity = ctx.get_json("student");
                    let answers = HashMap::from([(Uuid::new_v4(), vec![Uuid::new_v4()])]);
                    json!({
                        "student_id": student.id(),
                        "answers_by_question": answers,
                    })
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(body.contains("does not belong to quiz"));
                }),
        )
        // option borrowed from the other question
        .step(
            take_action()
                .with_dyn_body(|ctx| {
                    let student: UserEntity = ctx.get_json("student");
                    let a: Question = ctx.get_json("question_a");
                    let b1: AnswerOption = ctx.get_json("b1");
                    let answers = HashMap::from([(a.id(), vec![b1.id()])]);
                    json!({
                        "student_id": student.id(),
                        "answers_by_question": answers,
                    })
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(body.contains("does not belong to question"));
                }),
        )
        // unknown quiz
        .step(
            Action::new("take_missing_quiz", "POST", "dynamic")
                .with_dyn_path(|_| format!("/api/v1/quizzes/{}/take", Uuid::new_v4()))
                .with_dyn_body(|ctx| {
                    let student: UserEntity = ctx.get_json("student");
                    json!({
                        "student_id": student.id(),
                        "answers_by_question": {},
                    })
                })
                .with_expect(StatusCode::NOT_FOUND)
                .assert_body(|body| assert!(body.contains("not found"))),
        )
        // unknown student
        .step(
            take_action()
                .with_body(json!({
                    "student_id": Uuid::new_v4(),
                    "answers_by_question": {},
                }))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}
