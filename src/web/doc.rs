use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "JWT token for current user",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::account::account_signup_handler,
        crate::web::routes::account::account_signin_handler,
        crate::web::routes::account::account_list_handler,
        crate::web::routes::account::account_delete_handler,
        crate::web::routes::account::account_courses_handler,
        crate::web::routes::account::account_submissions_handler,
        crate::web::routes::courses::course_create_handler,
        crate::web::routes::courses::course_get_handler,
        crate::web::routes::courses::course_delete_handler,
        crate::web::routes::courses::course_module_create_handler,
        crate::web::routes::courses::course_enroll_handler,
        crate::web::routes::courses::course_unenroll_handler,
        crate::web::routes::courses::course_students_handler,
        crate::web::routes::modules::module_lesson_create_handler,
        crate::web::routes::modules::module_quiz_create_handler,
        crate::web::routes::lessons::lesson_assignment_create_handler,
        crate::web::routes::quizzes::quiz_question_create_handler,
        crate::web::routes::quizzes::quiz_take_handler,
        crate::web::routes::quizzes::quiz_submissions_handler,
        crate::web::routes::questions::question_option_create_handler,
        crate::web::routes::assignments::assignment_submit_handler,
        crate::web::routes::assignments::assignment_submissions_handler,
        crate::web::routes::submissions::submission_grade_handler,
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;
