mod user;
pub use user::{UserEntity, UserEntityCreateUpdate};

mod course;
pub use course::{Course, CourseCreate};

mod course_module;
pub use course_module::{CourseModule, CourseModuleCreate};

mod lesson;
pub use lesson::{Lesson, LessonCreate};

mod assignment;
pub use assignment::{Assignment, AssignmentCreate};

mod quiz;
pub use quiz::{Quiz, QuizCreate};

mod question;
pub use question::{Question, QuestionCreate};

mod answer_option;
pub use answer_option::{AnswerOption, AnswerOptionCreate};

mod quiz_submission;
pub use quiz_submission::{QuizSubmission, QuizSubmissionCreate};

mod enrollment;
pub use enrollment::{Enrollment, EnrollmentCreate};

mod submission;
pub use submission::{Submission, SubmissionCreate};
