use clap::{Parser, Subcommand};
use ludus::model::entity::{
    AnswerOption, AnswerOptionCreate, Assignment, AssignmentCreate, Course, CourseCreate,
    CourseModule, CourseModuleCreate, Lesson, LessonCreate, Question, QuestionCreate, Quiz,
    QuizCreate, UserEntity, UserEntityCreateUpdate,
};
use ludus::model::{CrudRepository, DatabaseError, DbConnection, ModelManager};
use ludus::web::AuthenticatedUser;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the learning DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage course modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Manage assignments
    Assignment {
        #[command(subcommand)]
        action: AssignmentCommands,
    },

    /// Manage quizzes
    Quiz {
        #[command(subcommand)]
        action: QuizCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value = "user")]
        role: String,
    },
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Username of the teacher who owns the course
        #[arg(long)]
        teacher: String,
    },
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        /// Course title to attach the module to
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        /// Module title to attach the lesson to
        #[arg(long)]
        module_title: String,
        #[arg(long)]
        title: String,
        /// Path to a Markdown file with lesson content
        #[arg(long)]
        file: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Assignment management
#[derive(Subcommand, Debug)]
pub enum AssignmentCommands {
    Add {
        /// Lesson title to attach the assignment to
        #[arg(long)]
        lesson_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        max_score: Option<i32>,
    },
}

/// Quiz management
#[derive(Subcommand, Debug)]
pub enum QuizCommands {
    Add {
        /// Module title to attach the quiz to
        #[arg(long)]
        module_title: String,
        #[arg(long)]
        title: String,
        /// Time limit in seconds
        #[arg(long)]
        time_limit: Option<i32>,
    },
    AddQuestion {
        /// Quiz title to attach the question to
        #[arg(long)]
        quiz_title: String,
        #[arg(long)]
        text: String,
    },
    AddOption {
        /// Question text to attach the option to
        #[arg(long)]
        question_text: String,
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = false)]
        is_correct: bool,
    },
}

async fn id_by_title(
    mm: &ModelManager,
    query: &'static str,
    value: &str,
) -> ludus::error::AppResult<uuid::Uuid> {
    let id = sqlx::query_scalar(query)
        .bind(value)
        .fetch_one(mm.executor())
        .await
        .map_err(DatabaseError::SqlxError)?;
    Ok(id)
}

#[tokio::main]
async fn main() -> ludus::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let db_con = DbConnection::connect(&std::env::var("DATABASE_URL").unwrap())?;
    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::admin();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                username,
                password,
                email,
                role,
            } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreateUpdate {
                        username,
                        email,
                        password_hash: ludus::auth::hash_password(&password).unwrap(),
                        role,
                    },
                )
                .await?;
                println!("User created: {:?}", user);
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add {
                title,
                description,
                teacher,
            } => {
                let teacher_id =
                    id_by_title(&mm, "SELECT id FROM users WHERE username = $1", &teacher).await?;

                let course = Course::create(
                    &mm,
                    &actor,
                    CourseCreate {
                        title,
                        description,
                        teacher_id,
                        start_date: None,
                    },
                )
                .await?;
                println!("Course created: {:?}", course);
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add {
                course_title,
                title,
                description,
                order_index,
            } => {
                let course_id = id_by_title(
                    &mm,
                    "SELECT id FROM courses WHERE title = $1",
                    &course_title,
                )
                .await?;

                let module = CourseModule::create(
                    &mm,
                    &actor,
                    CourseModuleCreate {
                        course_id,
                        title,
                        description,
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Module created: {:?}", module);
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                module_title,
                title,
                file,
                order_index,
            } => {
                let module_id = id_by_title(
                    &mm,
                    "SELECT id FROM course_modules WHERE title = $1",
                    &module_title,
                )
                .await?;

                let content = std::fs::read_to_string(file)?;
                let lesson = Lesson::create(
                    &mm,
                    &actor,
                    LessonCreate {
                        module_id,
                        title,
                        content,
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Lesson created: {:?}", lesson);
            }
        },

        Commands::Assignment { action } => match action {
            AssignmentCommands::Add {
                lesson_title,
                title,
                description,
                max_score,
            } => {
                let lesson_id = id_by_title(
                    &mm,
                    "SELECT id FROM lessons WHERE title = $1",
                    &lesson_title,
                )
                .await?;

                let assignment = Assignment::create(
                    &mm,
                    &actor,
                    AssignmentCreate {
                        lesson_id,
                        title,
                        description,
                        due_date: None,
                        max_score,
                    },
                )
                .await?;
                println!("Assignment created: {:?}", assignment);
            }
        },

        Commands::Quiz { action } => match action {
            QuizCommands::Add {
                module_title,
                title,
                time_limit,
            } => {
                let module_id = id_by_title(
                    &mm,
                    "SELECT id FROM course_modules WHERE title = $1",
                    &module_title,
                )
                .await?;

                let quiz = Quiz::create(
                    &mm,
                    &actor,
                    QuizCreate {
                        module_id,
                        title,
                        time_limit,
                    },
                )
                .await?;
                println!("Quiz created: {:?}", quiz);
            }

            QuizCommands::AddQuestion { quiz_title, text } => {
                let quiz_id = id_by_title(
                    &mm,
                    "SELECT id FROM quizzes WHERE title = $1",
                    &quiz_title,
                )
                .await?;

                let question = Question::create(&mm, &actor, QuestionCreate { quiz_id, text }).await?;
                println!("Question created: {:?}", question);
            }

            QuizCommands::AddOption {
                question_text,
                text,
                is_correct,
            } => {
                let question_id = id_by_title(
                    &mm,
                    "SELECT id FROM questions WHERE text = $1",
                    &question_text,
                )
                .await?;

                let option = AnswerOption::create(
                    &mm,
                    &actor,
                    AnswerOptionCreate {
                        question_id,
                        text,
                        is_correct: Some(is_correct),
                    },
                )
                .await?;
                println!("Option created: {:?}", option);
            }
        },
    }

    Ok(())
}
