pub mod quizzes;
