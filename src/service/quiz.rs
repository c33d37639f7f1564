//! Quiz grading engine.
//!
//! `take_quiz` validates a set of per-question option selections against
//! the quiz structure and scores by exact set equality: a question counts
//! iff the selected option-id set equals the correct option-id set. No
//! partial credit. Every call persists a fresh `QuizSubmission`; attempts
//! are never deduplicated.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use uuid::Uuid;

use crate::model::{
    ModelManager, ResourceType,
    entity::{AnswerOption, Question, Quiz, QuizSubmission, QuizSubmissionCreate, UserEntity},
};
use crate::service::{ServiceError, ServiceResult};

/// Map from question id to the option ids the student selected for it.
/// Order inside the selection is irrelevant.
pub type AnswerMap = HashMap<Uuid, Vec<Uuid>>;

pub struct TakeQuizOutcome {
    pub submission: QuizSubmission,
    pub total_questions: usize,
}

#[tracing::instrument(skip(mm, answers))]
pub async fn take_quiz(
    mm: &ModelManager,
    student_id: Uuid,
    quiz_id: Uuid,
    answers: &AnswerMap,
) -> ServiceResult<TakeQuizOutcome> {
    let mut tx = mm.begin().await?;

    let student = UserEntity::fetch_by_id(&mut *tx, student_id)
        .await?
        .ok_or(ServiceError::not_found(ResourceType::User, student_id))?;

    let quiz = Quiz::fetch_by_id(&mut *tx, quiz_id)
        .await?
        .ok_or(ServiceError::not_found(ResourceType::Quiz, quiz_id))?;

    let questions = Question::fetch_by_quiz(&mut *tx, quiz.id()).await?;

    // every question key must belong to this quiz; checked over the whole
    // map before any option is looked at, so a malformed request fails here
    // and never reaches scoring
    validate_question_refs(answers, &questions, quiz.id())?;

    let mut options_by_question: HashMap<Uuid, Vec<AnswerOption>> = HashMap::new();
    for question in &questions {
        let options = AnswerOption::fetch_by_question(&mut *tx, question.id()).await?;
        options_by_question.insert(question.id(), options);
    }

    validate_option_refs(answers, &options_by_question)?;

    let score = count_correct(&questions, &options_by_question, answers);

    let submission = QuizSubmission::insert(
        &mut *tx,
        QuizSubmissionCreate {
            quiz_id: quiz.id(),
            student_id: student.id(),
            score,
            taken_at: Utc::now(),
        },
    )
    .await?;

    tx.commit().await.map_err(crate::model::DatabaseError::from)?;

    tracing::debug!(
        score,
        total = questions.len(),
        "quiz graded and attempt recorded"
    );

    Ok(TakeQuizOutcome {
        submission,
        total_questions: questions.len(),
    })
}

/// All attempts for one quiz, in taken order.
pub async fn submissions_by_quiz(
    mm: &ModelManager,
    actor: &crate::web::AuthenticatedUser,
    quiz_id: Uuid,
) -> ServiceResult<Vec<QuizSubmission>> {
    let quiz = Quiz::fetch_by_id(mm.executor(), quiz_id).await?;
    if quiz.is_none() {
        return Err(ServiceError::not_found(ResourceType::Quiz, quiz_id));
    }

    Ok(QuizSubmission::find_all_by_quiz(mm, actor, quiz_id).await?)
}

pub async fn submissions_by_student(
    mm: &ModelManager,
    actor: &crate::web::AuthenticatedUser,
    student_id: Uuid,
) -> ServiceResult<Vec<QuizSubmission>> {
    let student = UserEntity::fetch_by_id(mm.executor(), student_id).await?;
    if student.is_none() {
        return Err(ServiceError::not_found(ResourceType::User, student_id));
    }

    Ok(QuizSubmission::find_all_by_student(mm, actor, student_id).await?)
}

fn validate_question_refs(
    answers: &AnswerMap,
    questions: &[Question],
    quiz_id: Uuid,
) -> ServiceResult<()> {
    let valid_ids: HashSet<Uuid> = questions.iter().map(Question::id).collect();

    for question_id in answers.keys() {
        if !valid_ids.contains(question_id) {
            return Err(ServiceError::QuestionNotInQuiz {
                question_id: *question_id,
                quiz_id,
            });
        }
    }

    Ok(())
}

fn validate_option_refs(
    answers: &AnswerMap,
    options_by_question: &HashMap<Uuid, Vec<AnswerOption>>,
) -> ServiceResult<()> {
    for (question_id, selected) in answers {
        // question refs were validated already, so the entry exists
        let valid_ids: HashSet<Uuid> = options_by_question
            .get(question_id)
            .map(|options| options.iter().map(AnswerOption::id).collect())
            .unwrap_or_default();

        for option_id in selected {
            if !valid_ids.contains(option_id) {
                return Err(ServiceError::OptionNotInQuestion {
                    option_id: *option_id,
                    question_id: *question_id,
                });
            }
        }
    }

    Ok(())
}

/// Iterates over every question of the quiz, answered or not; an unanswered
/// question has an empty selected set and only scores when the question has
/// no correct option either.
fn count_correct(
    questions: &[Question],
    options_by_question: &HashMap<Uuid, Vec<AnswerOption>>,
    answers: &AnswerMap,
) -> i32 {
    let mut correct = 0;

    for question in questions {
        let correct_ids: HashSet<Uuid> = options_by_question
            .get(&question.id())
            .map(|options| {
                options
                    .iter()
                    .filter(|o| o.is_correct())
                    .map(AnswerOption::id)
                    .collect()
            })
            .unwrap_or_default();

        let selected_ids: HashSet<Uuid> = answers
            .get(&question.id())
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();

        if correct_ids == selected_ids {
            correct += 1;
        }
    }

    correct
}

#[cfg(test)]
mod test {
    use super::*;

    struct QuizFixture {
        quiz_id: Uuid,
        questions: Vec<Question>,
        options_by_question: HashMap<Uuid, Vec<AnswerOption>>,
    }

    impl QuizFixture {
        fn new() -> Self {
            Self {
                quiz_id: Uuid::new_v4(),
                questions: vec![],
                options_by_question: HashMap::new(),
            }
        }

        /// Adds a question with the given options; returns (question_id,
        /// option_ids).
        fn question(&mut self, correctness: &[bool]) -> (Uuid, Vec<Uuid>) {
            let question_id = Uuid::new_v4();
            self.questions.push(Question::new(
                question_id,
                self.quiz_id,
                format!("question #{}", self.questions.len() + 1),
            ));

            let mut option_ids = vec![];
            let mut options = vec![];
            for (i, is_correct) in correctness.iter().enumerate() {
                let option_id = Uuid::new_v4();
                options.push(AnswerOption::new(
                    option_id,
                    question_id,
                    format!("option #{i}"),
                    *is_correct,
                ));
                option_ids.push(option_id);
            }
            self.options_by_question.insert(question_id, options);

            (question_id, option_ids)
        }

        fn score(&self, answers: &AnswerMap) -> i32 {
            count_correct(&self.questions, &self.options_by_question, answers)
        }

        fn validate(&self, answers: &AnswerMap) -> ServiceResult<()> {
            validate_question_refs(answers, &self.questions, self.quiz_id)?;
            validate_option_refs(answers, &self.options_by_question)
        }
    }

    #[test]
    fn exact_match_scoring() {
        // question A: single correct option; question B: two correct
        let mut quiz = QuizFixture::new();
        let (a, a_opts) = quiz.question(&[true, false]);
        let (b, b_opts) = quiz.question(&[true, true, false]);

        // A answered exactly, B missing one correct option
        let answers = AnswerMap::from([(a, vec![a_opts[0]]), (b, vec![b_opts[0]])]);
        assert_eq!(quiz.score(&answers), 1);

        // both exact
        let answers = AnswerMap::from([(a, vec![a_opts[0]]), (b, vec![b_opts[1], b_opts[0]])]);
        assert_eq!(quiz.score(&answers), 2);
    }

    #[test]
    fn extra_selection_disqualifies() {
        let mut quiz = QuizFixture::new();
        let (a, a_opts) = quiz.question(&[true, false]);

        // the correct option plus an incorrect one is not a correct answer
        let answers = AnswerMap::from([(a, vec![a_opts[0], a_opts[1]])]);
        assert_eq!(quiz.score(&answers), 0);
    }

    #[test]
    fn unanswered_questions_score_zero() {
        let mut quiz = QuizFixture::new();
        quiz.question(&[true, false]);
        quiz.question(&[false, true]);

        assert_eq!(quiz.score(&AnswerMap::new()), 0);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let quiz = QuizFixture::new();
        assert_eq!(quiz.score(&AnswerMap::new()), 0);
        assert!(quiz.validate(&AnswerMap::new()).is_ok());
    }

    #[test]
    fn scoring_is_deterministic_and_bounded() {
        let mut quiz = QuizFixture::new();
        let (a, a_opts) = quiz.question(&[true]);
        let (b, b_opts) = quiz.question(&[true, false]);

        let answers = AnswerMap::from([(a, vec![a_opts[0]]), (b, vec![b_opts[0]])]);
        let first = quiz.score(&answers);
        for _ in 0..10 {
            assert_eq!(quiz.score(&answers), first);
        }
        assert!(first >= 0 && first <= quiz.questions.len() as i32);
    }

    #[test]
    fn foreign_question_is_rejected() {
        let mut quiz = QuizFixture::new();
        let (a, a_opts) = quiz.question(&[true, false]);

        let foreign = Uuid::new_v4();
        let answers = AnswerMap::from([(a, vec![a_opts[0]]), (foreign, vec![a_opts[0]])]);

        let err = quiz.validate(&answers).unwrap_err();
        match err {
            ServiceError::QuestionNotInQuiz { question_id, .. } => {
                assert_eq!(question_id, foreign);
            }
            other => panic!("expected QuestionNotInQuiz, got {other:?}"),
        }
    }

    #[test]
    fn question_refs_checked_before_option_refs() {
        // one valid question key carrying a bogus option AND a bogus
        // question key: the question-phase failure must win regardless of
        // map iteration order
        let mut quiz = QuizFixture::new();
        let (a, _) = quiz.question(&[true]);

        let answers = AnswerMap::from([
            (a, vec![Uuid::new_v4()]),
            (Uuid::new_v4(), vec![Uuid::new_v4()]),
        ]);

        let err = quiz.validate(&answers).unwrap_err();
        assert!(matches!(err, ServiceError::QuestionNotInQuiz { .. }));
    }

    #[test]
    fn foreign_option_is_rejected() {
        let mut quiz = QuizFixture::new();
        let (a, a_opts) = quiz.question(&[true, false]);
        let (b, _) = quiz.question(&[true]);

        // option of question A claimed under question B
        let answers = AnswerMap::from([(b, vec![a_opts[0]])]);

        let err = quiz.validate(&answers).unwrap_err();
        match err {
            ServiceError::OptionNotInQuestion {
                option_id,
                question_id,
            } => {
                assert_eq!(option_id, a_opts[0]);
                assert_eq!(question_id, b);
            }
            other => panic!("expected OptionNotInQuestion, got {other:?}"),
        }
    }

    #[test]
    fn all_correct_required_no_partial_credit() {
        let mut quiz = QuizFixture::new();
        let (a, a_opts) = quiz.question(&[true, true, true, false]);

        // two of three correct options selected
        let answers = AnswerMap::from([(a, vec![a_opts[0], a_opts[1]])]);
        assert_eq!(quiz.score(&answers), 0);

        // all three, none extra
        let answers = AnswerMap::from([(a, vec![a_opts[2], a_opts[0], a_opts[1]])]);
        assert_eq!(quiz.score(&answers), 1);
    }
}
