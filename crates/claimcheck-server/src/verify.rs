//! Answer verification.
//!
//! Compares a respondent's submitted choice ids against the stored
//! correct choices. Scoring is forgiving about submission shape:
//! unanswered questions count as misses, never as errors, and entries
//! that match no question are ignored.

use claimcheck_quiz::{AnswerSubmission, QuizRecord, Verdict};
use tracing::info;

use crate::error::{QuizError, Result};
use crate::store::QuizStore;

/// Scores a submission against a quiz record.
///
/// Each question contributes one point when the submitted choice id for
/// its question id equals the stored `correct_choice_id`. The verdict is
/// `correct` only on a full score.
#[must_use]
pub fn score_submission(record: &QuizRecord, submission: &AnswerSubmission) -> Verdict {
    let score = record
        .questions
        .iter()
        .filter(|question| {
            submission
                .get(&question.id)
                .is_some_and(|choice| *choice == question.correct_choice_id)
        })
        .count();

    Verdict::new(score, record.questions.len())
}

/// Resolves submissions against stored quizzes.
#[derive(Debug, Clone)]
pub struct VerificationService {
    store: QuizStore,
}

impl VerificationService {
    /// Creates a service over the given store.
    #[must_use]
    pub const fn new(store: QuizStore) -> Self {
        Self { store }
    }

    /// Verifies a submission against the quiz stored under `quiz_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NotFound`] if the id is unknown or the
    /// record has expired. Never fabricates a verdict for an unknown
    /// quiz.
    pub async fn verify(&self, quiz_id: &str, submission: &AnswerSubmission) -> Result<Verdict> {
        let record = self
            .store
            .get(quiz_id)
            .await
            .ok_or_else(|| QuizError::not_found(quiz_id))?;

        let verdict = score_submission(&record, submission);

        info!(
            quiz_id = %record.quiz_id,
            score = verdict.score,
            total = verdict.total,
            correct = verdict.correct,
            "Quiz verified"
        );

        Ok(verdict)
    }
}
