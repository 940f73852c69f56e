//! Quiz data model.
//!
//! Wire types shared by the local synthesizer, the external generation
//! adapter, the store, and the HTTP API. All types serialize as camelCase
//! JSON. A stored [`QuizRecord`] is immutable: it is built once from a
//! [`QuizDraft`] and only ever read afterwards.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text string describing one identifying trait of an object,
/// e.g. `"Color: matte black"`. No structure is required; classification
/// tolerates arbitrary casing and content.
pub type Feature = String;

/// Mapping from question id to the choice id the respondent selected.
pub type AnswerSubmission = HashMap<String, String>;

/// Minimum number of choices a valid question carries.
pub const MIN_CHOICES: usize = 2;

/// Ordered alphabet for choice identifiers.
const CHOICE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Returns the letter identifier for the choice at `index` (`a`, `b`, ...),
/// or `None` once the alphabet is exhausted.
#[must_use]
pub fn choice_id(index: usize) -> Option<String> {
    CHOICE_ALPHABET
        .get(index)
        .map(|letter| char::from(*letter).to_string())
}

/// One selectable option within a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Single-letter identifier, assigned in presentation order from `a`.
    pub id: String,
    /// Respondent-visible option text.
    pub text: String,
}

/// A single multiple-choice item derived from one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier unique within its quiz (`q1`, `q2`, ...).
    pub id: String,
    /// Question text shown to the respondent.
    pub text: String,
    /// Ordered choices; at least [`MIN_CHOICES`], conventionally 4.
    pub choices: Vec<Choice>,
    /// Id of the single correct choice; must exist in `choices`.
    pub correct_choice_id: String,
}

impl Question {
    /// Checks the structural invariants of this question.
    ///
    /// Used at the external generation boundary to reject non-conforming
    /// remote output before anything is stored:
    /// - at least [`MIN_CHOICES`] choices;
    /// - choice ids are the letter prefix `a`, `b`, ... with no gaps
    ///   (which also makes them unique);
    /// - `correct_choice_id` references exactly one of its own choices.
    ///
    /// # Errors
    ///
    /// Returns the first [`QuestionError`] encountered, in the order above.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.choices.len() < MIN_CHOICES {
            return Err(QuestionError::TooFewChoices {
                question_id: self.id.clone(),
                count: self.choices.len(),
            });
        }

        for (index, choice) in self.choices.iter().enumerate() {
            let expected = choice_id(index).ok_or_else(|| QuestionError::TooManyChoices {
                question_id: self.id.clone(),
                count: self.choices.len(),
            })?;
            if choice.id != expected {
                return Err(QuestionError::NonSequentialChoiceId {
                    question_id: self.id.clone(),
                    expected,
                    found: choice.id.clone(),
                });
            }
        }

        if !self
            .choices
            .iter()
            .any(|choice| choice.id == self.correct_choice_id)
        {
            return Err(QuestionError::UnknownCorrectChoice {
                question_id: self.id.clone(),
                correct_choice_id: self.correct_choice_id.clone(),
            });
        }

        Ok(())
    }
}

/// Structural invariant violations detected by [`Question::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionError {
    /// Fewer than [`MIN_CHOICES`] choices.
    #[error("question '{question_id}' has {count} choices, need at least {MIN_CHOICES}")]
    TooFewChoices {
        /// Id of the offending question.
        question_id: String,
        /// Number of choices present.
        count: usize,
    },

    /// More choices than the identifier alphabet can label.
    #[error("question '{question_id}' has {count} choices, more than the alphabet can label")]
    TooManyChoices {
        /// Id of the offending question.
        question_id: String,
        /// Number of choices present.
        count: usize,
    },

    /// A choice id breaks the `a`, `b`, ... sequence.
    #[error("question '{question_id}' has choice id '{found}' where '{expected}' was expected")]
    NonSequentialChoiceId {
        /// Id of the offending question.
        question_id: String,
        /// The id required at this position.
        expected: String,
        /// The id actually present.
        found: String,
    },

    /// `correct_choice_id` does not reference any of the question's choices.
    #[error("question '{question_id}' marks '{correct_choice_id}' correct but has no such choice")]
    UnknownCorrectChoice {
        /// Id of the offending question.
        question_id: String,
        /// The dangling correct-choice reference.
        correct_choice_id: String,
    },
}

/// A quiz as produced by a synthesis path, before it has been assigned an
/// identifier and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    /// Optional caller-supplied object type (e.g. `"backpack"`).
    pub object_type: Option<String>,
    /// Features exactly as supplied at creation time.
    pub features: Vec<Feature>,
    /// Questions produced by local synthesis or external generation.
    pub questions: Vec<Question>,
}

impl QuizDraft {
    /// Completes this draft into an immutable [`QuizRecord`].
    #[must_use]
    pub fn into_record(self, quiz_id: String, created_at: DateTime<Utc>) -> QuizRecord {
        QuizRecord {
            quiz_id,
            object_type: self.object_type,
            features: self.features,
            questions: self.questions,
            created_at,
        }
    }
}

/// The immutable bundle of features and generated questions stored under
/// a quiz identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    /// Globally unique quiz identifier.
    pub quiz_id: String,
    /// Optional object type supplied at creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    /// Features exactly as supplied at creation time.
    pub features: Vec<Feature>,
    /// Ordered question sequence.
    pub questions: Vec<Question>,
    /// Creation timestamp; drives store expiry.
    pub created_at: DateTime<Utc>,
}

/// Outcome of verifying a submission against a stored quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Number of submitted answers matching the stored correct choice.
    pub score: usize,
    /// Number of questions in the quiz.
    pub total: usize,
    /// `true` iff every question was answered correctly.
    pub correct: bool,
}

impl Verdict {
    /// Builds a verdict from a score and question count.
    #[must_use]
    pub const fn new(score: usize, total: usize) -> Self {
        Self {
            score,
            total,
            correct: score == total,
        }
    }
}
