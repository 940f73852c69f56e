//! claimcheck quiz engine
//!
//! Pure domain library: the quiz data model, the rule-based feature
//! classifier, and the bounded question synthesizer. No I/O and no async;
//! everything here is deterministic and directly testable.

pub mod classifier;
pub mod question;
pub mod synthesizer;

pub use classifier::{classify, MatchRule, CHOICES_PER_QUESTION};
pub use question::{
    choice_id, AnswerSubmission, Choice, Feature, Question, QuestionError, QuizDraft, QuizRecord,
    Verdict, MIN_CHOICES,
};
pub use synthesizer::{synthesize, SynthesisError, MAX_QUESTIONS};
