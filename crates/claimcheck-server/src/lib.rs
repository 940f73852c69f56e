//! Claimcheck quiz server
//!
//! HTTP service for ownership-verification quizzes: synthesizes
//! quizzes from item features, stores them, and verifies submitted
//! answers.

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod verify;

pub use api::{
    create_router, AppState, CheckQuizRequest, CreateQuizRequest, CreateQuizResponse,
    ErrorResponse, GetQuizParams, QuizSource,
};
pub use config::{Config, GenerationSettings, SynthesisMode};
pub use error::{QuizError, Result};
pub use store::{IdGenerator, QuizStore, UuidGenerator};
pub use verify::{score_submission, VerificationService};
