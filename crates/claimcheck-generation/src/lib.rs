//! External generation adapter.
//!
//! Alternative synthesis path: instead of the local rule-based
//! classifier, the full feature list is sent to a remote
//! OpenAI-compatible text-generation service with a fixed instruction
//! prompt, and the returned text is parsed and validated into a question
//! set. The remote service is not trusted to be well-formed; anything
//! failing the quiz invariants is rejected before it can be stored.

pub mod client;
pub mod prompt;

pub use client::{GenerationClient, GenerationError};
pub use prompt::QUIZ_GENERATION_PROMPT;
