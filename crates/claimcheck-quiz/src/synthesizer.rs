//! Bounded local question synthesis.
//!
//! Runs the classifier over the first few features of a quiz request and
//! returns the resulting question sequence. Features beyond the cap are
//! ignored to bound quiz length.

use crate::classifier::classify;
use crate::question::{Feature, Question};

/// Maximum number of questions produced by local synthesis.
pub const MAX_QUESTIONS: usize = 3;

/// Errors from local synthesis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    /// No features were supplied. The API layer rejects this earlier;
    /// the check here keeps the library safe to call directly.
    #[error("cannot synthesize a quiz from an empty feature list")]
    EmptyFeatures,
}

/// Synthesizes questions from the first [`MAX_QUESTIONS`] features,
/// classifying each with its position as the ordinal. Output order
/// follows input order.
///
/// # Errors
///
/// Returns [`SynthesisError::EmptyFeatures`] if `features` is empty.
pub fn synthesize(features: &[Feature]) -> Result<Vec<Question>, SynthesisError> {
    if features.is_empty() {
        return Err(SynthesisError::EmptyFeatures);
    }

    Ok(features
        .iter()
        .take(MAX_QUESTIONS)
        .enumerate()
        .map(|(ordinal, feature)| classify(feature, ordinal))
        .collect())
}
