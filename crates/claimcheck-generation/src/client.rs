//! HTTP client toward the generation service.

use std::time::Duration;

use claimcheck_quiz::{Feature, Question, QuestionError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::prompt::QUIZ_GENERATION_PROMPT;

/// Sampling temperature for generation requests. Low, because the output
/// must be strict JSON.
const TEMPERATURE: f32 = 0.2;

/// Errors from the external generation path.
///
/// Transport failures, unparsable payloads, and structurally invalid
/// question sets are kept distinct so operators can tell a provider
/// outage from a malformed answer.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No credential is configured; the remote call is never attempted.
    #[error("no generation credential is configured")]
    MissingCredential,

    /// Network, timeout, or non-success HTTP status from the service.
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response text did not parse as the expected question payload.
    #[error("generation response is not a valid question payload: {0}")]
    MalformedResponse(String),

    /// The payload parsed but a question violates the quiz invariants.
    #[error("generated quiz is invalid: {0}")]
    InvalidQuestions(#[from] QuestionError),

    /// The payload parsed but contained no questions at all.
    #[error("generation response contained no questions")]
    EmptyQuestions,
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

/// One chat message.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions response body, reduced to the fields we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

/// The structured payload expected inside the response text.
#[derive(Debug, Deserialize)]
struct GeneratedQuiz {
    questions: Vec<Question>,
}

/// Client for the external generation service.
///
/// Construction fails fast when no credential is configured; a client
/// that exists can always attempt a call.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GenerationClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// The request timeout bounds the only suspending operation in the
    /// system; there is no retry, a timed-out call surfaces as
    /// [`GenerationError::Request`].
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingCredential`] if `api_key` is
    /// empty, and [`GenerationError::Request`] if the HTTP client cannot
    /// be built.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    /// Generates a question set for the given features.
    ///
    /// Serializes `{features, objectType}` as the user message, sends it
    /// with the fixed instruction prompt, and parses the response text as
    /// a question payload. Every returned question is validated against
    /// the quiz invariants before the set is handed back.
    ///
    /// # Errors
    ///
    /// Any [`GenerationError`] except `MissingCredential`. Nothing is
    /// retried and no partial result is returned.
    pub async fn generate(
        &self,
        features: &[Feature],
        object_type: Option<&str>,
    ) -> Result<Vec<Question>, GenerationError> {
        let payload = serde_json::json!({
            "features": features,
            "objectType": object_type,
        })
        .to_string();

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: QUIZ_GENERATION_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &payload,
                },
            ],
            temperature: TEMPERATURE,
        };

        debug!(
            feature_count = features.len(),
            model = %self.model,
            "Requesting quiz generation"
        );

        let response: ChatResponse = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| {
                GenerationError::MalformedResponse("response contained no choices".to_string())
            })?;

        let questions = parse_questions(content)?;

        info!(
            question_count = questions.len(),
            "Generated quiz accepted"
        );

        Ok(questions)
    }
}

/// Parses and validates the question payload from the response text.
///
/// Tolerates a markdown code fence around the JSON even though the prompt
/// forbids one; models emit them anyway.
fn parse_questions(content: &str) -> Result<Vec<Question>, GenerationError> {
    let text = strip_code_fence(content);

    let parsed: GeneratedQuiz = serde_json::from_str(text)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    if parsed.questions.is_empty() {
        return Err(GenerationError::EmptyQuestions);
    }

    for question in &parsed.questions {
        question.validate()?;
    }

    Ok(parsed.questions)
}

/// Strips a surrounding ``` fence (with optional language tag) if present.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line.
    match inner.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => inner.trim(),
    }
}
