//! HTTP API endpoints for the claimcheck server.
//!
//! # Endpoints
//!
//! - `POST /api/create-quiz` - Synthesize and store a quiz from features
//! - `GET /api/get-quiz?quizId=<id>` - Fetch a stored quiz record
//! - `POST /api/check-quiz` - Verify submitted answers against a quiz
//!
//! # Example
//!
//! ```no_run
//! use claimcheck_server::{AppState, Config, create_router};
//!
//! # async fn example() {
//! let state = AppState::new(Config::default()).unwrap();
//!
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//! axum::serve(listener, router).await.unwrap();
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use claimcheck_generation::GenerationClient;
use claimcheck_quiz::{synthesize, AnswerSubmission, Question, QuizDraft, QuizRecord, Verdict};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

use crate::config::{Config, SynthesisMode};
use crate::error::{QuizError, Result};
use crate::store::QuizStore;
use crate::verify::VerificationService;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Where the features of a creation request came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizSource {
    /// Extracted from an uploaded image by an external collaborator.
    Image,
    /// Typed in by the owner.
    #[default]
    Manual,
}

/// Request body for the create-quiz endpoint.
///
/// `features` is kept untyped here so that a missing field, a non-array,
/// and an empty array all fail the same duck-typed check with the same
/// client-facing message, rather than three different serde rejections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    /// Identifying features of the object; must be a non-empty array of
    /// strings.
    #[serde(default)]
    pub features: Option<serde_json::Value>,
    /// Optional object type (e.g. `"backpack"`).
    #[serde(default)]
    pub object_type: Option<String>,
    /// Origin of the features.
    #[serde(default)]
    pub source: QuizSource,
}

/// Response body for the create-quiz endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizResponse {
    /// Identifier the quiz was stored under.
    pub quiz_id: String,
    /// The synthesized questions.
    pub questions: Vec<Question>,
}

/// Query parameters for the get-quiz endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetQuizParams {
    /// Identifier of the quiz to fetch.
    pub quiz_id: String,
}

/// Request body for the check-quiz endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckQuizRequest {
    /// Identifier of the quiz to verify against.
    pub quiz_id: String,
    /// Mapping from question id to selected choice id.
    #[serde(default)]
    pub answers: AnswerSubmission,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// The quiz record store.
    pub store: QuizStore,
    /// Verification over the same store.
    pub verifier: VerificationService,
    /// External generation client; `None` when local synthesis is
    /// selected.
    pub generator: Option<Arc<GenerationClient>>,
}

impl AppState {
    /// Creates application state from configuration, building the
    /// generation client when the external path is selected.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Configuration` if the external path is
    /// selected but the client cannot be constructed.
    pub fn new(config: Config) -> Result<Self> {
        let ttl_secs = i64::try_from(config.quiz_ttl_secs).unwrap_or(i64::MAX);
        let ttl = chrono::Duration::try_seconds(ttl_secs).unwrap_or(chrono::Duration::MAX);
        Self::with_store(config, QuizStore::new(ttl))
    }

    /// Creates application state over an existing store.
    ///
    /// Useful for tests that inject a deterministic id generator.
    ///
    /// # Errors
    ///
    /// Same as [`AppState::new`].
    pub fn with_store(config: Config, store: QuizStore) -> Result<Self> {
        let generator = match config.synthesis_mode() {
            SynthesisMode::External => {
                let settings = &config.generation;
                let client = GenerationClient::new(
                    settings.base_url.clone(),
                    settings.model.clone(),
                    settings.api_key.clone().unwrap_or_default(),
                    std::time::Duration::from_secs(settings.timeout_secs),
                )?;
                Some(Arc::new(client))
            }
            SynthesisMode::Local => None,
        };

        let verifier = VerificationService::new(store.clone());

        Ok(Self {
            config,
            store,
            verifier,
            generator,
        })
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Wraps [`QuizError`] with its HTTP mapping.
#[derive(Debug)]
struct ApiError(QuizError);

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            QuizError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
            QuizError::NotFound { .. } => (StatusCode::NOT_FOUND, "quiz not found".to_string()),
            QuizError::Generation(_) => (StatusCode::BAD_GATEWAY, self.0.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints.
///
/// # Arguments
///
/// * `state` - The shared application state
///
/// # Returns
///
/// An axum `Router` configured with:
/// - All API routes under `/api`
/// - CORS middleware for development
/// - Tracing middleware for request logging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS for development (allow all origins)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API routes
    let api_routes = Router::new()
        .route("/create-quiz", post(handle_create_quiz))
        .route("/get-quiz", get(handle_get_quiz))
        .route("/check-quiz", post(handle_check_quiz));

    // Combine with state and middleware
    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for `POST /api/create-quiz`.
///
/// Validates the feature list, synthesizes questions through the
/// configured path, stores the finished record, and returns its id
/// together with the questions.
async fn handle_create_quiz(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateQuizRequest>,
) -> std::result::Result<Json<CreateQuizResponse>, ApiError> {
    let features = parse_features(request.features.as_ref())?;

    info!(
        feature_count = features.len(),
        source = ?request.source,
        object_type = ?request.object_type,
        "Received quiz creation request"
    );

    let questions = match &state.generator {
        Some(client) => {
            debug!("Using external generation path");
            client
                .generate(&features, request.object_type.as_deref())
                .await
                .map_err(QuizError::from)?
        }
        None => {
            debug!("Using local synthesis path");
            // Non-empty by the check above; the synthesizer re-checks
            // for direct library callers.
            synthesize(&features)
                .map_err(|e| QuizError::validation(e.to_string()))?
        }
    };

    let draft = QuizDraft {
        object_type: request.object_type,
        features,
        questions: questions.clone(),
    };
    let quiz_id = state.store.create(draft).await;

    info!(
        %quiz_id,
        question_count = questions.len(),
        "Quiz created and stored"
    );

    Ok(Json(CreateQuizResponse { quiz_id, questions }))
}

/// Handler for `GET /api/get-quiz`.
///
/// Returns the stored record wholesale; this mirrors the documented
/// interface, which the quiz presentation layer renders from.
async fn handle_get_quiz(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GetQuizParams>,
) -> std::result::Result<Json<QuizRecord>, ApiError> {
    if params.quiz_id.trim().is_empty() {
        warn!("Rejected get-quiz request with blank quizId");
        return Err(QuizError::validation("quizId is required").into());
    }

    let record = state
        .store
        .get(&params.quiz_id)
        .await
        .ok_or_else(|| QuizError::not_found(&params.quiz_id))?;

    Ok(Json((*record).clone()))
}

/// Handler for `POST /api/check-quiz`.
///
/// Resolves the submission against the stored quiz and returns the
/// verdict.
async fn handle_check_quiz(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckQuizRequest>,
) -> std::result::Result<Json<Verdict>, ApiError> {
    if request.quiz_id.trim().is_empty() {
        warn!("Rejected check-quiz request with blank quizId");
        return Err(QuizError::validation("quizId is required").into());
    }

    let verdict = state
        .verifier
        .verify(&request.quiz_id, &request.answers)
        .await?;

    Ok(Json(verdict))
}

/// Duck-typed validation of the `features` field: it must be an array of
/// strings with at least one element. Anything else yields the same
/// client-facing validation error.
fn parse_features(features: Option<&serde_json::Value>) -> Result<Vec<String>> {
    let reject = || {
        warn!("Rejected quiz creation request without a usable features array");
        QuizError::validation("features array is required")
    };

    let array = features.and_then(serde_json::Value::as_array).ok_or_else(reject)?;

    if array.is_empty() {
        return Err(reject());
    }

    array
        .iter()
        .map(|value| value.as_str().map(str::to_string).ok_or_else(reject))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
