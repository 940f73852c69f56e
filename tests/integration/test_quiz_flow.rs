//! End-to-end integration tests for the claimcheck quiz server
//!
//! These tests drive the full HTTP surface: quiz creation from a
//! feature list, retrieval of the stored record, and answer
//! verification. Local rule-based synthesis is used throughout so the
//! tests need no network access.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use claimcheck_server::{create_router, AppState, Config};
use tower::util::ServiceExt;

/// Builds a router in local-synthesis mode with default configuration.
fn router() -> Router {
    let state = AppState::new(Config::default()).expect("Failed to build app state");
    create_router(state)
}

async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> Response {
    router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed")
}

async fn get_uri(router: Router, uri: &str) -> Response {
    router
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed")
}

async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&body).expect("Body is not valid JSON")
}

/// Creates a quiz from the canonical three-feature backpack scenario and
/// returns its id and questions.
async fn create_backpack_quiz(router: Router) -> (String, serde_json::Value) {
    let response = post_json(
        router,
        "/api/create-quiz",
        serde_json::json!({
            "features": [
                "Color: matte black",
                "Brand: Nike",
                "Marks: scratch on right strap"
            ],
            "objectType": "backpack",
            "source": "manual"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let quiz_id = body["quizId"]
        .as_str()
        .expect("Response missing quizId")
        .to_string();
    (quiz_id, body["questions"].clone())
}

/// Tests the full create -> fetch -> verify flow on the canonical
/// backpack scenario.
#[tokio::test]
async fn test_full_quiz_lifecycle() {
    let router = router();

    let (quiz_id, questions) = create_backpack_quiz(router.clone()).await;
    let questions = questions.as_array().expect("questions is not an array");
    assert_eq!(questions.len(), 3);

    // "Color: matte black" matches the color rule.
    assert_eq!(questions[0]["id"], "q1");
    assert_eq!(questions[0]["text"], "What is the main color of the item?");
    assert_eq!(questions[0]["choices"][0]["text"], "Black");

    // "Brand: Nike" matches no rule; the fallback embeds the feature as
    // the first (correct) choice.
    assert_eq!(questions[1]["id"], "q2");
    assert_eq!(questions[1]["choices"][0]["text"], "Brand: Nike");

    // "scratch on right strap" contains "right" and so matches the
    // side rule before the damage rule.
    assert_eq!(questions[2]["id"], "q3");
    assert_eq!(questions[2]["text"], "Which side is described as different?");
    assert_eq!(questions[2]["choices"][0]["text"], "Left");

    // Every question keeps the correct choice first.
    for question in questions {
        assert_eq!(question["correctChoiceId"], "a");
        assert_eq!(question["choices"].as_array().map(Vec::len), Some(4));
    }

    // The stored record is retrievable and carries the inputs.
    let response = get_uri(router.clone(), &format!("/api/get-quiz?quizId={quiz_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["quizId"], quiz_id.as_str());
    assert_eq!(record["objectType"], "backpack");
    assert_eq!(record["features"].as_array().map(Vec::len), Some(3));
    assert!(record["createdAt"].is_string());

    // Submitting the first choice everywhere passes verification.
    let response = post_json(
        router,
        "/api/check-quiz",
        serde_json::json!({
            "quizId": quiz_id,
            "answers": {"q1": "a", "q2": "a", "q3": "a"}
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let verdict = body_json(response).await;
    assert_eq!(verdict["correct"], true);
    assert_eq!(verdict["score"], 3);
    assert_eq!(verdict["total"], 3);
}

/// Tests that an all-wrong submission is scored but not accepted.
#[tokio::test]
async fn test_wrong_answers_fail_verification() {
    let router = router();
    let (quiz_id, _) = create_backpack_quiz(router.clone()).await;

    let response = post_json(
        router,
        "/api/check-quiz",
        serde_json::json!({
            "quizId": quiz_id,
            "answers": {"q1": "b", "q2": "c", "q3": "d"}
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let verdict = body_json(response).await;
    assert_eq!(verdict["correct"], false);
    assert_eq!(verdict["score"], 0);
    assert_eq!(verdict["total"], 3);
}

/// Tests that a partial submission counts unanswered questions as
/// misses.
#[tokio::test]
async fn test_partial_submission_counts_misses() {
    let router = router();
    let (quiz_id, _) = create_backpack_quiz(router.clone()).await;

    let response = post_json(
        router,
        "/api/check-quiz",
        serde_json::json!({
            "quizId": quiz_id,
            "answers": {"q1": "a"}
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let verdict = body_json(response).await;
    assert_eq!(verdict["correct"], false);
    assert_eq!(verdict["score"], 1);
    assert_eq!(verdict["total"], 3);
}

/// Tests that quiz creation caps the question count even for long
/// feature lists.
#[tokio::test]
async fn test_long_feature_list_is_capped() {
    let router = router();

    let response = post_json(
        router,
        "/api/create-quiz",
        serde_json::json!({
            "features": [
                "Color: blue",
                "Marks: crack on the lid",
                "Sticker: band logo",
                "Strap: left side worn",
                "Zipper: replaced"
            ]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["questions"].as_array().map(Vec::len), Some(3));
}

/// Tests the documented rejection of requests without a usable feature
/// list.
#[tokio::test]
async fn test_create_quiz_rejects_missing_features() {
    for body in [
        serde_json::json!({}),
        serde_json::json!({"features": []}),
        serde_json::json!({"features": "Color: blue"}),
    ] {
        let response = post_json(router(), "/api/create-quiz", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "features array is required");
    }
}

/// Tests that lookups and verifications against unknown ids are 404s.
#[tokio::test]
async fn test_unknown_quiz_id_is_not_found() {
    let router = router();

    let response = get_uri(router.clone(), "/api/get-quiz?quizId=no-such-quiz").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        router,
        "/api/check-quiz",
        serde_json::json!({"quizId": "no-such-quiz", "answers": {}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "quiz not found");
}

/// Tests that two quizzes created from the same features get distinct
/// ids and are independently verifiable.
#[tokio::test]
async fn test_concurrent_quizzes_are_independent() {
    let router = router();

    let (first_id, _) = create_backpack_quiz(router.clone()).await;
    let (second_id, _) = create_backpack_quiz(router.clone()).await;
    assert_ne!(first_id, second_id);

    let response = post_json(
        router,
        "/api/check-quiz",
        serde_json::json!({
            "quizId": second_id,
            "answers": {"q1": "a", "q2": "a", "q3": "a"}
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let verdict = body_json(response).await;
    assert_eq!(verdict["correct"], true);
}
