use std::sync::Arc;

use crate::fixtures::fakes::{EchoTranscriber, FailingEvaluator, FailingTranscriber, ScoreFromTranscript};
use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn submit_runs_full_enrichment() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let user = app.register_user("speaker").await;
    let question_id = app.create_question(&user.token, "Design a fridge").await;

    let resp = app.submit_attempt(&user.token, &question_id, "8").await;
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();

    assert_eq!(json["transcript"], "8");
    assert_eq!(json["score"], 8.0);
    assert_eq!(json["feedback"]["overall_score"], 8.0);
    assert_eq!(json["feedback"]["scores"]["user_focus"], 8.0);
    assert_eq!(json["question_id"], question_id.as_str());
}

#[tokio::test]
async fn submit_for_missing_question_is_not_found_and_writes_nothing() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let user = app.register_user("ghost").await;
    let missing = bson::oid::ObjectId::new().to_hex();

    let resp = app.submit_attempt(&user.token, &missing, "8").await;
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app.auth_get("/api/attempt", &user.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn transcription_failure_still_persists_the_attempt() {
    let Some(app) =
        TestApp::spawn_with(Arc::new(FailingTranscriber), Arc::new(ScoreFromTranscript)).await
    else {
        return;
    };

    let user = app.register_user("unlucky").await;
    let question_id = app.create_question(&user.token, "Design a fridge").await;

    let resp = app.submit_attempt(&user.token, &question_id, "8").await;
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert!(json["transcript"].is_null());
    assert!(json["score"].is_null());
    assert!(json["feedback"].is_null());

    // Durable, not just in the response.
    let attempt_id = json["id"].as_str().unwrap();
    let resp = app
        .auth_get(&format!("/api/attempt/{attempt_id}"), &user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn evaluation_failure_leaves_score_and_feedback_null_together() {
    let Some(app) =
        TestApp::spawn_with(Arc::new(EchoTranscriber), Arc::new(FailingEvaluator)).await
    else {
        return;
    };

    let user = app.register_user("halfway").await;
    let question_id = app.create_question(&user.token, "Design a fridge").await;

    let resp = app.submit_attempt(&user.token, &question_id, "an answer").await;
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["transcript"], "an answer");
    assert!(json["score"].is_null());
    assert!(json["feedback"].is_null());
}

#[tokio::test]
async fn empty_recording_still_persists_the_attempt() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let user = app.register_user("silent").await;
    let question_id = app.create_question(&user.token, "Design a fridge").await;

    let resp = app.submit_attempt(&user.token, &question_id, "").await;
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert!(json["transcript"].is_null());
    assert!(json["score"].is_null());
    assert!(json["feedback"].is_null());
}

#[tokio::test]
async fn attempts_are_readable_only_by_their_owner() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let owner = app.register_user("attempt_owner").await;
    let other = app.register_user("attempt_other").await;
    let question_id = app.create_question(&owner.token, "Design a fridge").await;

    let resp = app.submit_attempt(&owner.token, &question_id, "7").await;
    let json: Value = resp.json().await.unwrap();
    let attempt_id = json["id"].as_str().unwrap();

    let resp = app
        .auth_get(&format!("/api/attempt/{attempt_id}"), &other.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
