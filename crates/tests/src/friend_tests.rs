use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn request_and_accept_makes_both_sides_friends() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let alice = app.register_user("f_alice").await;
    let bob = app.register_user("f_bob").await;

    let resp = app
        .auth_post("/api/friend/request", &alice.token)
        .json(&serde_json::json!({ "recipient_id": bob.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    let friendship_id = json["id"].as_str().unwrap();
    assert_eq!(json["status"], "pending");

    // Bob sees the pending request.
    let resp = app.auth_get("/api/friend/requests", &bob.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);

    let resp = app
        .auth_post(&format!("/api/friend/{friendship_id}/accept"), &bob.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "accepted");

    // Both directions now count as friends.
    for (token, expected) in [(&alice.token, "f_bob"), (&bob.token, "f_alice")] {
        let resp = app.auth_get("/api/friend", token).send().await.unwrap();
        let json: Value = resp.json().await.unwrap();
        let friends = json.as_array().unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0]["username"], expected);
    }
}

#[tokio::test]
async fn duplicate_request_in_either_direction_is_a_conflict() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let alice = app.register_user("d_alice").await;
    let bob = app.register_user("d_bob").await;

    let resp = app
        .auth_post("/api/friend/request", &alice.token)
        .json(&serde_json::json!({ "recipient_id": bob.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    // Same direction again.
    let resp = app
        .auth_post("/api/friend/request", &alice.token)
        .json(&serde_json::json!({ "recipient_id": bob.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);

    // Reverse direction.
    let resp = app
        .auth_post("/api/friend/request", &bob.token)
        .json(&serde_json::json!({ "recipient_id": alice.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn only_the_recipient_may_accept() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let alice = app.register_user("a_alice").await;
    let bob = app.register_user("a_bob").await;

    let resp = app
        .auth_post("/api/friend/request", &alice.token)
        .json(&serde_json::json!({ "recipient_id": bob.id }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let friendship_id = json["id"].as_str().unwrap();

    let resp = app
        .auth_post(&format!("/api/friend/{friendship_id}/accept"), &alice.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn self_request_fails_validation() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let alice = app.register_user("s_alice").await;
    let resp = app
        .auth_post("/api/friend/request", &alice.token)
        .json(&serde_json::json!({ "recipient_id": alice.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn rejected_request_does_not_create_friends() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let alice = app.register_user("r_alice").await;
    let bob = app.register_user("r_bob").await;

    let resp = app
        .auth_post("/api/friend/request", &alice.token)
        .json(&serde_json::json!({ "recipient_id": bob.id }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let friendship_id = json["id"].as_str().unwrap();

    let resp = app
        .auth_post(&format!("/api/friend/{friendship_id}/reject"), &bob.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app.auth_get("/api/friend", &alice.token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json.as_array().unwrap().is_empty());

    // The pair is still occupied: no new request allowed.
    let resp = app
        .auth_post("/api/friend/request", &alice.token)
        .json(&serde_json::json!({ "recipient_id": bob.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}
