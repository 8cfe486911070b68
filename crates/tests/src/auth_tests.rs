use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn register_login_me_roundtrip() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let user = app.register_user("alice").await;

    let resp = app
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "alice@example.com",
            "password": "correct-horse-battery",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let token = json["access_token"].as_str().unwrap();

    let resp = app.auth_get("/api/auth/me", token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["username"], "alice");
    assert_eq!(json["id"], user.id.as_str());
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    app.register_user("bob").await;

    let resp = app
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "username": "bob",
            "email": "bob2@example.com",
            "password": "correct-horse-battery",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    app.register_user("carol").await;

    let resp = app
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "carol@example.com",
            "password": "not-the-password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn invalid_email_fails_validation() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let resp = app
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "username": "dave",
            "email": "not-an-email",
            "password": "correct-horse-battery",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let resp = app.get("/api/auth/me").send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}
