use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn create_and_get_question() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let user = app.register_user("qcreator").await;
    let question_id = app.create_question(&user.token, "Design a fridge for campers").await;

    let resp = app
        .get(&format!("/api/question/{question_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["title"], "Design a fridge for campers");
    assert_eq!(json["creator_id"], user.id.as_str());
}

#[tokio::test]
async fn only_creator_may_update() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let creator = app.register_user("owner").await;
    let other = app.register_user("intruder").await;
    let question_id = app.create_question(&creator.token, "Metrics for a news app").await;

    let resp = app
        .auth_put(&format!("/api/question/{question_id}"), &other.token)
        .json(&serde_json::json!({ "title": "hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_put(&format!("/api/question/{question_id}"), &creator.token)
        .json(&serde_json::json!({ "title": "Metrics for a podcast app" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["title"], "Metrics for a podcast app");
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let user = app.register_user("deleter").await;
    let question_id = app.create_question(&user.token, "Short-lived question").await;

    let resp = app
        .auth_delete(&format!("/api/question/{question_id}"), &user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = app
        .get(&format!("/api/question/{question_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn list_filters_by_category() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let user = app.register_user("lister").await;
    for (title, category) in [
        ("Design question", "Product Design"),
        ("Strategy question", "Strategy"),
    ] {
        let resp = app
            .auth_post("/api/question", &user.token)
            .json(&serde_json::json!({
                "title": title,
                "description": "desc",
                "category": category,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
    }

    let resp = app
        .get("/api/question?category=Strategy")
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Strategy question");
}
