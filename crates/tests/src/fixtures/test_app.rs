use std::sync::Arc;

use bson::oid::ObjectId;
use reqwest::RequestBuilder;
use serde_json::Value;
use tempfile::TempDir;

use pmprep_ai::{Evaluator, Transcriber};
use pmprep_api::{build_router, state::AppState};
use pmprep_services::{auth::AuthService, storage::AudioStore};

use super::fakes::{EchoTranscriber, ScoreFromTranscript};

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    // Held so the upload dir outlives the server.
    _upload_dir: TempDir,
}

pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl TestApp {
    /// Spawns a server with deterministic fake adapters. Returns `None`
    /// (test should skip) when `TEST_MONGODB_URI` is not set.
    pub async fn spawn() -> Option<TestApp> {
        Self::spawn_with(Arc::new(EchoTranscriber), Arc::new(ScoreFromTranscript)).await
    }

    pub async fn spawn_with(
        transcriber: Arc<dyn Transcriber>,
        evaluator: Arc<dyn Evaluator>,
    ) -> Option<TestApp> {
        let Ok(uri) = std::env::var("TEST_MONGODB_URI") else {
            eprintln!("TEST_MONGODB_URI not set; skipping");
            return None;
        };

        // Fresh database per spawned app so tests never interfere.
        let db_name = format!("pmprep_test_{}", ObjectId::new().to_hex());
        let db = pmprep_db::connect(&uri, &db_name)
            .await
            .expect("mongodb connect");
        pmprep_db::indexes::ensure_indexes(&db).await.expect("indexes");

        let upload_dir = tempfile::tempdir().expect("tempdir");
        let audio = AudioStore::new(upload_dir.path());
        audio.init().await.expect("upload dir");

        let auth = AuthService::new("test-secret".to_string(), 3600);
        let state = AppState::new(&db, auth, audio, transcriber, evaluator);
        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Some(TestApp {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _upload_dir: upload_dir,
        })
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(format!("{}{}", self.base_url, path))
    }

    pub fn auth_get(&self, path: &str, token: &str) -> RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn auth_post(&self, path: &str, token: &str) -> RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn auth_put(&self, path: &str, token: &str) -> RequestBuilder {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
    }

    pub async fn register_user(&self, username: &str) -> TestUser {
        let resp = self
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "correct-horse-battery",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200, "register {username}");
        let json: Value = resp.json().await.unwrap();

        TestUser {
            id: json["user"]["id"].as_str().unwrap().to_string(),
            username: username.to_string(),
            token: json["access_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn create_question(&self, token: &str, title: &str) -> String {
        let resp = self
            .auth_post("/api/question", token)
            .json(&serde_json::json!({
                "title": title,
                "description": "How would you approach this?",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201, "create question");
        let json: Value = resp.json().await.unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    /// Submits an attempt whose "audio" is `audio_text` — with the default
    /// fakes the transcript echoes it and the score parses from it.
    pub async fn submit_attempt(
        &self,
        token: &str,
        question_id: &str,
        audio_text: &str,
    ) -> reqwest::Response {
        let form = reqwest::multipart::Form::new()
            .text("question_id", question_id.to_string())
            .part(
                "audio",
                reqwest::multipart::Part::bytes(audio_text.as_bytes().to_vec())
                    .file_name("answer.webm"),
            );
        self.auth_post("/api/attempt", token)
            .multipart(form)
            .send()
            .await
            .unwrap()
    }
}
