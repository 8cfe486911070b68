pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/me", get(routes::auth::me));

    let question_routes = Router::new()
        .route("/", get(routes::question::list))
        .route("/", post(routes::question::create))
        .route("/{question_id}", get(routes::question::get))
        .route("/{question_id}", put(routes::question::update))
        .route("/{question_id}", delete(routes::question::delete));

    // Attempt submission carries an audio file (50 MB body limit)
    let attempt_routes = Router::new()
        .route("/", get(routes::attempt::list))
        .route("/", post(routes::attempt::create))
        .route("/{attempt_id}", get(routes::attempt::get))
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024));

    let friend_routes = Router::new()
        .route("/", get(routes::friend::list))
        .route("/request", post(routes::friend::request))
        .route("/requests", get(routes::friend::pending))
        .route("/{friendship_id}/accept", post(routes::friend::accept))
        .route("/{friendship_id}/reject", post(routes::friend::reject));

    let leaderboard_routes = Router::new()
        .route("/global", get(routes::leaderboard::global))
        .route("/friends", get(routes::leaderboard::friends));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/question", question_routes)
        .nest("/attempt", attempt_routes)
        .nest("/friend", friend_routes)
        .nest("/leaderboard", leaderboard_routes);

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
