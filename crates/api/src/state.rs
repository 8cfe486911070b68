use std::sync::Arc;

use mongodb::Database;

use pmprep_ai::{Evaluator, Transcriber};
use pmprep_services::attempt::AttemptPipeline;
use pmprep_services::auth::AuthService;
use pmprep_services::dao::attempt::AttemptDao;
use pmprep_services::dao::friendship::FriendshipDao;
use pmprep_services::dao::question::QuestionDao;
use pmprep_services::dao::user::UserDao;
use pmprep_services::leaderboard::LeaderboardService;
use pmprep_services::storage::AudioStore;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserDao>,
    pub questions: Arc<QuestionDao>,
    pub attempts: Arc<AttemptDao>,
    pub friendships: Arc<FriendshipDao>,
    pub auth: Arc<AuthService>,
    pub pipeline: Arc<AttemptPipeline>,
    pub leaderboard: Arc<LeaderboardService>,
}

impl AppState {
    /// Wires DAOs and services together. The AI adapters are injected so
    /// tests can substitute fakes.
    pub fn new(
        db: &Database,
        auth: AuthService,
        audio: AudioStore,
        transcriber: Arc<dyn Transcriber>,
        evaluator: Arc<dyn Evaluator>,
    ) -> Self {
        let users = Arc::new(UserDao::new(db));
        let questions = Arc::new(QuestionDao::new(db));
        let attempts = Arc::new(AttemptDao::new(db));
        let friendships = Arc::new(FriendshipDao::new(db));

        let pipeline = Arc::new(AttemptPipeline::new(
            attempts.clone(),
            audio,
            transcriber,
            evaluator,
        ));
        let leaderboard = Arc::new(LeaderboardService::new(
            attempts.clone(),
            users.clone(),
            friendships.clone(),
        ));

        Self {
            users,
            questions,
            attempts,
            friendships,
            auth: Arc::new(auth),
            pipeline,
            leaderboard,
        }
    }
}
