pub mod attempt;
pub mod auth;
pub mod friend;
pub mod leaderboard;
pub mod question;
