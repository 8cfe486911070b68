pub mod attempt;
pub mod auth;
pub mod dao;
pub mod leaderboard;
pub mod storage;

pub use dao::base::{DaoError, DaoResult};
