//! End-to-end tests against a real server instance.
//!
//! These need a reachable MongoDB; set `TEST_MONGODB_URI` (e.g.
//! `mongodb://localhost:27017`) to enable them. Without it every test
//! skips. Each spawned app gets its own throwaway database and upload dir,
//! and the AI adapters are replaced with deterministic fakes.

pub mod fixtures;

#[cfg(test)]
mod attempt_tests;
#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod friend_tests;
#[cfg(test)]
mod question_tests;
