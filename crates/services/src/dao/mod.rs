pub mod attempt;
pub mod base;
pub mod friendship;
pub mod question;
pub mod user;

pub use base::BaseDao;
