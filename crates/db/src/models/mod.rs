pub mod attempt;
pub mod friendship;
pub mod question;
pub mod user;

pub use attempt::{Attempt, CriterionScores, Feedback};
pub use friendship::{Friendship, FriendshipStatus};
pub use question::Question;
pub use user::User;
