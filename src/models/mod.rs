pub mod coordinate;
pub mod friends;
pub mod social;

pub use coordinate::Coordinate;
pub use friends::FriendEntry;
pub use social::{FollowedAccount, FollowingResponse, UserLookupResponse};
