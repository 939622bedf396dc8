pub mod comments;
pub mod posts;
pub mod serialize;
pub mod slug;
pub mod tags;
pub mod users;
