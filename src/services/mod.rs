pub mod auth;
pub mod slug;
