pub mod auth;
pub mod categories;
pub mod permissions;
pub mod products;
pub mod reviews;
