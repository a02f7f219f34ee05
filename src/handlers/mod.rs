// Handlers are thin: validate input, run the query or mutation, wrap the
// result in the response envelope. Route wiring lives in main.rs.

pub mod auth;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod upload;
pub mod users;
pub mod videos;
