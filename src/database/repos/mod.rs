pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod users;
pub mod videos;
