pub mod manager;
pub mod models;
pub mod repos;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
