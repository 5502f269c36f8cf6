//! Storage layer for pmatch

mod migrations;
mod repository;
mod session;
mod sync_repository;

pub use repository::{Repository, SqlitePotentialMatchRepository};
pub use session::Session;
