//! `PostgreSQL` adapters for board hierarchy persistence.

mod models;
mod repository;
mod schema;

pub use repository::{BoardPgPool, PostgresBoardRepository};
