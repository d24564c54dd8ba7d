//! In-memory adapters for the board hierarchy.

mod repository;

pub use repository::InMemoryBoardRepository;
