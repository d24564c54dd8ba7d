//! Board hierarchy management: boards, ordered columns, and ordered tasks.
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use kanban_core::board::{
//!     adapters::memory::InMemoryBoardRepository,
//!     domain::OwnerId,
//!     services::{CreateBoardRequest, KanbanService},
//! };
//! use mockable::DefaultClock;
//! use uuid::Uuid;
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let service = KanbanService::new(
//!     Arc::new(InMemoryBoardRepository::new()),
//!     Arc::new(DefaultClock),
//! );
//! let owner = OwnerId::from_uuid(Uuid::new_v4());
//! let view = service
//!     .create_board(owner, CreateBoardRequest::new("Sprint 1").with_columns(["To Do", "Done"]))
//!     .await
//!     .expect("board created");
//! assert_eq!(view.columns.len(), 2);
//! # });
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
