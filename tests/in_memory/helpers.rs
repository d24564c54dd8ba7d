//! Shared test helpers for in-memory kanban integration tests.

use std::sync::Arc;

use kanban_core::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{BoardView, ColumnId, OwnerId},
    services::{CreateBoardRequest, KanbanService},
};
use mockable::DefaultClock;
use rstest::fixture;
use uuid::Uuid;

/// Service type exercised by the integration tests.
pub type TestService = KanbanService<InMemoryBoardRepository, DefaultClock>;

/// Provides a fresh service over an empty in-memory store.
#[fixture]
pub fn service() -> TestService {
    KanbanService::new(
        Arc::new(InMemoryBoardRepository::new()),
        Arc::new(DefaultClock),
    )
}

/// Provides a random principal.
#[fixture]
pub fn owner() -> OwnerId {
    OwnerId::from_uuid(Uuid::new_v4())
}

/// Creates a board with the given columns and returns its view.
///
/// # Panics
///
/// Panics when the board cannot be created.
pub async fn seed_board(
    service: &TestService,
    owner: OwnerId,
    name: &str,
    columns: &[&str],
) -> BoardView {
    service
        .create_board(
            owner,
            CreateBoardRequest::new(name).with_columns(columns.iter().copied()),
        )
        .await
        .expect("board creation should succeed")
}

/// Returns the identifier of the named column.
///
/// # Panics
///
/// Panics when the board has no such column.
#[must_use]
pub fn column_id(view: &BoardView, name: &str) -> ColumnId {
    view.column_named(name)
        .map(|column| column.column.id())
        .expect("column should exist")
}
