//! Shared world state for board lifecycle BDD scenarios.

use std::{collections::HashMap, sync::Arc};

use kanban_core::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{BoardView, ColumnId, OwnerId, Task},
    services::{CascadeReport, KanbanResult, KanbanService},
};
use mockable::DefaultClock;
use rstest::fixture;
use uuid::Uuid;

/// Service type used by the BDD world.
pub type TestKanbanService = KanbanService<InMemoryBoardRepository, DefaultClock>;

/// Scenario world for board lifecycle behaviour tests.
pub struct BoardWorld {
    pub service: TestKanbanService,
    pub owner: OwnerId,
    pub board: Option<BoardView>,
    pub second_board: Option<BoardView>,
    pub tasks: HashMap<String, Task>,
    pub last_move: Option<KanbanResult<Task>>,
    pub last_delete: Option<KanbanResult<CascadeReport>>,
}

impl BoardWorld {
    /// Creates a world with one principal and an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: KanbanService::new(
                Arc::new(InMemoryBoardRepository::new()),
                Arc::new(DefaultClock),
            ),
            owner: OwnerId::from_uuid(Uuid::new_v4()),
            board: None,
            second_board: None,
            tasks: HashMap::new(),
            last_move: None,
            last_delete: None,
        }
    }

    /// Returns the primary board created by the scenario.
    pub fn board(&self) -> Result<&BoardView, eyre::Report> {
        self.board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing board in scenario world"))
    }

    /// Resolves a column of the primary board by name.
    pub fn column(&self, name: &str) -> Result<ColumnId, eyre::Report> {
        column_in(self.board()?, name)
    }

    /// Resolves a column of the second board by name.
    pub fn second_board_column(&self, name: &str) -> Result<ColumnId, eyre::Report> {
        let board = self
            .second_board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing second board in scenario world"))?;
        column_in(board, name)
    }

    /// Returns a task created earlier in the scenario.
    pub fn task(&self, title: &str) -> Result<&Task, eyre::Report> {
        self.tasks
            .get(title)
            .ok_or_else(|| eyre::eyre!("missing task {title:?} in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn column_in(board: &BoardView, name: &str) -> Result<ColumnId, eyre::Report> {
    board
        .column_named(name)
        .map(|view| view.column.id())
        .ok_or_else(|| eyre::eyre!("board has no column {name:?}"))
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
