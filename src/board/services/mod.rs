//! Application services for the board hierarchy.
//!
//! [`KanbanService`] is the entry point. It resolves references with the
//! [`HierarchyGuard`], assigns positions with the [`OrderingEngine`], and
//! removes descendants with the [`CascadeCoordinator`].

mod cascade;
mod error;
mod guard;
mod kanban;
mod ordering;
mod requests;

pub use cascade::{CASCADE_SWEEPS, CascadeCoordinator, CascadeReport};
pub use error::{ErrorKind, KanbanError, KanbanResult};
pub use guard::HierarchyGuard;
pub use kanban::KanbanService;
pub use ordering::{MAX_ATTEMPTS, OrderingEngine};
pub use requests::{CreateBoardRequest, CreateColumnRequest, CreateTaskRequest, UpdateTaskRequest};
