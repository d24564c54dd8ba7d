//! Child-first deletion of boards and columns.
//!
//! The store refuses to delete a parent that still has children, so an
//! orphan can never be left behind. A child appended while a cascade runs is
//! picked up by one more sweep.

use super::error::{KanbanError, KanbanResult};
use crate::board::{
    domain::{BoardId, ColumnId, EntityKind, OwnerId},
    ports::{BoardRepository, BoardRepositoryError},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of passes made over a parent's children before giving up.
pub const CASCADE_SWEEPS: usize = 2;

/// Counts of descendants removed by a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Columns removed.
    pub columns_removed: usize,
    /// Tasks removed.
    pub tasks_removed: usize,
}

impl CascadeReport {
    const fn absorb(&mut self, other: Self) {
        self.columns_removed += other.columns_removed;
        self.tasks_removed += other.tasks_removed;
    }
}

/// Deletes a parent after all of its descendants.
#[derive(Clone)]
pub struct CascadeCoordinator<R>
where
    R: BoardRepository,
{
    repository: Arc<R>,
}

impl<R> CascadeCoordinator<R>
where
    R: BoardRepository,
{
    /// Creates a coordinator deleting through `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Deletes every task and column of a board, then the board.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::CascadeIncomplete`] naming the board when any
    /// step fails or children keep reappearing. Removed descendants stay
    /// removed; retrying finishes the job.
    pub async fn delete_board(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> KanbanResult<CascadeReport> {
        let mut report = CascadeReport::default();
        let mut sweep = 1;
        loop {
            let swept = self
                .sweep_board(owner, board_id)
                .await
                .map_err(|err| incomplete(EntityKind::Board, board_id.into_inner(), err))?;
            report.absorb(swept);
            match self.repository.delete_board(owner, board_id).await {
                Ok(_) => {
                    info!(
                        %board_id,
                        columns_removed = report.columns_removed,
                        tasks_removed = report.tasks_removed,
                        "board deleted"
                    );
                    return Ok(report);
                }
                Err(BoardRepositoryError::HasDependents { .. }) if sweep < CASCADE_SWEEPS => {
                    debug!(%board_id, sweep, "board gained columns during cascade, sweeping");
                    sweep += 1;
                }
                Err(err) => {
                    return Err(incomplete(EntityKind::Board, board_id.into_inner(), err));
                }
            }
        }
    }

    /// Deletes every task of a column, then the column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::CascadeIncomplete`] naming the column when any
    /// step fails or tasks keep reappearing.
    pub async fn delete_column(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> KanbanResult<CascadeReport> {
        let mut report = CascadeReport::default();
        let mut sweep = 1;
        loop {
            report.tasks_removed += self
                .repository
                .delete_tasks_in_column(owner, column_id)
                .await
                .map_err(|err| incomplete(EntityKind::Column, column_id.into_inner(), err))?;
            match self.repository.delete_column(owner, column_id).await {
                Ok(removed) => {
                    if removed {
                        report.columns_removed += 1;
                    }
                    info!(%column_id, tasks_removed = report.tasks_removed, "column deleted");
                    return Ok(report);
                }
                Err(BoardRepositoryError::HasDependents { .. }) if sweep < CASCADE_SWEEPS => {
                    debug!(%column_id, sweep, "column gained tasks during cascade, sweeping");
                    sweep += 1;
                }
                Err(err) => {
                    return Err(incomplete(EntityKind::Column, column_id.into_inner(), err));
                }
            }
        }
    }

    async fn sweep_board(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> Result<CascadeReport, BoardRepositoryError> {
        let mut report = CascadeReport::default();
        for column in self.repository.list_columns(owner, board_id).await? {
            report.tasks_removed += self
                .repository
                .delete_tasks_in_column(owner, column.id())
                .await?;
            match self.repository.delete_column(owner, column.id()).await {
                Ok(true) => report.columns_removed += 1,
                Ok(false) => {}
                // A task landed after the sweep; the board delete will report
                // the leftover column and trigger another pass.
                Err(BoardRepositoryError::HasDependents { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(report)
    }
}

fn incomplete(entity: EntityKind, id: uuid::Uuid, source: BoardRepositoryError) -> KanbanError {
    warn!(%entity, %id, error = %source, "cascade delete incomplete");
    KanbanError::CascadeIncomplete { entity, id, source }
}
