//! Racing writers against one shared service.

use std::{collections::HashSet, sync::Arc};

use super::helpers::{TestService, column_id, owner, seed_board, service};
use kanban_core::board::{
    domain::OwnerId,
    services::{CreateColumnRequest, CreateTaskRequest, KanbanError},
};
use rstest::rstest;
use tokio::task::JoinSet;

const WRITERS: usize = 8;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_never_share_a_position(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Busy", &[]).await;
    let board_id = board.board.id();
    let shared = Arc::new(service);

    let mut writers = JoinSet::new();
    for index in 0..WRITERS {
        let writer = Arc::clone(&shared);
        writers.spawn(async move {
            writer
                .create_column(
                    owner,
                    board_id,
                    CreateColumnRequest::new(format!("Column {index}")),
                )
                .await
        });
    }

    let mut created = Vec::new();
    while let Some(joined) = writers.join_next().await {
        match joined.expect("writer task should not panic") {
            Ok(view) => created.push(view.column),
            Err(KanbanError::ConflictRetryable { .. }) => {}
            Err(other) => panic!("unexpected failure: {other}"),
        }
    }

    assert!(!created.is_empty());
    let positions: HashSet<i64> = created.iter().map(|c| c.position().value()).collect();
    assert_eq!(positions.len(), created.len());

    let stored = shared.list_columns(owner, board_id).await.expect("list");
    assert_eq!(stored.len(), created.len());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn racing_moves_leave_task_in_one_column(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Race", &["To Do", "Left", "Right"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    let left = column_id(&board, "Left");
    let right = column_id(&board, "Right");
    let task = service
        .create_task(owner, board_id, todo, CreateTaskRequest::new("Contested"))
        .await
        .expect("create task");
    let task_id = task.id();
    let shared = Arc::new(service);

    let to_left = {
        let writer = Arc::clone(&shared);
        tokio::spawn(async move { writer.move_task(owner, board_id, todo, task_id, left).await })
    };
    let to_right = {
        let writer = Arc::clone(&shared);
        tokio::spawn(async move { writer.move_task(owner, board_id, todo, task_id, right).await })
    };
    let outcomes = [
        to_left.await.expect("left mover should not panic"),
        to_right.await.expect("right mover should not panic"),
    ];

    let winners: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one move should win: {outcomes:?}");
    assert!(
        outcomes
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|err| matches!(err, KanbanError::InvalidReference { .. }))
    );

    let mut placements = 0;
    for column in [todo, left, right] {
        placements += shared
            .list_tasks(owner, column)
            .await
            .expect("list")
            .iter()
            .filter(|t| t.id() == task_id)
            .count();
    }
    assert_eq!(placements, 1);
}
