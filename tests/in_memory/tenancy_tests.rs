//! Owner isolation across every entity kind.

use super::helpers::{TestService, column_id, owner, seed_board, service};
use kanban_core::board::{
    domain::OwnerId,
    services::{CreateColumnRequest, CreateTaskRequest, KanbanError, UpdateTaskRequest},
};
use rstest::rstest;
use uuid::Uuid;

fn stranger() -> OwnerId {
    OwnerId::from_uuid(Uuid::new_v4())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_boards_are_invisible(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Private", &["To Do"]).await;
    let intruder = stranger();

    assert!(
        service
            .list_boards(intruder)
            .await
            .expect("list")
            .is_empty()
    );
    assert!(matches!(
        service.get_board(intruder, board.board.id()).await,
        Err(KanbanError::NotFound { .. })
    ));
    assert!(matches!(
        service.rename_board(intruder, board.board.id(), "Mine").await,
        Err(KanbanError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete_board(intruder, board.board.id()).await,
        Err(KanbanError::NotFound { .. })
    ));
    assert!(
        service
            .list_columns(intruder, board.board.id())
            .await
            .expect("list")
            .is_empty()
    );

    let kept = service.get_board(owner, board.board.id()).await.expect("board");
    assert_eq!(kept.board.name().as_str(), "Private");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_board_cannot_be_extended(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Private", &["To Do"]).await;
    let intruder = stranger();

    let column = service
        .create_column(intruder, board.board.id(), CreateColumnRequest::new("Mine"))
        .await;
    let task = service
        .create_task(
            intruder,
            board.board.id(),
            column_id(&board, "To Do"),
            CreateTaskRequest::new("Mine"),
        )
        .await;

    assert!(matches!(column, Err(KanbanError::InvalidReference { .. })));
    assert!(matches!(task, Err(KanbanError::InvalidReference { .. })));
    assert!(
        service
            .list_tasks(owner, column_id(&board, "To Do"))
            .await
            .expect("list")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_tasks_cannot_be_touched(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Private", &["To Do", "Done"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    let task = service
        .create_task(owner, board_id, todo, CreateTaskRequest::new("Secret"))
        .await
        .expect("create task");
    let intruder = stranger();

    let update = service
        .update_task(
            intruder,
            board_id,
            todo,
            task.id(),
            UpdateTaskRequest::new().with_title("Leaked"),
        )
        .await;
    let moved = service
        .move_task(intruder, board_id, todo, task.id(), column_id(&board, "Done"))
        .await;
    let deleted = service.delete_task(intruder, board_id, todo, task.id()).await;

    for result in [update, moved, deleted] {
        assert!(matches!(result, Err(KanbanError::InvalidReference { .. })));
    }
    let stored = service
        .get_task(owner, board_id, todo, task.id())
        .await
        .expect("task");
    assert_eq!(stored, task);
}
