//! Cascading deletes through the kanban service.

use super::helpers::{TestService, column_id, owner, seed_board, service};
use kanban_core::board::{
    domain::{EntityKind, OwnerId},
    services::{CascadeReport, CreateTaskRequest, KanbanError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_board_removes_columns_and_tasks(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "X", &["To Do", "Doing", "Done"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    let doing = column_id(&board, "Doing");
    for (column, title) in [(todo, "one"), (todo, "two"), (doing, "three")] {
        service
            .create_task(owner, board_id, column, CreateTaskRequest::new(title))
            .await
            .expect("create task");
    }

    let report = service
        .delete_board(owner, board_id)
        .await
        .expect("delete board");

    assert_eq!(
        report,
        CascadeReport {
            columns_removed: 3,
            tasks_removed: 3,
        }
    );
    assert!(matches!(
        service.get_board(owner, board_id).await,
        Err(KanbanError::NotFound {
            entity: EntityKind::Board,
            ..
        })
    ));
    assert!(
        service
            .list_columns(owner, board_id)
            .await
            .expect("list columns")
            .is_empty()
    );
    assert!(
        service
            .list_tasks(owner, todo)
            .await
            .expect("list tasks")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_column_keeps_siblings(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &["To Do", "Done"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    let done = column_id(&board, "Done");
    service
        .create_task(owner, board_id, todo, CreateTaskRequest::new("gone"))
        .await
        .expect("task in to do");
    let survivor = service
        .create_task(owner, board_id, done, CreateTaskRequest::new("kept"))
        .await
        .expect("task in done");

    let report = service
        .delete_column(owner, board_id, todo)
        .await
        .expect("delete column");

    assert_eq!(report.tasks_removed, 1);
    assert_eq!(report.columns_removed, 1);
    let view = service.get_board(owner, board_id).await.expect("board");
    assert_eq!(view.columns.len(), 1);
    assert_eq!(
        service.list_tasks(owner, done).await.expect("list"),
        vec![survivor]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_unknown_board_is_not_found(service: TestService, owner: OwnerId) {
    let result = service
        .delete_board(owner, kanban_core::board::domain::BoardId::new())
        .await;
    assert!(matches!(result, Err(KanbanError::NotFound { .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_column_through_wrong_board_is_rejected(
    service: TestService,
    owner: OwnerId,
) {
    let first = seed_board(&service, owner, "First", &["To Do"]).await;
    let second = seed_board(&service, owner, "Second", &[]).await;

    let result = service
        .delete_column(owner, second.board.id(), column_id(&first, "To Do"))
        .await;

    assert!(matches!(result, Err(KanbanError::InvalidReference { .. })));
    assert_eq!(
        service
            .list_columns(owner, first.board.id())
            .await
            .expect("list")
            .len(),
        1
    );
}
