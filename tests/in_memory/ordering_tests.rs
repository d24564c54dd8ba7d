//! Sibling position assignment through the kanban service.

use super::helpers::{TestService, column_id, owner, seed_board, service};
use kanban_core::board::{
    domain::{OwnerId, Placement},
    services::{CreateColumnRequest, CreateTaskRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_task_in_empty_column_starts_at_one(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &["To Do"]).await;
    let task = service
        .create_task(
            owner,
            board.board.id(),
            column_id(&board, "To Do"),
            CreateTaskRequest::new("First"),
        )
        .await
        .expect("create task");

    assert_eq!(task.position().value(), 1);
    assert_eq!(task.placement(), Placement::Appended);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn append_follows_highest_explicit_position(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &["To Do"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    service
        .create_task(
            owner,
            board_id,
            todo,
            CreateTaskRequest::new("Pinned").with_position(10),
        )
        .await
        .expect("explicit task");

    let appended = service
        .create_task(owner, board_id, todo, CreateTaskRequest::new("Next"))
        .await
        .expect("appended task");

    assert_eq!(appended.position().value(), 11);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_positions_may_repeat(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &[]).await;
    let board_id = board.board.id();
    for name in ["Left", "Right"] {
        service
            .create_column(
                owner,
                board_id,
                CreateColumnRequest::new(name).with_position(3),
            )
            .await
            .expect("explicit column");
    }

    let columns = service.list_columns(owner, board_id).await.expect("list");
    let positions: Vec<i64> = columns.iter().map(|c| c.position().value()).collect();
    assert_eq!(positions, [3, 3]);
    assert!(columns.iter().all(|c| c.placement() == Placement::Explicit));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn zero_is_a_valid_explicit_position(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &["Middle"]).await;
    let column = service
        .create_column(
            owner,
            board.board.id(),
            CreateColumnRequest::new("Front").with_position(0),
        )
        .await
        .expect("explicit column");

    assert_eq!(column.column.position().value(), 0);
    let first = service
        .list_columns(owner, board.board.id())
        .await
        .expect("list")
        .into_iter()
        .next()
        .expect("at least one column");
    assert_eq!(first.id(), column.column.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn positions_are_scoped_to_their_parent(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &["To Do", "Done"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    let done = column_id(&board, "Done");
    for title in ["a", "b", "c"] {
        service
            .create_task(owner, board_id, todo, CreateTaskRequest::new(title))
            .await
            .expect("task in to do");
    }

    let task = service
        .create_task(owner, board_id, done, CreateTaskRequest::new("d"))
        .await
        .expect("task in done");

    assert_eq!(task.position().value(), 1);
}
