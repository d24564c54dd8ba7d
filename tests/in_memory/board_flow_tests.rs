//! End-to-end board workflows through the kanban service.

use super::helpers::{TestService, column_id, owner, seed_board, service};
use kanban_core::board::{
    domain::{EntityKind, OwnerId, SubtaskDraft},
    services::{CreateColumnRequest, CreateTaskRequest, KanbanError, UpdateTaskRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moved_task_is_appended_to_destination(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Sprint 1", &["To Do", "Doing"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    let doing = column_id(&board, "Doing");

    let existing = service
        .create_task(owner, board_id, doing, CreateTaskRequest::new("In flight"))
        .await
        .expect("create existing task");
    let task = service
        .create_task(owner, board_id, todo, CreateTaskRequest::new("Write docs"))
        .await
        .expect("create task");

    let moved = service
        .move_task(owner, board_id, todo, task.id(), doing)
        .await
        .expect("move should succeed");

    assert_eq!(moved.column_id(), doing);
    assert_eq!(moved.position().value(), existing.position().value() + 1);
    assert!(
        service
            .list_tasks(owner, todo)
            .await
            .expect("list source")
            .is_empty()
    );

    let view = service.get_board(owner, board_id).await.expect("board");
    let doing_titles: Vec<&str> = view
        .column_named("Doing")
        .expect("doing column")
        .tasks
        .iter()
        .map(|t| t.title().as_str())
        .collect();
    assert_eq!(doing_titles, ["In flight", "Write docs"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_to_current_column_changes_nothing(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Sprint 1", &["To Do"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    let task = service
        .create_task(owner, board_id, todo, CreateTaskRequest::new("Stay put"))
        .await
        .expect("create task");

    let result = service
        .move_task(owner, board_id, todo, task.id(), todo)
        .await;
    assert!(matches!(result, Err(KanbanError::NoOpRejected { .. })));

    let unchanged = service
        .get_task(owner, board_id, todo, task.id())
        .await
        .expect("task");
    assert_eq!(unchanged, task);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_to_another_board_is_rejected(service: TestService, owner: OwnerId) {
    let first = seed_board(&service, owner, "First", &["To Do"]).await;
    let second = seed_board(&service, owner, "Second", &["Inbox"]).await;
    let todo = column_id(&first, "To Do");
    let inbox = column_id(&second, "Inbox");
    let task = service
        .create_task(owner, first.board.id(), todo, CreateTaskRequest::new("Pinned"))
        .await
        .expect("create task");

    let result = service
        .move_task(owner, first.board.id(), todo, task.id(), inbox)
        .await;
    assert!(matches!(result, Err(KanbanError::InvalidReference { .. })));
    assert!(
        service
            .list_tasks(owner, inbox)
            .await
            .expect("list")
            .is_empty()
    );

    let unchanged = service
        .get_task(owner, first.board.id(), todo, task.id())
        .await
        .expect("task stays in its column");
    assert_eq!(unchanged, task);
    assert_eq!(unchanged.board_id(), first.board.id());
    assert_eq!(unchanged.column_id(), todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_in_unknown_column_is_invalid_reference(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &["To Do"]).await;
    let other = seed_board(&service, owner, "Other", &["Elsewhere"]).await;

    let result = service
        .create_task(
            owner,
            board.board.id(),
            column_id(&other, "Elsewhere"),
            CreateTaskRequest::new("Lost"),
        )
        .await;

    assert!(matches!(result, Err(KanbanError::InvalidReference { .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_update_replaces_checklist(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &["To Do"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    let task = service
        .create_task(
            owner,
            board_id,
            todo,
            CreateTaskRequest::new("Release").with_subtasks([SubtaskDraft::new("Draft notes")]),
        )
        .await
        .expect("create task");

    let updated = service
        .update_task(
            owner,
            board_id,
            todo,
            task.id(),
            UpdateTaskRequest::new()
                .with_description("Ship on Friday")
                .with_subtasks([
                    SubtaskDraft::new("Draft notes").done(),
                    SubtaskDraft::new(""),
                    SubtaskDraft::new("Publish"),
                ]),
        )
        .await
        .expect("update should succeed");

    let checklist: Vec<(&str, bool)> = updated
        .subtasks()
        .iter()
        .map(|s| (s.title().as_str(), s.is_done()))
        .collect();
    assert_eq!(checklist, [("Draft notes", true), ("Publish", false)]);
    assert_eq!(updated.description().as_str(), "Ship on Friday");
    assert_eq!(updated.title(), task.title());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lists_follow_presentation_order(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &["B"]).await;
    let board_id = board.board.id();
    service
        .create_column(owner, board_id, CreateColumnRequest::new("A").with_position(0))
        .await
        .expect("explicit column");
    service
        .create_column(owner, board_id, CreateColumnRequest::new("C"))
        .await
        .expect("appended column");

    let names: Vec<String> = service
        .list_columns(owner, board_id)
        .await
        .expect("list columns")
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn boards_list_with_nested_columns(service: TestService, owner: OwnerId) {
    seed_board(&service, owner, "First", &["To Do"]).await;
    seed_board(&service, owner, "Second", &["Inbox", "Done"]).await;

    let boards = service.list_boards(owner).await.expect("list boards");
    let mut shape: Vec<(String, usize)> = boards
        .iter()
        .map(|b| (b.board.name().to_string(), b.columns.len()))
        .collect();
    shape.sort();
    assert_eq!(
        shape,
        [("First".to_owned(), 1), ("Second".to_owned(), 2)]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_parents_list_nothing(service: TestService, owner: OwnerId) {
    let columns = service
        .list_columns(owner, kanban_core::board::domain::BoardId::new())
        .await
        .expect("list columns");
    let tasks = service
        .list_tasks(owner, kanban_core::board::domain::ColumnId::new())
        .await
        .expect("list tasks");
    assert!(columns.is_empty());
    assert!(tasks.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_task_twice_reports_not_found(service: TestService, owner: OwnerId) {
    let board = seed_board(&service, owner, "Board", &["To Do"]).await;
    let board_id = board.board.id();
    let todo = column_id(&board, "To Do");
    let task = service
        .create_task(owner, board_id, todo, CreateTaskRequest::new("Once"))
        .await
        .expect("create task");

    service
        .delete_task(owner, board_id, todo, task.id())
        .await
        .expect("first delete");
    let result = service.delete_task(owner, board_id, todo, task.id()).await;

    assert!(matches!(
        result,
        Err(KanbanError::NotFound {
            entity: EntityKind::Task,
            ..
        })
    ));
}
