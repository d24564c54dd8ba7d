//! Then steps for board lifecycle BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use kanban_core::board::services::KanbanError;
use rstest_bdd_macros::then;

#[then(r#"column "{column}" lists tasks "{first}" then "{second}""#)]
fn column_lists_tasks(
    world: &BoardWorld,
    column: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let column_id = world.column(&column)?;
    let tasks = run_async(world.service.list_tasks(world.owner, column_id))
        .wrap_err("list tasks in scenario")?;
    let titles: Vec<&str> = tasks.iter().map(|t| t.title().as_str()).collect();
    if titles != [first.as_str(), second.as_str()] {
        return Err(eyre::eyre!(
            "expected [{first}, {second}] in {column}, found {titles:?}"
        ));
    }
    Ok(())
}

#[then(r#"column "{column}" has no tasks"#)]
fn column_is_empty(world: &BoardWorld, column: String) -> Result<(), eyre::Report> {
    let column_id = world.column(&column)?;
    let tasks = run_async(world.service.list_tasks(world.owner, column_id))
        .wrap_err("list tasks in scenario")?;
    if !tasks.is_empty() {
        return Err(eyre::eyre!("expected {column} to be empty, found {} tasks", tasks.len()));
    }
    Ok(())
}

#[then("the board is gone")]
fn board_is_gone(world: &BoardWorld) -> Result<(), eyre::Report> {
    let board_id = world.board()?.board.id();
    let result = run_async(world.service.get_board(world.owner, board_id));
    if !matches!(result, Err(KanbanError::NotFound { .. })) {
        return Err(eyre::eyre!("expected board to be gone, got {result:?}"));
    }
    Ok(())
}

#[then("the deletion removed {columns:usize} columns and {tasks:usize} tasks")]
fn deletion_removed(world: &BoardWorld, columns: usize, tasks: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_delete
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing delete result"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("board delete failed: {err}"))?;
    if report.columns_removed != columns || report.tasks_removed != tasks {
        return Err(eyre::eyre!(
            "expected {columns} columns and {tasks} tasks removed, got {report:?}"
        ));
    }
    Ok(())
}

#[then(r#"the move fails with "{kind}""#)]
fn move_fails_with(world: &BoardWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;
    match result {
        Err(err) if err.kind().as_str() == kind => Ok(()),
        other => Err(eyre::eyre!("expected {kind} failure, got {other:?}")),
    }
}

#[then(r#"the task "{title}" is still in column "{column}""#)]
fn task_still_in_column(
    world: &BoardWorld,
    title: String,
    column: String,
) -> Result<(), eyre::Report> {
    let column_id = world.column(&column)?;
    let task_id = world.task(&title)?.id();
    let tasks = run_async(world.service.list_tasks(world.owner, column_id))
        .wrap_err("list tasks in scenario")?;
    if !tasks.iter().any(|t| t.id() == task_id) {
        return Err(eyre::eyre!("task {title:?} is no longer in {column}"));
    }
    Ok(())
}
