//! When steps for board lifecycle BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"the task "{title}" is moved to column "{column}""#)]
fn move_task(world: &mut BoardWorld, title: String, column: String) -> Result<(), eyre::Report> {
    let destination = world.column(&column)?;
    move_to(world, &title, destination)
}

#[when(r#"the task "{title}" is moved to the second board's column "{column}""#)]
fn move_task_to_second_board(
    world: &mut BoardWorld,
    title: String,
    column: String,
) -> Result<(), eyre::Report> {
    let destination = world.second_board_column(&column)?;
    move_to(world, &title, destination)
}

#[when("the board is deleted")]
fn delete_board(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let board_id = world.board()?.board.id();
    world.last_delete = Some(run_async(world.service.delete_board(world.owner, board_id)));
    Ok(())
}

fn move_to(
    world: &mut BoardWorld,
    title: &str,
    destination: kanban_core::board::domain::ColumnId,
) -> Result<(), eyre::Report> {
    let board_id = world.board()?.board.id();
    let (task_id, column_id) = {
        let task = world.task(title)?;
        (task.id(), task.column_id())
    };
    let result = run_async(world.service.move_task(
        world.owner,
        board_id,
        column_id,
        task_id,
        destination,
    ));
    if let Ok(ref moved) = result {
        world.tasks.insert(title.to_owned(), moved.clone());
    }
    world.last_move = Some(result);
    Ok(())
}
