//! Given steps for board lifecycle BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use kanban_core::board::services::{CreateBoardRequest, CreateTaskRequest};
use rstest_bdd_macros::given;

#[given(r#"a board "{name}" with columns "{first}" and "{second}""#)]
fn board_with_columns(
    world: &mut BoardWorld,
    name: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let view = run_async(
        world
            .service
            .create_board(world.owner, CreateBoardRequest::new(name).with_columns([first, second])),
    )
    .wrap_err("create board for scenario")?;
    world.board = Some(view);
    Ok(())
}

#[given(r#"a second board "{name}" with column "{column}""#)]
fn second_board(world: &mut BoardWorld, name: String, column: String) -> Result<(), eyre::Report> {
    let view = run_async(
        world
            .service
            .create_board(world.owner, CreateBoardRequest::new(name).with_columns([column])),
    )
    .wrap_err("create second board for scenario")?;
    world.second_board = Some(view);
    Ok(())
}

#[given(r#"a task "{title}" in column "{column}""#)]
fn task_in_column(world: &mut BoardWorld, title: String, column: String) -> Result<(), eyre::Report> {
    let board_id = world.board()?.board.id();
    let column_id = world.column(&column)?;
    let task = run_async(world.service.create_task(
        world.owner,
        board_id,
        column_id,
        CreateTaskRequest::new(title.clone()),
    ))
    .wrap_err("create task for scenario")?;
    world.tasks.insert(title, task);
    Ok(())
}
