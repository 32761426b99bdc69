//! When steps for board BDD scenarios.

use super::world::{BoardWorld, run_async};
use mondrian::board::domain::{AssigneeFilter, DragLocation, DragResult};
use rstest_bdd_macros::when;

#[when(r#"the task "{title}" is dragged to "{status}""#)]
fn drag_task(world: &mut BoardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let task = world.task(&title)?;
    let drag = DragResult::dropped(
        task.id(),
        DragLocation::new(task.status(), 0),
        DragLocation::parse(&status, 0)?,
    );
    let session = world.open()?;
    let result = run_async(session.handle_drag_end(&drag));
    world.last_drag = Some(result);
    Ok(())
}

#[when(r#"the drag of "{title}" is cancelled"#)]
fn cancel_drag(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task(&title)?;
    let drag = DragResult::cancelled(task.id(), DragLocation::new(task.status(), 0));
    let session = world.open()?;
    let result = run_async(session.handle_drag_end(&drag));
    world.last_drag = Some(result);
    Ok(())
}

#[when(r#"the board is searched for "{text}""#)]
fn search_board(world: &mut BoardWorld, text: String) -> Result<(), eyre::Report> {
    let session = world.open()?;
    session.view_state_mut().set_search(text);
    let view = session.view();
    world.last_view = Some(view);
    Ok(())
}

#[when("the board is filtered to unassigned tasks")]
fn filter_unassigned(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let session = world.open()?;
    session
        .view_state_mut()
        .set_assignee(Some(AssigneeFilter::Unassigned));
    let view = session.view();
    world.last_view = Some(view);
    Ok(())
}

#[when("the board is viewed")]
fn view_board(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let view = world.open()?.view();
    world.last_view = Some(view);
    Ok(())
}
