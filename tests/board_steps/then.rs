//! Then steps for board BDD scenarios.

use super::world::BoardWorld;
use mondrian::board::{
    domain::TaskStatus,
    services::{BoardServiceError, BoardView, DragOutcome, TaskCard},
};
use rstest_bdd_macros::then;

fn last_view(world: &BoardWorld) -> Result<&BoardView, eyre::Report> {
    world
        .last_view
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no board view captured"))
}

fn card<'a>(world: &'a BoardWorld, title: &str) -> Result<&'a TaskCard, eyre::Report> {
    last_view(world)?
        .columns()
        .iter()
        .flat_map(|column| column.cards())
        .find(|card| card.task.title() == title)
        .ok_or_else(|| eyre::eyre!("no card titled {title:?} is visible"))
}

#[then("the drag succeeds")]
fn drag_succeeds(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_drag.as_ref() {
        Some(Ok(DragOutcome::Moved { .. })) => Ok(()),
        other => Err(eyre::eyre!("expected a successful move, got {other:?}")),
    }
}

#[then("the drag fails with a persistence error")]
fn drag_fails(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_drag.as_ref() {
        Some(Err(err @ BoardServiceError::PersistenceFailure(_))) => {
            eyre::ensure!(
                err.user_message().contains("restored"),
                "failure message should tell the user the board was restored"
            );
            Ok(())
        }
        other => Err(eyre::eyre!("expected a persistence failure, got {other:?}")),
    }
}

#[then("the drag is ignored")]
fn drag_ignored(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_drag.as_ref() {
        Some(Ok(DragOutcome::Ignored)) => Ok(()),
        other => Err(eyre::eyre!("expected the drag to be ignored, got {other:?}")),
    }
}

#[then(r#"the board shows "{title}" in "{status}""#)]
fn board_shows(world: &BoardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())?;
    let id = world.task(&title)?.id();
    let snapshot = world.session()?.snapshot();
    let shown = snapshot
        .get(id)
        .ok_or_else(|| eyre::eyre!("{title:?} is not on the board"))?;
    eyre::ensure!(
        shown.status() == expected,
        "expected {title:?} in {}, found {}",
        expected.as_str(),
        shown.status().as_str()
    );
    Ok(())
}

#[then(r#"the stored status of "{title}" is "{status}""#)]
fn stored_status(world: &BoardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())?;
    let id = world.task(&title)?.id();
    let stored = world
        .backend
        .stored_task(id)?
        .ok_or_else(|| eyre::eyre!("{title:?} missing from backend"))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected stored status {}, found {}",
        expected.as_str(),
        stored.status().as_str()
    );
    Ok(())
}

#[then("{count:usize} cards are visible")]
fn cards_visible(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let visible = last_view(world)?.visible_count();
    eyre::ensure!(visible == count, "expected {count} cards, found {visible}");
    Ok(())
}

#[then(r#"the "{status}" column card count is {count:usize}"#)]
fn column_count(world: &BoardWorld, status: String, count: usize) -> Result<(), eyre::Report> {
    let column = TaskStatus::try_from(status.as_str())?;
    let shown = last_view(world)?
        .column(column)
        .map_or(0, |board_column| board_column.len());
    eyre::ensure!(shown == count, "expected {count} cards in {status}, found {shown}");
    Ok(())
}

#[then(r#"the card "{title}" is flagged due soon"#)]
fn card_due_soon(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    eyre::ensure!(card(world, &title)?.is_due_soon, "{title:?} should be due soon");
    Ok(())
}

#[then(r#"the card "{title}" is not overdue"#)]
fn card_not_overdue(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    eyre::ensure!(!card(world, &title)?.is_overdue, "{title:?} should not be overdue");
    Ok(())
}
