//! Integration tests for drag-and-drop writes against the in-memory backend.

use super::helpers::{Harness, harness, wait_for_board};
use mondrian::board::{
    domain::{DragLocation, DragResult, TaskStatus},
    ports::TaskPersistence,
    services::{BoardServiceError, DragOutcome},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drop_persists_status_and_absorbs_echo(harness: Harness) -> eyre::Result<()> {
    let seeded = harness.seed_task("Ship it", TaskStatus::Todo, 0)?;
    let session = harness.open_as(harness.owner).await?;

    let outcome = session
        .handle_drag_end(&DragResult::dropped(
            seeded.id(),
            DragLocation::new(TaskStatus::Todo, 0),
            DragLocation::new(TaskStatus::InProgress, 0),
        ))
        .await?;

    eyre::ensure!(
        outcome
            == DragOutcome::Moved {
                task_id: seeded.id(),
                status: TaskStatus::InProgress,
            },
        "unexpected outcome {outcome:?}"
    );
    let stored = harness
        .backend
        .stored_task(seeded.id())?
        .ok_or_else(|| eyre::eyre!("task missing from backend"))?;
    eyre::ensure!(stored.status() == TaskStatus::InProgress, "status persisted");
    wait_for_board(&session, |board| board.get(seeded.id()) == Some(&stored)).await?;
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_write_rolls_back_the_board(harness: Harness) -> eyre::Result<()> {
    let seeded = harness.seed_task("Fragile", TaskStatus::Todo, 0)?;
    let session = harness.open_as(harness.owner).await?;
    let before = session.snapshot();
    harness.backend.fail_next_writes(1)?;

    let result = session
        .handle_drag_end(&DragResult::dropped(
            seeded.id(),
            DragLocation::new(TaskStatus::Todo, 0),
            DragLocation::new(TaskStatus::Done, 0),
        ))
        .await;

    let Err(err) = result else {
        return Err(eyre::eyre!("write failure should be surfaced"));
    };
    eyre::ensure!(
        matches!(err, BoardServiceError::PersistenceFailure(_)),
        "expected PersistenceFailure, got {err:?}"
    );
    eyre::ensure!(
        session.snapshot().tasks() == before.tasks(),
        "board should match its pre-drag state"
    );
    let stored = harness.backend.stored_task(seeded.id())?;
    eyre::ensure!(
        stored.map(|task| task.status()) == Some(TaskStatus::Todo),
        "backend unchanged"
    );
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_drag_issues_no_write(harness: Harness) -> eyre::Result<()> {
    let seeded = harness.seed_task("Stay put", TaskStatus::Review, 0)?;
    let session = harness.open_as(harness.owner).await?;
    harness.backend.fail_next_writes(1)?;

    let outcome = session
        .handle_drag_end(&DragResult::cancelled(
            seeded.id(),
            DragLocation::new(TaskStatus::Review, 0),
        ))
        .await?;

    eyre::ensure!(outcome == DragOutcome::Ignored, "cancel is ignored");
    eyre::ensure!(
        session
            .snapshot()
            .get(seeded.id())
            .is_some_and(|task| task.status() == TaskStatus::Review),
        "task stays in place"
    );
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drag_after_remote_delete_removes_task(harness: Harness) -> eyre::Result<()> {
    let seeded = harness.seed_task("Gone soon", TaskStatus::Todo, 0)?;
    let session = harness.open_as(harness.owner).await?;
    let store = session.store().clone();
    let controller = session.drag_controller();
    session.close().await;
    harness
        .backend
        .connect(harness.teammate)
        .delete_task(seeded.id())
        .await?;

    let outcome = controller
        .handle_drag_end(&DragResult::dropped(
            seeded.id(),
            DragLocation::new(TaskStatus::Todo, 0),
            DragLocation::new(TaskStatus::Done, 0),
        ))
        .await?;

    eyre::ensure!(outcome == DragOutcome::Vanished(seeded.id()), "got {outcome:?}");
    eyre::ensure!(store.snapshot().is_empty(), "vanished task removed");
    Ok(())
}
