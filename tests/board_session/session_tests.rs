//! Integration tests for opening, closing, and viewing a board.

use super::helpers::{Harness, eventually, harness};
use mondrian::board::{
    domain::{
        AssigneeFilter, NewTask, RawChangeEvent, Task, TaskId, TaskStatus, TaskUpdate,
    },
    ports::TaskPersistence,
    services::BoardServiceError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_loads_tasks_in_position_order(harness: Harness) -> eyre::Result<()> {
    let second = harness.seed_task("Second", TaskStatus::Todo, 2)?;
    let first = harness.seed_task("First", TaskStatus::Review, 1)?;

    let session = harness.open_as(harness.owner).await?;

    let ids: Vec<TaskId> = session.snapshot().tasks().iter().map(Task::id).collect();
    eyre::ensure!(ids == vec![first.id(), second.id()], "unexpected load order");
    eyre::ensure!(session.is_live(), "reconciler should be running");
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn teammate_can_open_the_board(harness: Harness) -> eyre::Result<()> {
    harness.seed_task("Shared", TaskStatus::Todo, 0)?;

    let session = harness.open_as(harness.teammate).await?;

    eyre::ensure!(session.snapshot().len() == 1, "teammate sees the task");
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsider_is_refused_and_leaves_no_subscription(harness: Harness) -> eyre::Result<()> {
    let result = harness.open_as(harness.outsider).await;

    let Err(err) = result else {
        return Err(eyre::eyre!("outsider should not open the board"));
    };
    eyre::ensure!(
        matches!(err, BoardServiceError::Unauthorized),
        "expected Unauthorized, got {err:?}"
    );
    eyre::ensure!(err.requires_redirect(), "unauthorized access redirects");
    eyre::ensure!(
        harness.backend.subscriber_count(harness.project_id)? == 0,
        "no subscription should remain"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn close_releases_the_subscription(harness: Harness) -> eyre::Result<()> {
    let session = harness.open_as(harness.owner).await?;
    eyre::ensure!(
        harness.backend.subscriber_count(harness.project_id)? == 1,
        "open board subscribes once"
    );

    session.close().await;

    eyre::ensure!(
        harness.backend.subscriber_count(harness.project_id)? == 0,
        "close should unsubscribe"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dropped_session_stops_receiving(harness: Harness) -> eyre::Result<()> {
    let session = harness.open_as(harness.owner).await?;
    let store = session.store().clone();
    drop(session);

    let noise = RawChangeEvent {
        event_type: "PING".to_owned(),
        new: None,
        old: None,
        commit_timestamp: None,
    };
    eventually(|| {
        harness.backend.publish_raw(harness.project_id, &noise)?;
        Ok(harness.backend.subscriber_count(harness.project_id)? == 0)
    })
    .await?;
    harness
        .connect(harness.teammate)
        .create_task(harness.project_id, &NewTask::new("After drop")?)
        .await?;

    eyre::ensure!(store.snapshot().is_empty(), "no delivery after drop");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn view_applies_session_filters(harness: Harness) -> eyre::Result<()> {
    harness.seed_task("Fix login bug", TaskStatus::Todo, 0)?;
    harness.seed_task("Write docs", TaskStatus::Todo, 1)?;
    let assigned = harness.seed_task("Triage bug reports", TaskStatus::Review, 2)?;
    let mut session = harness.open_as(harness.owner).await?;
    let update = TaskUpdate::from_task(&assigned)
        .with_assignee(Some(harness.teammate));
    session.editor().update_task(assigned.id(), &update).await?;

    session.view_state_mut().set_search("bug");
    let searched = session.view();
    eyre::ensure!(searched.visible_count() == 2, "search narrows to two tasks");
    eyre::ensure!(searched.total_count() == 3, "total ignores filters");

    session
        .view_state_mut()
        .set_assignee(Some(AssigneeFilter::Unassigned));
    let unassigned = session.view();
    eyre::ensure!(unassigned.visible_count() == 1, "only the unassigned bug remains");

    session.view_state_mut().clear_filters();
    eyre::ensure!(
        session.view_state().search() == Some("bug"),
        "clearing filters keeps search"
    );
    eyre::ensure!(session.view().visible_count() == 2, "selectors cleared");
    session.close().await;
    Ok(())
}
