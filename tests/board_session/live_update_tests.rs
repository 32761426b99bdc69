//! Integration tests for remote changes reaching an open board.

use super::helpers::{Harness, harness, wait_for_board};
use mondrian::board::{
    domain::{NewTask, RawChangeEvent, TaskStatus},
    ports::TaskPersistence,
};
use chrono::Utc;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn teammate_insert_appears_on_open_board(harness: Harness) -> eyre::Result<()> {
    let session = harness.open_as(harness.owner).await?;
    let teammate = harness.connect(harness.teammate);

    let created = teammate
        .create_task(
            harness.project_id,
            &NewTask::new("Prepare demo")?.assign_to(harness.owner),
        )
        .await?;

    let snapshot = wait_for_board(&session, |board| board.contains(created.id())).await?;
    let shown = snapshot
        .get(created.id())
        .ok_or_else(|| eyre::eyre!("created task missing"))?;
    eyre::ensure!(
        shown.assignee().map(|profile| profile.display_name()) == Some("Olive Owner"),
        "fetched task embeds the assignee profile"
    );
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn teammate_status_change_replaces_task(harness: Harness) -> eyre::Result<()> {
    let seeded = harness.seed_task("Review copy", TaskStatus::Todo, 0)?;
    let session = harness.open_as(harness.owner).await?;

    harness
        .connect(harness.teammate)
        .update_task_status(seeded.id(), TaskStatus::Done)
        .await?;

    wait_for_board(&session, |board| {
        board
            .get(seeded.id())
            .is_some_and(|task| task.status() == TaskStatus::Done)
    })
    .await?;
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn teammate_delete_removes_task(harness: Harness) -> eyre::Result<()> {
    let seeded = harness.seed_task("Obsolete", TaskStatus::Review, 0)?;
    let session = harness.open_as(harness.owner).await?;

    harness
        .connect(harness.teammate)
        .delete_task(seeded.id())
        .await?;

    wait_for_board(&session, |board| !board.contains(seeded.id())).await?;
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redelivered_events_do_not_duplicate_tasks(harness: Harness) -> eyre::Result<()> {
    let session = harness.open_as(harness.owner).await?;
    let created = harness
        .connect(harness.teammate)
        .create_task(harness.project_id, &NewTask::new("Once only")?)
        .await?;
    wait_for_board(&session, |board| board.contains(created.id())).await?;

    let replay = RawChangeEvent::inserted(&created, Utc::now());
    harness.backend.publish_raw(harness.project_id, &replay)?;
    harness.backend.publish_raw(harness.project_id, &replay)?;
    let marker = harness
        .connect(harness.teammate)
        .create_task(harness.project_id, &NewTask::new("Marker")?)
        .await?;
    let snapshot = wait_for_board(&session, |board| board.contains(marker.id())).await?;

    let copies = snapshot
        .tasks()
        .iter()
        .filter(|task| task.id() == created.id())
        .count();
    eyre::ensure!(copies == 1, "expected one copy, found {copies}");
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_events_are_dropped_and_stream_continues(harness: Harness) -> eyre::Result<()> {
    let session = harness.open_as(harness.owner).await?;
    let malformed = RawChangeEvent {
        event_type: "UPDATE".to_owned(),
        new: Some(serde_json::json!({ "id": "not-a-uuid" })),
        old: None,
        commit_timestamp: None,
    };

    harness.backend.publish_raw(harness.project_id, &malformed)?;
    let created = harness
        .connect(harness.teammate)
        .create_task(harness.project_id, &NewTask::new("Still flowing")?)
        .await?;

    wait_for_board(&session, |board| board.contains(created.id())).await?;
    eyre::ensure!(session.is_live(), "reconciler survives malformed input");
    session.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn local_create_echo_is_absorbed(harness: Harness) -> eyre::Result<()> {
    let session = harness.open_as(harness.owner).await?;

    let created = session
        .editor()
        .create_task(&NewTask::new("Mine")?.in_column(TaskStatus::InProgress))
        .await?;
    let marker = harness
        .connect(harness.teammate)
        .create_task(harness.project_id, &NewTask::new("Marker")?)
        .await?;
    let snapshot = wait_for_board(&session, |board| board.contains(marker.id())).await?;

    eyre::ensure!(snapshot.len() == 2, "echo must not add a second copy");
    eyre::ensure!(
        snapshot.get(created.id()) == Some(&created),
        "echo leaves the created task as stored"
    );
    session.close().await;
    Ok(())
}
