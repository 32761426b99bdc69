//! Given steps for board BDD scenarios.

use super::world::BoardWorld;
use chrono::{Days, Utc};
use mondrian::board::domain::{PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus};
use rstest_bdd_macros::given;

#[given("a project board")]
fn project_board(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.session.is_none(), "board opened too early");
    Ok(())
}

#[given(r#"a task "{title}" in "{status}""#)]
fn task_in_column(
    world: &mut BoardWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let now = Utc::now();
    let position = i32::try_from(world.tasks.len())?;
    let task = Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        project_id: world.project_id,
        title,
        description: None,
        status: TaskStatus::try_from(status.as_str())?,
        priority: TaskPriority::Medium,
        assigned_to: None,
        assignee: None,
        due_date: None,
        position,
        created_at: now,
        updated_at: now,
    })?;
    world.seed(task)
}

/// Re-seeds a scenario task after adjusting its persisted fields.
fn amend(
    world: &mut BoardWorld,
    title: &str,
    change: impl FnOnce(&mut PersistedTaskData),
) -> Result<(), eyre::Report> {
    let task = world.task(title)?;
    let mut data = PersistedTaskData {
        id: task.id(),
        project_id: task.project_id(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status(),
        priority: task.priority(),
        assigned_to: task.assigned_to(),
        assignee: None,
        due_date: task.due_date(),
        position: task.position(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    };
    change(&mut data);
    world.seed(Task::from_persisted(data)?)
}

#[given(r#""{title}" is described as "{description}""#)]
fn task_description(
    world: &mut BoardWorld,
    title: String,
    description: String,
) -> Result<(), eyre::Report> {
    amend(world, &title, |data| data.description = Some(description))
}

#[given(r#""{title}" is assigned to the teammate"#)]
fn task_assigned_to_teammate(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let teammate = world.teammate;
    amend(world, &title, |data| data.assigned_to = Some(teammate))
}

#[given(r#""{title}" is due tomorrow"#)]
fn task_due_tomorrow(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let tomorrow = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .ok_or_else(|| eyre::eyre!("date out of range"))?;
    amend(world, &title, |data| data.due_date = Some(tomorrow))
}

#[given("the next write will fail")]
fn next_write_fails(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    world.backend.fail_next_writes(1)?;
    Ok(())
}
