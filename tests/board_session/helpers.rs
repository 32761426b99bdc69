//! Shared test helpers for board session integration tests.

use chrono::Utc;
use eyre::WrapErr;
use mockable::DefaultClock;
use mondrian::board::{
    adapters::memory::{InMemoryBoardBackend, InMemoryConnection},
    domain::{PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus},
    services::{BoardConfig, BoardServiceResult, BoardSession, BoardSnapshot},
};
use mondrian::workspace::domain::{
    Member, MemberRole, Project, ProjectId, UserId, UserProfile, Workspace,
};
use rstest::fixture;
use std::sync::Arc;
use std::time::Duration;

/// Session type used across the integration tests.
pub type Session = BoardSession<InMemoryConnection, InMemoryConnection, DefaultClock>;

const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// Backend seeded with a workspace, its owner, one teammate, and one
/// project. `outsider` has a profile but no membership.
pub struct Harness {
    pub backend: InMemoryBoardBackend,
    pub owner: UserId,
    pub teammate: UserId,
    pub outsider: UserId,
    pub project_id: ProjectId,
}

impl Harness {
    /// Seeds a fresh backend.
    ///
    /// # Errors
    ///
    /// Returns an error if any seed value is rejected.
    pub fn seed() -> eyre::Result<Self> {
        let backend = InMemoryBoardBackend::new();
        let owner = UserId::new();
        let teammate = UserId::new();
        let outsider = UserId::new();
        for (id, email, name) in [
            (owner, "owner@example.com", "Olive Owner"),
            (teammate, "teammate@example.com", "Theo Teammate"),
            (outsider, "outsider@example.com", ""),
        ] {
            let profile = UserProfile::new(id, email)?.with_full_name(name);
            backend.add_profile(profile)?;
        }
        let workspace = Workspace::new("Studio", owner)?;
        let project = Project::new(workspace.id(), "Launch")?;
        let project_id = project.id();
        backend.add_member(Member::new(workspace.id(), teammate, MemberRole::Member))?;
        backend.add_workspace(workspace)?;
        backend.add_project(project)?;
        Ok(Self {
            backend,
            owner,
            teammate,
            outsider,
            project_id,
        })
    }

    /// Stores a task directly, without change events.
    ///
    /// # Errors
    ///
    /// Returns an error if the task is invalid or cannot be stored.
    pub fn seed_task(&self, title: &str, status: TaskStatus, position: i32) -> eyre::Result<Task> {
        let now = Utc::now();
        let task = Task::from_persisted(PersistedTaskData {
            id: TaskId::new(),
            project_id: self.project_id,
            title: title.to_owned(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            assigned_to: None,
            assignee: None,
            due_date: None,
            position,
            created_at: now,
            updated_at: now,
        })?;
        self.backend.seed_task(task.clone())?;
        Ok(task)
    }

    /// Returns a connection acting as `user`.
    #[must_use]
    pub fn connect(&self, user: UserId) -> Arc<InMemoryConnection> {
        Arc::new(self.backend.connect(user))
    }

    /// Opens the project board as `user`.
    ///
    /// # Errors
    ///
    /// Returns the service error when the board cannot be opened.
    pub async fn open_as(&self, user: UserId) -> BoardServiceResult<Session> {
        let connection = self.connect(user);
        BoardSession::open(
            self.project_id,
            Arc::clone(&connection),
            connection,
            Arc::new(DefaultClock),
            BoardConfig::default(),
        )
        .await
    }
}

/// Provides a freshly seeded backend for each test.
///
/// # Panics
///
/// Panics if seeding fails, which indicates a broken fixture.
#[fixture]
pub fn harness() -> Harness {
    Harness::seed().expect("seed in-memory backend")
}

/// Waits until the open board satisfies `predicate` and returns the
/// matching snapshot.
///
/// # Errors
///
/// Returns an error if the board does not reach the state in time.
pub async fn wait_for_board<F>(session: &Session, mut predicate: F) -> eyre::Result<BoardSnapshot>
where
    F: FnMut(&BoardSnapshot) -> bool,
{
    let mut changes = session.changes();
    let matched = tokio::time::timeout(WAIT_LIMIT, changes.wait_for(|snapshot| predicate(snapshot)))
        .await
        .wrap_err("timed out waiting for the board")?
        .wrap_err("board store closed")?;
    Ok(matched.clone())
}

/// Polls `check` until it returns true.
///
/// # Errors
///
/// Returns an error if `check` fails or never returns true in time.
pub async fn eventually<F>(mut check: F) -> eyre::Result<()>
where
    F: FnMut() -> eyre::Result<bool>,
{
    let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
    while !check()? {
        eyre::ensure!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Ok(())
}
