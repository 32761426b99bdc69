//! Shared state behind in-memory connections.

use super::InMemoryConnection;
use crate::board::{
    domain::{RawChangeEvent, Task, TaskId},
    ports::{PersistenceError, PersistenceResult, SubscriptionId},
};
use crate::workspace::domain::{
    Member, MemberRole, Project, ProjectId, UserId, UserProfile, Workspace, WorkspaceId,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;

/// In-process stand-in for the persistence and notification services.
///
/// Cloning yields another handle to the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardBackend {
    state: Arc<RwLock<BackendState>>,
}

#[derive(Debug)]
pub(super) struct Subscriber {
    pub(super) project_id: ProjectId,
    pub(super) sender: mpsc::UnboundedSender<RawChangeEvent>,
}

#[derive(Debug, Default)]
pub(super) struct BackendState {
    pub(super) profiles: HashMap<UserId, UserProfile>,
    pub(super) workspaces: HashMap<WorkspaceId, Workspace>,
    pub(super) members: Vec<Member>,
    pub(super) projects: HashMap<ProjectId, Project>,
    pub(super) tasks: HashMap<TaskId, Task>,
    pub(super) subscribers: HashMap<SubscriptionId, Subscriber>,
    pub(super) pending_write_failures: u32,
}

impl BackendState {
    /// Row-level authorization for a project.
    pub(super) fn can_access(&self, caller: UserId, project_id: ProjectId) -> bool {
        self.projects
            .get(&project_id)
            .and_then(|project| self.workspaces.get(&project.workspace_id()))
            .is_some_and(|workspace| workspace.is_visible_to(caller, &self.members))
    }

    /// Embeds the assignee profile into a stored task.
    pub(super) fn resolve(&self, task: &Task) -> Task {
        let profile = task
            .assigned_to()
            .and_then(|user_id| self.profiles.get(&user_id))
            .cloned();
        task.clone().with_assignee_profile(profile)
    }

    /// Delivers `event` to every live subscriber of `project_id`, pruning
    /// subscribers whose receiver has gone away.
    pub(super) fn publish(&mut self, project_id: ProjectId, event: &RawChangeEvent) {
        self.subscribers.retain(|_, subscriber| {
            if subscriber.project_id != project_id {
                return true;
            }
            subscriber.sender.send(event.clone()).is_ok()
        });
    }

    /// Consumes one injected write failure, if any are pending.
    pub(super) fn take_write_failure(&mut self) -> PersistenceResult<()> {
        if self.pending_write_failures == 0 {
            return Ok(());
        }
        self.pending_write_failures -= 1;
        Err(PersistenceError::failure(std::io::Error::other(
            "injected write failure",
        )))
    }
}

impl InMemoryBoardBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a connection acting on behalf of `caller`.
    #[must_use]
    pub fn connect(&self, caller: UserId) -> InMemoryConnection {
        InMemoryConnection::new(self.clone(), caller)
    }

    pub(super) fn read(&self) -> PersistenceResult<RwLockReadGuard<'_, BackendState>> {
        self.state
            .read()
            .map_err(|err| PersistenceError::failure(std::io::Error::other(err.to_string())))
    }

    pub(super) fn write(&self) -> PersistenceResult<RwLockWriteGuard<'_, BackendState>> {
        self.state
            .write()
            .map_err(|err| PersistenceError::failure(std::io::Error::other(err.to_string())))
    }

    /// Registers a user profile. Existing profiles are replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Failure`] when lock acquisition fails.
    pub fn add_profile(&self, profile: UserProfile) -> PersistenceResult<()> {
        self.write()?.profiles.insert(profile.id(), profile);
        Ok(())
    }

    /// Stores a workspace and records its owner as an `owner` member.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Failure`] when lock acquisition fails.
    pub fn add_workspace(&self, workspace: Workspace) -> PersistenceResult<()> {
        let mut state = self.write()?;
        state.members.push(Member::new(
            workspace.id(),
            workspace.owner_id(),
            MemberRole::Owner,
        ));
        state.workspaces.insert(workspace.id(), workspace);
        Ok(())
    }

    /// Adds a member to a workspace. Re-adding a user replaces their role.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Failure`] when lock acquisition fails.
    pub fn add_member(&self, member: Member) -> PersistenceResult<()> {
        let mut state = self.write()?;
        state.members.retain(|existing| {
            existing.workspace_id != member.workspace_id || existing.user_id != member.user_id
        });
        state.members.push(member);
        Ok(())
    }

    /// Stores a project.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Failure`] when lock acquisition fails.
    pub fn add_project(&self, project: Project) -> PersistenceResult<()> {
        self.write()?.projects.insert(project.id(), project);
        Ok(())
    }

    /// Stores a task directly, bypassing authorization and change events.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Failure`] when lock acquisition fails.
    pub fn seed_task(&self, task: Task) -> PersistenceResult<()> {
        self.write()?.tasks.insert(task.id(), task);
        Ok(())
    }

    /// Makes the next `count` write operations fail with a persistence
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Failure`] when lock acquisition fails.
    pub fn fail_next_writes(&self, count: u32) -> PersistenceResult<()> {
        self.write()?.pending_write_failures = count;
        Ok(())
    }

    /// Delivers an arbitrary payload to a project's subscribers, for
    /// replaying duplicates or malformed events.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Failure`] when lock acquisition fails.
    pub fn publish_raw(&self, project_id: ProjectId, event: &RawChangeEvent) -> PersistenceResult<()> {
        self.write()?.publish(project_id, event);
        Ok(())
    }

    /// Returns the number of open subscriptions for a project.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Failure`] when lock acquisition fails.
    pub fn subscriber_count(&self, project_id: ProjectId) -> PersistenceResult<usize> {
        Ok(self
            .read()?
            .subscribers
            .values()
            .filter(|subscriber| subscriber.project_id == project_id)
            .count())
    }

    /// Returns the stored task, without authorization checks.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Failure`] when lock acquisition fails.
    pub fn stored_task(&self, id: TaskId) -> PersistenceResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).map(|task| state.resolve(task)))
    }
}
