//! Per-caller connection implementing both board ports.

use super::InMemoryBoardBackend;
use super::backend::{BackendState, Subscriber};
use crate::board::{
    domain::{NewTask, RawChangeEvent, Task, TaskId, TaskStatus, TaskUpdate},
    ports::{
        ChangeNotifications, ChangeSubscription, NotificationError, NotificationResult,
        PersistenceError, PersistenceResult, SubscriptionId, TaskPersistence,
    },
};
use crate::workspace::domain::{ProjectId, UserId};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;

/// Connection to an [`InMemoryBoardBackend`] on behalf of one caller.
///
/// Every write emits the matching change event to the project's
/// subscribers, so a connection's own writes echo back through the
/// notification stream.
#[derive(Debug, Clone)]
pub struct InMemoryConnection {
    backend: InMemoryBoardBackend,
    caller: UserId,
}

impl InMemoryConnection {
    pub(super) const fn new(backend: InMemoryBoardBackend, caller: UserId) -> Self {
        Self { backend, caller }
    }

    /// Returns the user this connection acts for.
    #[must_use]
    pub const fn caller(&self) -> UserId {
        self.caller
    }

    /// Looks up a task the caller may write, in the order: authorization,
    /// existence, injected failure.
    fn writable_task(&self, state: &mut BackendState, id: TaskId) -> PersistenceResult<ProjectId> {
        let project_id = state
            .tasks
            .get(&id)
            .map(Task::project_id)
            .ok_or(PersistenceError::NotFound(id))?;
        if !state.can_access(self.caller, project_id) {
            return Err(PersistenceError::Unauthorized);
        }
        state.take_write_failure()?;
        Ok(project_id)
    }

    fn publish_update(state: &mut BackendState, project_id: ProjectId, id: TaskId) {
        if let Some(task) = state.tasks.get(&id) {
            let event = RawChangeEvent::updated(task, Utc::now());
            state.publish(project_id, &event);
        }
    }
}

#[async_trait]
impl TaskPersistence for InMemoryConnection {
    async fn get_task(&self, id: TaskId) -> PersistenceResult<Option<Task>> {
        let state = self.backend.read()?;
        Ok(state
            .tasks
            .get(&id)
            .filter(|task| state.can_access(self.caller, task.project_id()))
            .map(|task| state.resolve(task)))
    }

    async fn list_tasks(&self, project_id: ProjectId) -> PersistenceResult<Vec<Task>> {
        let state = self.backend.read()?;
        if !state.can_access(self.caller, project_id) {
            return Err(PersistenceError::Unauthorized);
        }
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id)
            .map(|task| state.resolve(task))
            .collect();
        tasks.sort_by_key(|task| (task.position(), task.created_at(), task.id()));
        Ok(tasks)
    }

    async fn update_task_status(&self, id: TaskId, status: TaskStatus) -> PersistenceResult<()> {
        let mut state = self.backend.write()?;
        let project_id = self.writable_task(&mut state, id)?;
        if let Some(task) = state.tasks.get_mut(&id) {
            task.set_status(status, Utc::now());
        }
        Self::publish_update(&mut state, project_id, id);
        Ok(())
    }

    async fn create_task(
        &self,
        project_id: ProjectId,
        fields: &NewTask,
    ) -> PersistenceResult<Task> {
        let mut state = self.backend.write()?;
        if !state.can_access(self.caller, project_id) {
            return Err(PersistenceError::Unauthorized);
        }
        state.take_write_failure()?;

        let position = state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id)
            .map(Task::position)
            .max()
            .map_or(0, |last| last.saturating_add(1));
        let task = Task::create(project_id, fields, position, Utc::now());
        state.tasks.insert(task.id(), task.clone());
        let event = RawChangeEvent::inserted(&task, task.created_at());
        state.publish(project_id, &event);
        Ok(state.resolve(&task))
    }

    async fn update_task(&self, id: TaskId, fields: &TaskUpdate) -> PersistenceResult<()> {
        let mut state = self.backend.write()?;
        let project_id = self.writable_task(&mut state, id)?;
        if let Some(task) = state.tasks.get_mut(&id) {
            task.apply_update(fields, Utc::now());
        }
        Self::publish_update(&mut state, project_id, id);
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> PersistenceResult<()> {
        let mut state = self.backend.write()?;
        let project_id = self.writable_task(&mut state, id)?;
        state.tasks.remove(&id);
        state.publish(project_id, &RawChangeEvent::deleted(id, Utc::now()));
        Ok(())
    }
}

#[async_trait]
impl ChangeNotifications for InMemoryConnection {
    async fn subscribe(&self, project_id: ProjectId) -> NotificationResult<ChangeSubscription> {
        let mut state = self
            .backend
            .write()
            .map_err(NotificationError::transport)?;
        if !state.can_access(self.caller, project_id) {
            return Err(NotificationError::Unauthorized);
        }
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = SubscriptionId::new();
        state
            .subscribers
            .insert(id, Subscriber { project_id, sender });
        Ok(ChangeSubscription::new(id, project_id, receiver))
    }

    async fn unsubscribe(&self, subscription_id: SubscriptionId) -> NotificationResult<()> {
        let mut state = self
            .backend
            .write()
            .map_err(NotificationError::transport)?;
        state.subscribers.remove(&subscription_id);
        Ok(())
    }
}
