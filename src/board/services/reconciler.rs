//! Folds remote change notifications into the board store.
//!
//! Insert and update notifications carry only the row key, so each one
//! triggers a fetch of the full task. Fetches run concurrently and may
//! complete out of order; a per-task sequence guard discards a fetch
//! result whenever a later notification for the same task has already been
//! applied. Delete notifications apply immediately.

use super::{BoardServiceError, BoardServiceResult, BoardStore};
use crate::board::{
    domain::{ChangeKind, RawChangeEvent, Task, TaskChangeEvent, TaskId},
    ports::{ChangeNotifications, ChangeSubscription, PersistenceResult, TaskPersistence},
};
use crate::workspace::domain::ProjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle, JoinSet};

/// Effect of one notification on the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A new task was added.
    Inserted(TaskId),
    /// A stored task was replaced.
    Replaced(TaskId),
    /// A task was removed.
    Removed(TaskId),
    /// The notification was applied but the store already held that state.
    Unchanged(TaskId),
    /// The task no longer exists upstream; nothing was applied.
    Vanished(TaskId),
    /// A later notification for the task was already applied.
    Superseded(TaskId),
}

/// Delivery-order guard keyed by task.
///
/// Sequence numbers only grow, so ordering state for a task matters only
/// while a fetch for it is outstanding. Entries are dropped as soon as a
/// task's last fetch settles, which bounds both maps by the number of
/// in-flight fetches.
#[derive(Debug, Default)]
struct EventSequencer {
    issued: u64,
    applied: HashMap<TaskId, u64>,
    in_flight: HashMap<TaskId, usize>,
}

impl EventSequencer {
    /// Stamps a newly received notification.
    const fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Stamps a notification whose task must be fetched before it applies.
    fn issue_fetch(&mut self, task_id: TaskId) -> u64 {
        *self.in_flight.entry(task_id).or_default() += 1;
        self.issue()
    }

    /// Records a delete. Only kept while older fetches for the task are
    /// still running, so they cannot bring the task back.
    fn commit_delete(&mut self, task_id: TaskId, sequence: u64) {
        if self.in_flight.contains_key(&task_id) {
            self.applied.insert(task_id, sequence);
        }
    }

    /// Settles a fetch and returns whether its result may be applied:
    /// `false` when a later notification for the task already was.
    fn commit_fetch(&mut self, task_id: TaskId, sequence: u64) -> bool {
        let fresh = self
            .applied
            .get(&task_id)
            .is_none_or(|&last| last < sequence);
        if fresh {
            self.applied.insert(task_id, sequence);
        }
        self.settle(task_id);
        fresh
    }

    /// Settles a fetch that produced nothing to apply.
    fn abandon_fetch(&mut self, task_id: TaskId) {
        self.settle(task_id);
    }

    fn settle(&mut self, task_id: TaskId) {
        let remaining = self.in_flight.get_mut(&task_id).map(|count| {
            *count = count.saturating_sub(1);
            *count
        });
        if remaining.is_none_or(|count| count == 0) {
            self.in_flight.remove(&task_id);
            self.applied.remove(&task_id);
        }
    }

    fn tracked(&self) -> usize {
        self.in_flight.len()
    }
}

/// Completed fetch for an insert or update notification.
#[derive(Debug)]
struct FetchedTask {
    event: TaskChangeEvent,
    sequence: u64,
    result: PersistenceResult<Option<Task>>,
}

/// Applies change notifications for one project to a [`BoardStore`].
pub struct Reconciler<P>
where
    P: TaskPersistence + 'static,
{
    store: BoardStore,
    persistence: Arc<P>,
    project_id: ProjectId,
    max_in_flight: usize,
    sequencer: EventSequencer,
}

impl<P> Reconciler<P>
where
    P: TaskPersistence + 'static,
{
    /// Creates a reconciler writing into `store`.
    #[must_use]
    pub fn new(store: BoardStore, persistence: Arc<P>, project_id: ProjectId) -> Self {
        Self {
            store,
            persistence,
            project_id,
            max_in_flight: 16,
            sequencer: EventSequencer::default(),
        }
    }

    /// Caps the number of concurrent fetches. Zero is treated as one.
    #[must_use]
    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = limit.max(1);
        self
    }

    /// Returns the number of tasks for which ordering state is held, which
    /// is the number of tasks with a fetch still outstanding.
    #[must_use]
    pub fn tracked_tasks(&self) -> usize {
        self.sequencer.tracked()
    }

    /// Applies one notification, fetching inline when required.
    ///
    /// Duplicate deliveries are harmless: inserts of present tasks, updates
    /// to equal state, and deletes of absent tasks leave the store as is.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::MalformedEvent`] for payloads that
    /// cannot be interpreted, and persistence errors from the fetch other
    /// than a missing row.
    pub async fn apply_event(
        &mut self,
        raw: &RawChangeEvent,
    ) -> BoardServiceResult<ReconcileOutcome> {
        let event = TaskChangeEvent::try_from(raw)?;
        if event.kind == ChangeKind::Delete {
            let sequence = self.sequencer.issue();
            return Ok(self.apply_delete(event.task_id, sequence));
        }
        let sequence = self.sequencer.issue_fetch(event.task_id);
        let result = self.persistence.get_task(event.task_id).await;
        self.apply_fetched(FetchedTask {
            event,
            sequence,
            result,
        })
    }

    /// Spawns the reconciliation loop on the current runtime.
    ///
    /// The loop runs until the subscription ends or the returned handle is
    /// shut down, then unsubscribes from `notifications`.
    pub fn spawn<N>(
        self,
        subscription: ChangeSubscription,
        notifications: Arc<N>,
    ) -> ReconcilerHandle
    where
        N: ChangeNotifications + 'static,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let project_id = self.project_id;
        let join = tokio::spawn(async move {
            let subscription_id = subscription.id();
            self.run(subscription, shutdown_rx).await;
            if let Err(err) = notifications.unsubscribe(subscription_id).await {
                tracing::warn!(
                    project_id = %project_id,
                    subscription_id = %subscription_id,
                    error = %err,
                    "failed to unsubscribe from task changes"
                );
            }
        });
        ReconcilerHandle {
            shutdown: Some(shutdown_tx),
            join: Some(join),
        }
    }

    /// Runs the reconciliation loop until the subscription closes or
    /// `shutdown` fires. In-flight fetches are abandoned on shutdown and
    /// drained when the stream closes.
    pub async fn run(
        mut self,
        mut subscription: ChangeSubscription,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let mut fetches: JoinSet<FetchedTask> = JoinSet::new();
        let mut stream_open = true;
        tracing::debug!(project_id = %self.project_id, "reconciler started");

        loop {
            if !stream_open && fetches.is_empty() {
                break;
            }
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                    self.complete_fetch(joined);
                }
                next = subscription.next_event(), if stream_open && fetches.len() < self.max_in_flight => {
                    match next {
                        Some(raw) => self.dispatch(&raw, &mut fetches),
                        None => stream_open = false,
                    }
                }
            }
        }

        fetches.abort_all();
        tracing::debug!(project_id = %self.project_id, "reconciler stopped");
    }

    /// Validates a notification and either applies it or starts its fetch.
    fn dispatch(&mut self, raw: &RawChangeEvent, fetches: &mut JoinSet<FetchedTask>) {
        let event = match TaskChangeEvent::try_from(raw) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(
                    project_id = %self.project_id,
                    error = %err,
                    "dropping malformed change event"
                );
                return;
            }
        };
        if event.kind == ChangeKind::Delete {
            let sequence = self.sequencer.issue();
            self.apply_delete(event.task_id, sequence);
            return;
        }
        let sequence = self.sequencer.issue_fetch(event.task_id);
        let persistence = Arc::clone(&self.persistence);
        fetches.spawn(async move {
            let result = persistence.get_task(event.task_id).await;
            FetchedTask {
                event,
                sequence,
                result,
            }
        });
    }

    fn complete_fetch(&mut self, joined: Result<FetchedTask, JoinError>) {
        let fetched = match joined {
            Ok(fetched) => fetched,
            Err(err) => {
                tracing::warn!(project_id = %self.project_id, error = %err, "task fetch aborted");
                return;
            }
        };
        let task_id = fetched.event.task_id;
        if let Err(err) = self.apply_fetched(fetched) {
            tracing::warn!(
                project_id = %self.project_id,
                task_id = %task_id,
                error = %err,
                "dropping change event after failed fetch"
            );
        }
    }

    fn apply_delete(&mut self, task_id: TaskId, sequence: u64) -> ReconcileOutcome {
        self.sequencer.commit_delete(task_id, sequence);
        if self.store.remove(task_id) {
            ReconcileOutcome::Removed(task_id)
        } else {
            tracing::debug!(task_id = %task_id, "delete for absent task ignored");
            ReconcileOutcome::Unchanged(task_id)
        }
    }

    fn apply_fetched(&mut self, fetched: FetchedTask) -> BoardServiceResult<ReconcileOutcome> {
        let FetchedTask {
            event,
            sequence,
            result,
        } = fetched;
        let task_id = event.task_id;
        let fetched_task = match result {
            Ok(task) => task,
            Err(err) => {
                self.sequencer.abandon_fetch(task_id);
                let service_err = BoardServiceError::from(err);
                if service_err.is_benign() {
                    return Ok(ReconcileOutcome::Vanished(task_id));
                }
                return Err(service_err);
            }
        };

        if !self.sequencer.commit_fetch(task_id, sequence) {
            tracing::debug!(task_id = %task_id, sequence, "stale fetch discarded");
            return Ok(ReconcileOutcome::Superseded(task_id));
        }
        let Some(task) = fetched_task else {
            tracing::debug!(task_id = %task_id, "task vanished before fetch");
            return Ok(ReconcileOutcome::Vanished(task_id));
        };
        if task.project_id() != self.project_id {
            tracing::warn!(
                project_id = %self.project_id,
                task_id = %task_id,
                "change event for a task outside this project ignored"
            );
            return Ok(ReconcileOutcome::Unchanged(task_id));
        }

        let changed = match event.kind {
            ChangeKind::Insert => self.store.insert(task),
            ChangeKind::Update | ChangeKind::Delete => self.store.replace(task),
        };
        Ok(match (changed, event.kind) {
            (false, _) => ReconcileOutcome::Unchanged(task_id),
            (true, ChangeKind::Insert) => ReconcileOutcome::Inserted(task_id),
            (true, _) => ReconcileOutcome::Replaced(task_id),
        })
    }
}

/// Handle to a spawned reconciliation loop.
///
/// Dropping the handle without calling [`ReconcilerHandle::shutdown`]
/// aborts the loop; nothing is delivered into the store afterwards.
#[derive(Debug)]
pub struct ReconcilerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl ReconcilerHandle {
    /// Returns whether the loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stops the loop, waits for it to unsubscribe, and returns.
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            if shutdown.send(()).is_err() {
                tracing::debug!("reconciler already stopped");
            }
        }
        if let Some(join) = self.join.take() {
            if let Err(err) = join.await {
                tracing::warn!(error = %err, "reconciler task ended abnormally");
            }
        }
    }
}

impl Drop for ReconcilerHandle {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}
