//! Scoped lifetime of one open project board.

use super::{
    BoardConfig, BoardServiceResult, BoardSnapshot, BoardStore, BoardView, DragOutcome,
    DragReorderController, Reconciler, ReconcilerHandle, TaskEditService,
};
use crate::board::{
    domain::{DragResult, TaskFilter},
    ports::{ChangeNotifications, TaskPersistence},
};
use crate::workspace::domain::ProjectId;
use mockable::Clock;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::watch;

/// An open board: store, live reconciliation, and view state.
///
/// [`BoardSession::open`] acquires the change subscription and
/// [`BoardSession::close`] releases it. A session dropped without closing
/// aborts its reconciler; the subscription is then released by the
/// notification service when it notices the receiver is gone.
pub struct BoardSession<P, N, C>
where
    P: TaskPersistence + 'static,
    N: ChangeNotifications + 'static,
    C: Clock + Send + Sync,
{
    project_id: ProjectId,
    store: BoardStore,
    persistence: Arc<P>,
    clock: Arc<C>,
    config: BoardConfig,
    view_state: TaskFilter,
    reconciler: Option<ReconcilerHandle>,
    _notifications: PhantomData<fn() -> N>,
}

impl<P, N, C> BoardSession<P, N, C>
where
    P: TaskPersistence + 'static,
    N: ChangeNotifications + 'static,
    C: Clock + Send + Sync,
{
    /// Opens the board for `project_id`.
    ///
    /// The change stream is opened before the initial load so no change
    /// committed in between is missed; replaying such a change over the
    /// loaded snapshot is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardServiceError::Unauthorized`] when the caller
    /// cannot see the project, or a persistence/notification error.
    pub async fn open(
        project_id: ProjectId,
        persistence: Arc<P>,
        notifications: Arc<N>,
        clock: Arc<C>,
        config: BoardConfig,
    ) -> BoardServiceResult<Self> {
        let subscription = notifications.subscribe(project_id).await?;
        let initial = match persistence.list_tasks(project_id).await {
            Ok(tasks) => tasks,
            Err(err) => {
                if let Err(unsubscribe_err) = notifications.unsubscribe(subscription.id()).await {
                    tracing::warn!(
                        project_id = %project_id,
                        error = %unsubscribe_err,
                        "failed to release subscription after load failure"
                    );
                }
                return Err(err.into());
            }
        };

        let store = BoardStore::new();
        store.load(initial);
        let reconciler = Reconciler::new(store.clone(), Arc::clone(&persistence), project_id)
            .with_max_in_flight(config.max_in_flight_fetches)
            .spawn(subscription, notifications);
        tracing::info!(
            project_id = %project_id,
            tasks = store.snapshot().len(),
            "board opened"
        );

        Ok(Self {
            project_id,
            store,
            persistence,
            clock,
            config,
            view_state: TaskFilter::default(),
            reconciler: Some(reconciler),
            _notifications: PhantomData,
        })
    }

    /// Returns the project shown on this board.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the board store.
    #[must_use]
    pub const fn store(&self) -> &BoardStore {
        &self.store
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.store.snapshot()
    }

    /// Returns a receiver notified after every store mutation.
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<BoardSnapshot> {
        self.store.subscribe()
    }

    /// Returns the search/filter state.
    #[must_use]
    pub const fn view_state(&self) -> &TaskFilter {
        &self.view_state
    }

    /// Returns the search/filter state for editing.
    pub const fn view_state_mut(&mut self) -> &mut TaskFilter {
        &mut self.view_state
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Derives the rendered board from the current snapshot and view state.
    #[must_use]
    pub fn view(&self) -> BoardView {
        BoardView::project(
            &self.store.snapshot(),
            &self.view_state,
            self.clock.utc(),
            self.config.due_soon_window(),
        )
    }

    /// Returns a drag controller bound to this board.
    #[must_use]
    pub fn drag_controller(&self) -> DragReorderController<P> {
        DragReorderController::new(self.store.clone(), Arc::clone(&self.persistence))
    }

    /// Returns an edit service bound to this board.
    #[must_use]
    pub fn editor(&self) -> TaskEditService<P> {
        TaskEditService::new(
            self.store.clone(),
            Arc::clone(&self.persistence),
            self.project_id,
        )
    }

    /// Handles the end of a drag gesture on this board.
    ///
    /// # Errors
    ///
    /// See [`DragReorderController::handle_drag_end`].
    pub async fn handle_drag_end(&self, drag: &DragResult) -> BoardServiceResult<DragOutcome> {
        self.drag_controller().handle_drag_end(drag).await
    }

    /// Returns whether live reconciliation is still running.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.reconciler
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops reconciliation and releases the change subscription.
    pub async fn close(mut self) {
        if let Some(reconciler) = self.reconciler.take() {
            reconciler.shutdown().await;
        }
        tracing::info!(project_id = %self.project_id, "board closed");
    }
}

impl<P, N, C> Drop for BoardSession<P, N, C>
where
    P: TaskPersistence + 'static,
    N: ChangeNotifications + 'static,
    C: Clock + Send + Sync,
{
    fn drop(&mut self) {
        if self.reconciler.is_some() {
            tracing::debug!(project_id = %self.project_id, "board dropped without close");
        }
    }
}
