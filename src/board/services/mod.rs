//! Application services for the board engine.

mod config;
mod drag;
mod editing;
mod error;
mod reconciler;
mod session;
mod store;
mod view;

pub use config::BoardConfig;
pub use drag::{DragOutcome, DragReorderController};
pub use editing::TaskEditService;
pub use error::{BoardServiceError, BoardServiceResult};
pub use reconciler::{ReconcileOutcome, Reconciler, ReconcilerHandle};
pub use session::BoardSession;
pub use store::{BoardSnapshot, BoardStore};
pub use view::{BoardColumn, BoardView, TaskCard};
