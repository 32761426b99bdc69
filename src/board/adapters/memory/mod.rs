//! In-memory adapters for the board ports.
//!
//! [`InMemoryBoardBackend`] plays the role of the persistence and
//! change-notification services in one process. Connections obtained from
//! it act on behalf of one caller.

mod backend;
mod connection;

pub use backend::InMemoryBoardBackend;
pub use connection::InMemoryConnection;
