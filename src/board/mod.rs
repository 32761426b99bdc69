//! Collaborative board state engine for Mondrian.
//!
//! A project board keeps one authoritative in-memory snapshot of the
//! project's tasks. Remote change notifications and local drag/edit actions
//! are both folded into that snapshot, and filtered column views are derived
//! from it on every read without mutating it. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
