//! Mondrian: collaborative project boards.
//!
//! This crate provides the state engine behind a shared kanban board:
//! keeping an authoritative task snapshot per open board, folding remote
//! change notifications into it, and applying optimistic drag-and-drop
//! status changes with rollback.
//!
//! # Architecture
//!
//! Mondrian follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`workspace`]: Workspaces, projects, membership, and user profiles
//! - [`board`]: Tasks, filtering, column projection, and live reconciliation

pub mod board;
pub mod workspace;
