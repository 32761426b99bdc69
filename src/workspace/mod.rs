//! Tenant model for Mondrian.
//!
//! Workspaces are the tenant boundary: they own projects and members, and a
//! workspace's rows are visible only to its owner and members. Only the
//! domain types live here; workspace and project CRUD is handled by the
//! persistence service and is not orchestrated by this crate.

pub mod domain;
