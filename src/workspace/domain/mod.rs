//! Domain types for workspaces, projects, and membership.

mod error;
mod ids;
mod membership;
mod workspace;

pub use error::{ParseMemberRoleError, WorkspaceDomainError};
pub use ids::{ProjectId, UserId, WorkspaceId};
pub use membership::{Member, MemberRole, UserProfile};
pub use workspace::{Project, Workspace};
