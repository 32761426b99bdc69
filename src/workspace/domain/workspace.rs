//! Workspace and project records.

use super::{Member, ProjectId, UserId, WorkspaceDomainError, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Top-level tenant boundary owning projects and members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: String,
    description: Option<String>,
    owner_id: UserId,
}

impl Workspace {
    /// Creates a workspace owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyWorkspaceName`] when the name is
    /// blank.
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Result<Self, WorkspaceDomainError> {
        let raw = name.into();
        if raw.trim().is_empty() {
            return Err(WorkspaceDomainError::EmptyWorkspaceName);
        }
        Ok(Self {
            id: WorkspaceId::new(),
            name: raw.trim().to_owned(),
            description: None,
            owner_id,
        })
    }

    /// Sets the workspace description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the workspace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the workspace description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Row-level visibility rule: the caller must be the owner or a member.
    #[must_use]
    pub fn is_visible_to(&self, user_id: UserId, members: &[Member]) -> bool {
        self.owner_id == user_id
            || members
                .iter()
                .any(|member| member.workspace_id == self.id && member.user_id == user_id)
    }
}

/// A board of tasks within a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    workspace_id: WorkspaceId,
    name: String,
    description: Option<String>,
    color: String,
}

impl Project {
    /// Default display colour applied when none is chosen.
    pub const DEFAULT_COLOR: &'static str = "#6366f1";

    /// Creates a project in `workspace_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyProjectName`] when the name is
    /// blank.
    pub fn new(
        workspace_id: WorkspaceId,
        name: impl Into<String>,
    ) -> Result<Self, WorkspaceDomainError> {
        let raw = name.into();
        if raw.trim().is_empty() {
            return Err(WorkspaceDomainError::EmptyProjectName);
        }
        Ok(Self {
            id: ProjectId::new(),
            workspace_id,
            name: raw.trim().to_owned(),
            description: None,
            color: Self::DEFAULT_COLOR.to_owned(),
        })
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the display colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the display colour.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }
}
