//! Workspace membership and user profile types.

use super::{ParseMemberRoleError, UserId, WorkspaceDomainError, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Role a user holds within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// The single workspace owner.
    Owner,
    /// Administrator with invite rights.
    Admin,
    /// Regular member.
    Member,
}

impl MemberRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Returns whether holders of this role may invite new members.
    #[must_use]
    pub const fn can_invite(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl TryFrom<&str> for MemberRole {
    type Error = ParseMemberRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(ParseMemberRoleError(value.to_owned())),
        }
    }
}

/// A (user, role) pair within one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Workspace the membership belongs to.
    pub workspace_id: WorkspaceId,
    /// Member user.
    pub user_id: UserId,
    /// Member role.
    pub role: MemberRole,
}

impl Member {
    /// Creates a membership record.
    #[must_use]
    pub const fn new(workspace_id: WorkspaceId, user_id: UserId, role: MemberRole) -> Self {
        Self {
            workspace_id,
            user_id,
            role,
        }
    }
}

/// Public profile of a user, used to resolve assignee display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    id: UserId,
    email: String,
    full_name: Option<String>,
}

impl UserProfile {
    /// Creates a validated profile.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyEmail`] when the email is blank.
    pub fn new(id: UserId, email: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let raw = email.into();
        let email_trimmed = raw.trim();
        if email_trimmed.is_empty() {
            return Err(WorkspaceDomainError::EmptyEmail);
        }
        Ok(Self {
            id,
            email: email_trimmed.to_owned(),
            full_name: None,
        })
    }

    /// Sets the full name. Blank names are treated as absent.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        let name = full_name.into();
        self.full_name = (!name.trim().is_empty()).then(|| name.trim().to_owned());
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the full name, if any.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Returns the name shown on task cards: the full name, or the email
    /// when no name is set.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}
