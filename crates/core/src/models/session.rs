//! Session and role models

use serde::{Deserialize, Serialize};

/// Roles a signed-in actor can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Creates and manages invitations
    Manager,
    /// Scans visitors in at the gate
    GateGuard,
}

impl UserRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Manager => "Manager",
            UserRole::GateGuard => "Gate Guard",
        }
    }
}

/// The signed-in actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    pub fn new(role: UserRole, name: Option<String>) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self { role, name }
    }

    /// Name to greet the user with, falling back to the role label
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.role.display_name())
    }
}

/// Persisted authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl Session {
    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }
}
