//! Authentication view model

use gatepass_core::{Error, Result, User, UserRole};
use tracing::info;

use crate::state::AppState;

/// Sign in with a role and optional display name
pub fn login(state: &mut AppState, role: UserRole, name: Option<String>) -> Result<User> {
    let user = state.sessions.login(role, name)?;
    info!(role = role.display_name(), name = user.display_name(), "Welcome");
    Ok(user)
}

pub fn logout(state: &mut AppState) -> Result<()> {
    state.sessions.logout()
}

/// Fail unless the current session holds `role`
pub fn require_role(state: &AppState, role: UserRole) -> Result<()> {
    if state.sessions.has_role(role) {
        return Ok(());
    }

    let current = match state.sessions.user() {
        Some(user) if state.sessions.is_authenticated() => user.role.display_name(),
        _ => "signed out",
    };
    Err(Error::PermissionDenied(format!(
        "{} access required (current: {current})",
        role.display_name()
    )))
}

/// Dashboard the current session lands on, if any
pub fn home(state: &AppState) -> Option<UserRole> {
    if state.sessions.is_authenticated() {
        state.sessions.role()
    } else {
        None
    }
}
