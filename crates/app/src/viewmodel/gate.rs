//! Gate guard view model

use chrono::{Local, NaiveDateTime};
use gatepass_core::{gate, Invitation, Result, ScanResult, UserRole};

use super::auth::require_role;
use crate::state::AppState;

/// Look up the invitation behind a scanned code
pub fn scan(state: &AppState, text: &str) -> Result<ScanResult> {
    scan_at(state, text, Local::now().naive_local())
}

pub fn scan_at(state: &AppState, text: &str, now: NaiveDateTime) -> Result<ScanResult> {
    require_role(state, UserRole::GateGuard)?;
    gate::scan_at(&state.invitations, text, now)
}

/// Check in a scanned visitor
pub fn check_in(state: &mut AppState, id: &str) -> Result<Invitation> {
    check_in_at(state, id, Local::now().naive_local())
}

pub fn check_in_at(state: &mut AppState, id: &str, now: NaiveDateTime) -> Result<Invitation> {
    require_role(state, UserRole::GateGuard)?;
    gate::check_in_at(&mut state.invitations, id, now)
}
