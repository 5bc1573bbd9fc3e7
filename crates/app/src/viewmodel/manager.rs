//! Manager dashboard view model

use chrono::{Local, NaiveDate, NaiveDateTime};
use gatepass_core::validation::validate_details;
use gatepass_core::{
    qr, Error, Invitation, InvitationDetails, InvitationFilter, InvitationPatch,
    InvitationStatus, QrPayload, Result, StatusCounts, UserRole,
};
use tracing::info;

use super::auth::require_role;
use crate::state::AppState;

/// A just-created invitation with the payload to show as its QR code
#[derive(Debug, Clone)]
pub struct CreatedInvitation {
    pub invitation: Invitation,
    pub qr: QrPayload,
}

/// One row of the invitation list
#[derive(Debug, Clone)]
pub struct InvitationRow {
    pub invitation: Invitation,
    pub expired: bool,
    pub can_check_in: bool,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub counts: StatusCounts,
    pub rows: Vec<InvitationRow>,
}

fn validate(details: &InvitationDetails) -> Result<()> {
    validate_details(details).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Error::Validation(messages.join("; "))
    })
}

/// Validate the form and create a pending invitation
pub fn create_invitation(
    state: &mut AppState,
    details: InvitationDetails,
) -> Result<CreatedInvitation> {
    require_role(state, UserRole::Manager)?;
    validate(&details)?;

    let invitation = state.invitations.create(details)?;
    let qr = qr::encode(&invitation.id);
    Ok(CreatedInvitation { invitation, qr })
}

/// Save edited form fields. Editing puts the invitation back to pending.
pub fn edit_invitation(state: &mut AppState, id: &str, details: InvitationDetails) -> Result<()> {
    require_role(state, UserRole::Manager)?;
    validate(&details)?;

    let patch = InvitationPatch::from(details).with_status(InvitationStatus::Pending);
    state.invitations.update(id, patch)
}

pub fn check_in(state: &mut AppState, id: &str) -> Result<()> {
    require_role(state, UserRole::Manager)?;
    state.invitations.update_status(id, InvitationStatus::CheckedIn)
}

/// The list's "expire" action.
///
/// Writes `PENDING`, which leaves the record as it was: expiry is derived
/// from the visit time and there is no stored expired state.
pub fn expire(state: &mut AppState, id: &str) -> Result<()> {
    require_role(state, UserRole::Manager)?;
    info!(invitation_id = id, "Expire requested");
    state.invitations.update_status(id, InvitationStatus::Pending)
}

pub fn delete(state: &mut AppState, id: &str) -> Result<()> {
    require_role(state, UserRole::Manager)?;
    state.invitations.delete(id)
}

/// Fresh QR payload for an existing invitation
pub fn qr_code(state: &AppState, id: &str) -> Result<QrPayload> {
    require_role(state, UserRole::Manager)?;
    let invitation = state.invitations.find(id)?;
    Ok(qr::encode(&invitation.id))
}

pub fn dashboard(state: &AppState, filter: &InvitationFilter) -> Result<Dashboard> {
    dashboard_at(state, filter, Local::now().naive_local())
}

pub fn dashboard_at(
    state: &AppState,
    filter: &InvitationFilter,
    now: NaiveDateTime,
) -> Result<Dashboard> {
    require_role(state, UserRole::Manager)?;

    let rows = state
        .invitations
        .search(filter)
        .into_iter()
        .map(|invitation| InvitationRow {
            expired: invitation.is_expired_at(now),
            can_check_in: invitation.can_check_in_at(now),
            invitation: invitation.clone(),
        })
        .collect();

    Ok(Dashboard {
        counts: state.invitations.counts(),
        rows,
    })
}

/// Pending invitations whose visit falls on the day after `today`
pub fn due_reminders(state: &AppState, today: NaiveDate) -> Vec<Invitation> {
    let Some(tomorrow) = today.succ_opt() else {
        return Vec::new();
    };

    state
        .invitations
        .all()
        .iter()
        .filter(|i| i.is_pending() && i.visit_date == tomorrow)
        .cloned()
        .collect()
}
