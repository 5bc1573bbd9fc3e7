//! Gate check-in flow
//!
//! A scan goes text -> payload -> invitation. Malformed text stops at
//! `InvalidPayload` before any lookup; a well-formed payload for an unknown
//! id is `InvitationNotFound`.

use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument, warn};

use crate::error::{Error, Result};
use crate::models::{Invitation, InvitationStatus};
use crate::qr::{self, QrPayload};
use crate::repository::InvitationRepository;
use crate::storage::BlobStore;

/// Outcome of a successful scan
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub invitation: Invitation,
    pub payload: QrPayload,
    pub expired: bool,
}

impl ScanResult {
    pub fn can_check_in(&self) -> bool {
        self.invitation.is_pending() && !self.expired
    }
}

/// Decode scanned text and look up the invitation it names
pub fn scan<S: BlobStore>(repo: &InvitationRepository<S>, text: &str) -> Result<ScanResult> {
    scan_at(repo, text, Local::now().naive_local())
}

#[instrument(skip(repo, text))]
pub fn scan_at<S: BlobStore>(
    repo: &InvitationRepository<S>,
    text: &str,
    now: NaiveDateTime,
) -> Result<ScanResult> {
    let payload = qr::decode(text).inspect_err(|e| warn!(error = %e, "Rejected scan"))?;
    let invitation = repo.find(&payload.invitation_id)?.clone();
    let expired = invitation.is_expired_at(now);

    info!(
        invitation_id = %invitation.id,
        status = %invitation.status,
        expired,
        "Invitation scanned"
    );

    Ok(ScanResult {
        invitation,
        payload,
        expired,
    })
}

/// Check a visitor in. Only pending, unexpired invitations qualify.
pub fn check_in<S: BlobStore>(repo: &mut InvitationRepository<S>, id: &str) -> Result<Invitation> {
    check_in_at(repo, id, Local::now().naive_local())
}

#[instrument(skip(repo))]
pub fn check_in_at<S: BlobStore>(
    repo: &mut InvitationRepository<S>,
    id: &str,
    now: NaiveDateTime,
) -> Result<Invitation> {
    let invitation = repo.find(id)?;

    if invitation.is_checked_in() {
        return Err(Error::InvalidOperation(format!(
            "invitation {id} is already checked in"
        )));
    }
    if invitation.is_expired_at(now) {
        return Err(Error::InvalidOperation(format!("invitation {id} has expired")));
    }

    repo.update_status(id, InvitationStatus::CheckedIn)?;
    repo.find(id).cloned()
}
