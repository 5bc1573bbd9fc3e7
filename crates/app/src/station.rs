//! Gate station loop
//!
//! Keyboard-wedge scanners type the decoded QR text followed by Enter, so
//! every input line is one scan. Each valid, eligible scan checks the
//! visitor in and queues a check-in notification.

use std::io::BufRead;

use chrono::{Local, NaiveDateTime};
use gatepass_core::notify::NotificationKind;
use gatepass_core::Error;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::notifications::DeliveryReport;
use crate::state::AppState;
use crate::viewmodel::gate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationSummary {
    pub scanned: usize,
    pub checked_in: usize,
    pub rejected: usize,
}

/// Outcome shown to the guard for one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    CheckedIn { visitor: String, party_size: u32 },
    AlreadyCheckedIn { visitor: String },
    Expired { visitor: String },
    InvalidCode,
    NotFound,
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanOutcome::CheckedIn {
                visitor,
                party_size,
            } => write!(f, "CHECKED IN: {visitor} (party of {party_size})"),
            ScanOutcome::AlreadyCheckedIn { visitor } => {
                write!(f, "ALREADY CHECKED IN: {visitor}")
            }
            ScanOutcome::Expired { visitor } => write!(f, "EXPIRED: {visitor}"),
            ScanOutcome::InvalidCode => write!(f, "Invalid QR code format"),
            ScanOutcome::NotFound => write!(f, "Invitation not found"),
        }
    }
}

/// Handle one scanned line. Lookup and check-in judge expiry against the
/// same `now`.
pub fn process_scan(
    state: &mut AppState,
    text: &str,
    now: NaiveDateTime,
    deliveries: &mut JoinSet<DeliveryReport>,
    handle: &Handle,
) -> gatepass_core::Result<ScanOutcome> {
    let scanned = match gate::scan_at(state, text, now) {
        Ok(scanned) => scanned,
        Err(Error::InvalidPayload(_)) => return Ok(ScanOutcome::InvalidCode),
        Err(Error::InvitationNotFound(_)) => return Ok(ScanOutcome::NotFound),
        Err(e) => return Err(e),
    };

    let visitor = scanned.invitation.visitor_full_name.clone();
    if scanned.invitation.is_checked_in() {
        return Ok(ScanOutcome::AlreadyCheckedIn { visitor });
    }
    if scanned.expired {
        return Ok(ScanOutcome::Expired { visitor });
    }

    let invitation = gate::check_in_at(state, scanned.invitation.id.as_str(), now)?;

    let notifier = state.notifier.clone();
    let for_delivery = invitation.clone();
    deliveries.spawn_on(
        async move { notifier.notify(NotificationKind::CheckIn, &for_delivery).await },
        handle,
    );

    Ok(ScanOutcome::CheckedIn {
        visitor,
        party_size: invitation.party_size(),
    })
}

/// Read scans until end of input
pub fn run<R: BufRead>(
    state: &mut AppState,
    input: R,
    handle: &Handle,
) -> anyhow::Result<(StationSummary, JoinSet<DeliveryReport>)> {
    let mut summary = StationSummary::default();
    let mut deliveries = JoinSet::new();

    info!("Gate station ready, waiting for scans");

    for line in input.lines() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        summary.scanned += 1;
        let now = Local::now().naive_local();
        let outcome = process_scan(state, text, now, &mut deliveries, handle)?;
        match &outcome {
            ScanOutcome::CheckedIn { .. } => summary.checked_in += 1,
            _ => {
                summary.rejected += 1;
                warn!(%outcome, "Scan rejected");
            }
        }
        println!("{outcome}");
    }

    info!(
        scanned = summary.scanned,
        checked_in = summary.checked_in,
        rejected = summary.rejected,
        "Gate station input closed"
    );
    Ok((summary, deliveries))
}
