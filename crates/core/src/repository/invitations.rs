//! Invitation repository
//!
//! Owns the ordered in-memory collection and writes the whole collection
//! back to the blob store after every mutation, so the stored snapshot always
//! matches memory. Mutations on an unknown id are silent no-ops.

use std::collections::HashSet;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::id::InvitationId;
use crate::invariants::{assert_invitation_invariants, assert_unique_ids};
use crate::models::{Invitation, InvitationDetails, InvitationPatch, InvitationStatus};
use crate::storage::{BlobStore, INVITATIONS_KEY};

/// Stored shape: `{ "invitations": [...] }`
#[derive(Debug, Default, Deserialize)]
struct Snapshot {
    #[serde(default)]
    invitations: Vec<Invitation>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    invitations: &'a [Invitation],
}

/// Manager dashboard filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitationFilter {
    /// Exact stored status
    pub status: Option<InvitationStatus>,
    /// Case-insensitive substring of the visitor's full name
    pub name: Option<String>,
}

impl InvitationFilter {
    pub fn matches(&self, invitation: &Invitation) -> bool {
        if let Some(status) = self.status {
            if invitation.status != status {
                return false;
            }
        }

        match self.name.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => invitation
                .visitor_full_name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }
}

/// Per-status totals shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub checked_in: usize,
}

pub struct InvitationRepository<S> {
    store: S,
    invitations: Vec<Invitation>,
}

impl<S: BlobStore> InvitationRepository<S> {
    /// Load the stored collection. A missing or unreadable snapshot starts empty.
    #[instrument(skip(store))]
    pub fn load(store: S) -> Result<Self> {
        let invitations = match store.load(INVITATIONS_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Snapshot>(&raw) {
                Ok(snapshot) => dedupe(snapshot.invitations),
                Err(e) => {
                    warn!(error = %e, "Stored invitations are malformed, starting empty");
                    Vec::new()
                }
            },
        };

        info!(count = invitations.len(), "Invitations loaded");
        Ok(Self { store, invitations })
    }

    /// Write `next` to the store and adopt it only once the write succeeded
    fn commit(&mut self, next: Vec<Invitation>) -> Result<()> {
        assert_unique_ids(&next);
        let raw = serde_json::to_string(&SnapshotRef {
            invitations: &next,
        })?;
        self.store.save(INVITATIONS_KEY, &raw)?;
        self.invitations = next;
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.invitations.iter().position(|i| i.id.as_str() == id)
    }

    /// Create a pending invitation and append it to the collection
    #[instrument(skip(self, details), fields(visitor = %details.visitor_full_name))]
    pub fn create(&mut self, details: InvitationDetails) -> Result<Invitation> {
        check_floor(details.floor_number)?;

        let mut invitation = Invitation::new(details);
        while self.position(invitation.id.as_str()).is_some() {
            invitation.id = InvitationId::generate();
        }
        assert_invitation_invariants(&invitation);

        let mut next = self.invitations.clone();
        next.push(invitation.clone());
        self.commit(next)?;

        info!(invitation_id = %invitation.id, "Invitation created");
        Ok(invitation)
    }

    /// Replace the stored status of an invitation
    #[instrument(skip(self, id), fields(invitation_id = id.as_ref()))]
    pub fn update_status(&mut self, id: impl AsRef<str>, status: InvitationStatus) -> Result<()> {
        let Some(index) = self.position(id.as_ref()) else {
            debug!("Status update for unknown invitation ignored");
            return Ok(());
        };

        let mut next = self.invitations.clone();
        next[index].status = status;
        self.commit(next)?;

        info!(%status, "Invitation status updated");
        Ok(())
    }

    /// Merge new field values into an invitation
    #[instrument(skip(self, id, patch), fields(invitation_id = id.as_ref()))]
    pub fn update(&mut self, id: impl AsRef<str>, patch: InvitationPatch) -> Result<()> {
        if let Some(floor) = patch.floor_number {
            check_floor(floor)?;
        }

        let Some(index) = self.position(id.as_ref()) else {
            debug!("Update for unknown invitation ignored");
            return Ok(());
        };

        let mut next = self.invitations.clone();
        next[index].apply(patch);
        assert_invitation_invariants(&next[index]);
        self.commit(next)?;

        info!("Invitation updated");
        Ok(())
    }

    /// Permanently remove an invitation
    #[instrument(skip(self, id), fields(invitation_id = id.as_ref()))]
    pub fn delete(&mut self, id: impl AsRef<str>) -> Result<()> {
        let Some(index) = self.position(id.as_ref()) else {
            debug!("Delete for unknown invitation ignored");
            return Ok(());
        };

        let mut next = self.invitations.clone();
        next.remove(index);
        self.commit(next)?;

        info!("Invitation deleted");
        Ok(())
    }

    pub fn get(&self, id: impl AsRef<str>) -> Option<&Invitation> {
        self.position(id.as_ref()).map(|i| &self.invitations[i])
    }

    /// Like [`get`](Self::get) but signals `InvitationNotFound`
    pub fn find(&self, id: impl AsRef<str>) -> Result<&Invitation> {
        let id = id.as_ref();
        self.get(id)
            .ok_or_else(|| Error::InvitationNotFound(id.to_string()))
    }

    /// All invitations in insertion order
    pub fn all(&self) -> &[Invitation] {
        &self.invitations
    }

    pub fn len(&self) -> usize {
        self.invitations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invitations.is_empty()
    }

    /// Pending invitations whose visit is still ahead of `now`
    pub fn pending_at(&self, now: NaiveDateTime) -> Vec<&Invitation> {
        self.invitations
            .iter()
            .filter(|i| i.is_pending() && !i.is_expired_at(now))
            .collect()
    }

    pub fn pending(&self) -> Vec<&Invitation> {
        self.pending_at(Local::now().naive_local())
    }

    /// Invitations whose visit is behind `now`, whatever their status
    pub fn expired_at(&self, now: NaiveDateTime) -> Vec<&Invitation> {
        self.invitations
            .iter()
            .filter(|i| i.is_expired_at(now))
            .collect()
    }

    pub fn expired(&self) -> Vec<&Invitation> {
        self.expired_at(Local::now().naive_local())
    }

    pub fn search(&self, filter: &InvitationFilter) -> Vec<&Invitation> {
        self.invitations
            .iter()
            .filter(|i| filter.matches(i))
            .collect()
    }

    pub fn counts(&self) -> StatusCounts {
        self.invitations
            .iter()
            .fold(StatusCounts::default(), |mut counts, i| {
                counts.total += 1;
                match i.status {
                    InvitationStatus::Pending => counts.pending += 1,
                    InvitationStatus::CheckedIn => counts.checked_in += 1,
                }
                counts
            })
    }

    /// The backing blob store
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn check_floor(floor: u32) -> Result<()> {
    if floor == 0 {
        return Err(Error::Validation("floor number must be at least 1".into()));
    }
    Ok(())
}

/// Keep the first record for each id
fn dedupe(invitations: Vec<Invitation>) -> Vec<Invitation> {
    let mut seen = HashSet::new();
    let before = invitations.len();
    let kept: Vec<Invitation> = invitations
        .into_iter()
        .filter(|i| seen.insert(i.id.clone()))
        .collect();

    if kept.len() < before {
        warn!(dropped = before - kept.len(), "Dropped duplicate invitation ids");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Database, MemoryBlobStore, ReadOnlyStore};
    use chrono::{NaiveDate, NaiveTime};

    fn details(name: &str, date: &str, time: &str) -> InvitationDetails {
        InvitationDetails {
            visitor_full_name: name.to_string(),
            visitor_title: "Consultant".to_string(),
            visitor_email: None,
            visitor_phone: None,
            number_of_companions: 0,
            visit_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            visit_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            reason_for_visit: "Quarterly review".to_string(),
            floor_number: 3,
            office_number: "305".to_string(),
            inviting_directorate: "Finance".to_string(),
        }
    }

    fn reference_now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-06-15 12:00", "%Y-%m-%d %H:%M").unwrap()
    }

    fn repo() -> InvitationRepository<MemoryBlobStore> {
        InvitationRepository::load(MemoryBlobStore::new()).unwrap()
    }

    #[test]
    fn test_create_assigns_pending_and_persists() {
        let mut repo = repo();
        let inv = repo.create(details("Ahmed", "2099-01-01", "10:00")).unwrap();

        assert_eq!(inv.status, InvitationStatus::Pending);
        assert_eq!(repo.get(&inv.id), Some(&inv));

        let raw = repo.store().load(INVITATIONS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["invitations"][0]["id"], inv.id.as_str());
    }

    #[test]
    fn test_create_rejects_floor_zero() {
        let mut repo = repo();
        let mut d = details("Ahmed", "2099-01-01", "10:00");
        d.floor_number = 0;

        assert!(matches!(repo.create(d), Err(Error::Validation(_))));
        assert!(repo.is_empty());
        assert!(repo.store().load(INVITATIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_ids_unique_across_creations() {
        let mut repo = repo();
        for n in 0..200 {
            repo.create(details(&format!("Visitor {n}"), "2099-01-01", "10:00"))
                .unwrap();
        }
        let ids: HashSet<_> = repo.all().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_check_in_leaves_pending_list() {
        let mut repo = repo();
        let inv = repo.create(details("Ahmed", "2099-01-01", "10:00")).unwrap();
        assert_eq!(repo.pending_at(reference_now()).len(), 1);

        repo.update_status(&inv.id, InvitationStatus::CheckedIn).unwrap();

        assert_eq!(repo.get(&inv.id).unwrap().status, InvitationStatus::CheckedIn);
        assert!(repo.pending_at(reference_now()).is_empty());
    }

    #[test]
    fn test_missing_id_mutations_are_noops() {
        let mut repo = repo();
        repo.create(details("Ahmed", "2099-01-01", "10:00")).unwrap();
        let before = repo.all().to_vec();

        repo.delete("missing").unwrap();
        repo.delete("missing").unwrap();
        repo.update_status("missing", InvitationStatus::CheckedIn).unwrap();
        repo.update("missing", InvitationPatch::default().with_status(InvitationStatus::CheckedIn))
            .unwrap();

        assert_eq!(repo.all(), before.as_slice());
    }

    #[test]
    fn test_expired_ignores_status_and_keeps_order() {
        let mut repo = repo();
        let past = repo.create(details("Past", "2025-06-14", "09:00")).unwrap();
        let future = repo.create(details("Future", "2025-06-16", "09:00")).unwrap();
        let past_checked = repo.create(details("Visited", "2025-06-15", "11:59")).unwrap();
        repo.update_status(&past_checked.id, InvitationStatus::CheckedIn)
            .unwrap();

        let expired: Vec<_> = repo
            .expired_at(reference_now())
            .into_iter()
            .map(|i| i.id.clone())
            .collect();
        assert_eq!(expired, vec![past.id.clone(), past_checked.id.clone()]);

        let pending: Vec<_> = repo
            .pending_at(reference_now())
            .into_iter()
            .map(|i| i.id.clone())
            .collect();
        assert_eq!(pending, vec![future.id]);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut repo = repo();
        let inv = repo.create(details("Ahmed", "2099-01-01", "10:00")).unwrap();

        repo.update(
            &inv.id,
            InvitationPatch {
                office_number: Some("410".into()),
                floor_number: Some(4),
                ..Default::default()
            },
        )
        .unwrap();

        let updated = repo.get(&inv.id).unwrap();
        assert_eq!(updated.office_number, "410");
        assert_eq!(updated.floor_number, 4);
        assert_eq!(updated.visitor_full_name, "Ahmed");
        assert_eq!(updated.created_at, inv.created_at);

        let err = repo.update(
            &inv.id,
            InvitationPatch {
                floor_number: Some(0),
                ..Default::default()
            },
        );
        assert!(matches!(err, Err(Error::Validation(_))));
        assert_eq!(repo.get(&inv.id).unwrap().floor_number, 4);
    }

    #[test]
    fn test_delete_is_permanent() {
        let mut repo = repo();
        let a = repo.create(details("A", "2099-01-01", "10:00")).unwrap();
        let b = repo.create(details("B", "2099-01-01", "10:00")).unwrap();

        repo.delete(&a.id).unwrap();
        assert!(repo.get(&a.id).is_none());
        assert!(matches!(repo.find(&a.id), Err(Error::InvitationNotFound(_))));
        assert_eq!(repo.all().len(), 1);
        assert_eq!(repo.all()[0].id, b.id);
    }

    #[test]
    fn test_search_and_counts() {
        let mut repo = repo();
        let ahmed = repo.create(details("Ahmed Ali", "2099-01-01", "10:00")).unwrap();
        repo.create(details("Sara Ahmed", "2099-01-01", "10:00")).unwrap();
        repo.create(details("Omar", "2099-01-01", "10:00")).unwrap();
        repo.update_status(&ahmed.id, InvitationStatus::CheckedIn).unwrap();

        let by_name = repo.search(&InvitationFilter {
            status: None,
            name: Some("ahmed".into()),
        });
        assert_eq!(by_name.len(), 2);

        let checked_in = repo.search(&InvitationFilter {
            status: Some(InvitationStatus::CheckedIn),
            name: Some("  ".into()),
        });
        assert_eq!(checked_in.len(), 1);
        assert_eq!(checked_in[0].id, ahmed.id);

        assert_eq!(
            repo.counts(),
            StatusCounts {
                total: 3,
                pending: 2,
                checked_in: 1,
            }
        );
    }

    #[test]
    fn test_reload_from_database() {
        let db = Database::open_in_memory().unwrap();

        let created = {
            let mut repo = InvitationRepository::load(&db).unwrap();
            let inv = repo.create(details("Ahmed", "2099-01-01", "10:00")).unwrap();
            repo.update_status(&inv.id, InvitationStatus::CheckedIn).unwrap();
            inv
        };

        let repo = InvitationRepository::load(&db).unwrap();
        assert_eq!(repo.len(), 1);
        let loaded = repo.get(&created.id).unwrap();
        assert_eq!(loaded.status, InvitationStatus::CheckedIn);
        assert_eq!(loaded.created_at, created.created_at);
    }

    #[test]
    fn test_malformed_blob_loads_empty() {
        let store = MemoryBlobStore::with_blobs([(INVITATIONS_KEY, "{not json")]);
        let repo = InvitationRepository::load(store).unwrap();
        assert!(repo.is_empty());

        let store = MemoryBlobStore::with_blobs([(INVITATIONS_KEY, r#"{"invitations":[{"id":1}]}"#)]);
        let repo = InvitationRepository::load(store).unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let first = Invitation::new(details("First", "2099-01-01", "10:00"));
        let mut second = Invitation::new(details("Second", "2099-01-01", "10:00"));
        second.id = first.id.clone();

        let raw = serde_json::to_string(&SnapshotRef {
            invitations: &[first.clone(), second],
        })
        .unwrap();
        let repo = InvitationRepository::load(MemoryBlobStore::with_blobs([(INVITATIONS_KEY, raw)]))
            .unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.all()[0].visitor_full_name, "First");
    }

    #[test]
    fn test_failed_save_leaves_collection_untouched() {
        let existing = Invitation::new(details("Ahmed", "2099-01-01", "10:00"));
        let raw = serde_json::to_string(&SnapshotRef {
            invitations: std::slice::from_ref(&existing),
        })
        .unwrap();
        let store = ReadOnlyStore(MemoryBlobStore::with_blobs([(INVITATIONS_KEY, raw.clone())]));
        let mut repo = InvitationRepository::load(store).unwrap();

        let created = repo.create(details("Sara", "2099-01-02", "11:00"));
        assert!(matches!(created, Err(Error::Io(_))));
        assert_eq!(repo.all(), std::slice::from_ref(&existing));

        assert!(repo
            .update_status(&existing.id, InvitationStatus::CheckedIn)
            .is_err());
        assert!(repo
            .update(
                &existing.id,
                InvitationPatch {
                    visitor_full_name: Some("Ahmed Saleh".into()),
                    ..Default::default()
                },
            )
            .is_err());
        assert!(repo.delete(&existing.id).is_err());

        assert_eq!(repo.all(), std::slice::from_ref(&existing));
        assert_eq!(
            repo.store().load(INVITATIONS_KEY).unwrap().as_deref(),
            Some(raw.as_str())
        );
    }
}
