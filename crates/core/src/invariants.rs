//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::Invitation;

/// Validate that an invitation's stored fields are consistent
pub fn assert_invitation_invariants(invitation: &Invitation) {
    debug_assert!(
        !invitation.id.as_str().is_empty(),
        "Invitation for {} has an empty id",
        invitation.visitor_full_name
    );

    debug_assert!(
        invitation.floor_number >= 1,
        "Invitation {} has floor {}",
        invitation.id,
        invitation.floor_number
    );
}

/// Validate that no two invitations share an id
pub fn assert_unique_ids(invitations: &[Invitation]) {
    if cfg!(debug_assertions) {
        let mut seen = HashSet::with_capacity(invitations.len());
        for invitation in invitations {
            debug_assert!(
                seen.insert(invitation.id.as_str()),
                "Duplicate invitation id {}",
                invitation.id
            );
        }
    }
}
