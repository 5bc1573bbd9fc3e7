//! Stores that own the application state
//!
//! Both stores are constructed once over a shared [`BlobStore`](crate::storage::BlobStore)
//! and passed to whatever needs them.

mod invitations;
mod session;

pub use invitations::{InvitationFilter, InvitationRepository, StatusCounts};
pub use session::SessionStore;
