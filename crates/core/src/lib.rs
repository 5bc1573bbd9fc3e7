//! Gatepass Core Library
//!
//! Invitation lifecycle, QR payloads, and persisted stores for the Gatepass
//! visitor system.

pub mod error;
pub mod gate;
pub mod id;
pub mod invariants;
pub mod models;
pub mod notify;
pub mod qr;
pub mod repository;
pub mod storage;
pub mod validation;

pub use error::{Error, Result};
pub use gate::ScanResult;
pub use id::{generate_id, InvitationId};
pub use models::*;
pub use qr::{QrPayload, PAYLOAD_TYPE};
pub use repository::{InvitationFilter, InvitationRepository, SessionStore, StatusCounts};
pub use storage::{BlobStore, Database, MemoryBlobStore};
