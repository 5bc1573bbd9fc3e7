//! Gatepass - visitor invitations and gate check-in
//!
//! Application layer over `gatepass-core`: configuration, shared state,
//! notification dispatch, and the role-gated view models used by the gate
//! station binary.

pub mod config;
pub mod notifications;
pub mod state;
pub mod station;
pub mod viewmodel;
