//! Data models for Gatepass

mod invitation;
mod session;

pub use invitation::*;
pub use session::*;
