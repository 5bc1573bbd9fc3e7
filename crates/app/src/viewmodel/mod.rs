//! View models
//!
//! Headless entry points for the two dashboards. Each function takes the
//! application state by reference and returns what a front end would render.

pub mod auth;
pub mod gate;
pub mod manager;
