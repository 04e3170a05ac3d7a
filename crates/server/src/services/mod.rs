//! Business logic services.
//!
//! Services sit between route handlers and the repository/catalog layers.

pub mod accounts;
pub mod search;
