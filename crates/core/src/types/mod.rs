//! Core types for Shutterfinch.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod provider;
pub mod term;

pub use id::*;
pub use provider::ExternalProvider;
pub use term::{SearchTerm, SearchTermError};
