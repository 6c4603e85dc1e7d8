//! Core types and utilities for pyscope
//!
//! # Modules
//!
//! - `error`: Error types and Result alias
//! - `types`: Value objects shared by the inspector and package crates

pub mod error;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
