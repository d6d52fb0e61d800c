//! Shared utilities for the shelf library manager.
//!
//! This crate provides cross-cutting concerns used by all other shelf crates:
//! the error type, filesystem helpers, per-user directory resolution,
//! a grouping helper, and terminal progress indicators.

pub mod dirs;
pub mod errors;
pub mod fs;
pub mod group;
pub mod progress;
