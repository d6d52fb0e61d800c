//! Core data types for the shelf library manager.
//!
//! This crate defines the fundamental types shared by every other crate:
//! versions and constraints, library manifests, remote and local index records and their documents,
//! the global configuration, the on-disk layout, and command-line library
//! references.
//!
//! This crate is intentionally free of network I/O.

pub mod config;
pub mod constraint;
pub mod layout;
pub mod library;
pub mod manifest;
pub mod name;
pub mod reference;
pub mod version;
