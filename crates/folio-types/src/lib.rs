//! Shared types, adapter traits, and core utilities for Folio.
//!
//! This crate contains the foundational types that are shared between the
//! feature crates and all adapter implementations.

pub mod auth;
pub mod error;
pub mod file_adapter;
pub mod prelude;
pub mod store_adapter;
pub mod types;

// vim: ts=4
