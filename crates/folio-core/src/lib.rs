//! Core infrastructure for Folio.
//!
//! Application state shared by the feature crates, configuration, tracing setup,
//! per-user write serialization and request validation.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod lock;
pub mod prelude;
pub mod settings;
pub mod transaction;
pub mod validate;

pub use app::{App, AppBuilder, AppState};
pub use settings::Settings;

// vim: ts=4
