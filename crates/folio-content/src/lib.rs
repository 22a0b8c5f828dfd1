//! Contents: status lifecycle, draft editing and publishing.
//!
//! A content keeps two bodies. Edits go to the draft, publishing copies the draft
//! to the published body, bumps the version and appends a history snapshot.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod history;
pub mod lifecycle;
mod prelude;
pub mod versioning;

pub use history::ListHistory;
pub use lifecycle::{ListContents, StatusTransition};
pub use versioning::{CreateContent, UpdateContent};

// vim: ts=4
