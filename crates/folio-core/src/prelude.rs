pub use crate::app::App;
pub use folio_types::prelude::*;

// vim: ts=4
