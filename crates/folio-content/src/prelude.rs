pub use folio_core::prelude::*;
pub use folio_types::auth::Actor;
pub use folio_types::store_adapter::{Content, StoreAdapter, StoreTransaction};
pub use folio_types::types::{ContentId, ContentStatus, NodeId};

// vim: ts=4
