pub use folio_core::prelude::*;
pub use folio_types::store_adapter::{ContentNode, NodePlacement, StoreAdapter, StoreTransaction};
pub use folio_types::types::NodeId;

// vim: ts=4
