//! Adapter that resolves uploaded file references
use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait FileAdapter: Debug + Send + Sync {
	/// Checks whether an uploaded file exists under `url`
	async fn exists(&self, url: &str) -> FlResult<bool>;
}

// vim: ts=4
