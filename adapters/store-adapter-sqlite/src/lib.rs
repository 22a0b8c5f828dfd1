//! SQLite-backed store adapter.
//!
//! Holds content nodes, contents and their publish history in a single SQLite
//! database running in WAL mode.

#![forbid(unsafe_code)]

mod content;
mod history;
mod node;
mod schema;
mod transaction;
mod utils;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::{path::Path, time::Duration};

use folio::prelude::*;
use folio::store_adapter::*;
use folio::types::{ContentId, HistoryId, NodeId};

pub use transaction::SqliteTransaction;

/// Connection settings of the adapter
#[derive(Clone, Copy, Debug)]
pub struct SqliteOptions {
	pub max_connections: u32,
	pub busy_timeout: Duration,
}

impl Default for SqliteOptions {
	fn default() -> Self {
		Self { max_connections: 5, busy_timeout: Duration::from_secs(5) }
	}
}

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> FlResult<Self> {
		Self::with_options(path, SqliteOptions::default()).await
	}

	pub async fn with_options(path: impl AsRef<Path>, options: SqliteOptions) -> FlResult<Self> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			if !parent.as_os_str().is_empty() {
				tokio::fs::create_dir_all(parent).await?;
			}
		}

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path)
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal)
			.busy_timeout(options.busy_timeout);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(options.max_connections)
			.connect_with(opts)
			.await
			.map_err(utils::db_err)?;

		schema::init_db(&db).await.map_err(utils::db_err)?;
		info!("Store opened: {} (schema v{})", path.display(), schema::SCHEMA_VERSION);

		Ok(Self { db })
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	async fn transaction(&self) -> FlResult<Box<dyn StoreTransaction>> {
		let tx = self.db.begin().await.map_err(utils::db_err)?;
		Ok(Box::new(SqliteTransaction::new(tx)))
	}

	// Nodes
	//*******
	async fn read_node(&self, user_id: UserId, node_id: NodeId) -> FlResult<Option<ContentNode>> {
		node::read(&self.db, user_id, node_id).await
	}

	async fn read_node_by_seo(
		&self,
		user_id: UserId,
		seo: &str,
	) -> FlResult<Option<ContentNode>> {
		node::read_by_seo(&self.db, user_id, seo).await
	}

	async fn node_seo_exists(&self, user_id: UserId, seo: &str) -> FlResult<bool> {
		node::seo_exists(&self.db, user_id, seo).await
	}

	async fn count_children(&self, user_id: UserId, node_id: NodeId) -> FlResult<u32> {
		node::count_children(&self.db, user_id, node_id).await
	}

	async fn list_nodes(&self, opts: &ListNodeOptions) -> FlResult<Page<ContentNode>> {
		node::list(&self.db, opts).await
	}

	// Contents
	//**********
	async fn read_content(
		&self,
		owner: Option<UserId>,
		content_id: ContentId,
	) -> FlResult<Option<Content>> {
		content::read(&self.db, owner, content_id).await
	}

	async fn content_seo_exists(&self, user_id: UserId, seo: &str) -> FlResult<bool> {
		content::seo_exists(&self.db, user_id, seo).await
	}

	async fn count_node_contents(
		&self,
		user_id: UserId,
		node_id: NodeId,
	) -> FlResult<NodeContentCount> {
		content::count_by_node(&self.db, user_id, node_id).await
	}

	async fn list_contents(&self, opts: &ListContentOptions) -> FlResult<Page<Content>> {
		content::list(&self.db, opts).await
	}

	// History
	//*********
	async fn read_history(
		&self,
		owner: Option<UserId>,
		history_id: HistoryId,
	) -> FlResult<Option<ContentHistory>> {
		history::read(&self.db, owner, history_id).await
	}

	async fn list_history(&self, opts: &ListHistoryOptions) -> FlResult<Page<ContentHistory>> {
		history::list(&self.db, opts).await
	}
}

// vim: ts=4
