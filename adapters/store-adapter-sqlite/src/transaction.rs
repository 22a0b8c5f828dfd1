use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection};

use crate::{content, history, node, utils::db_err};
use folio::prelude::*;
use folio::store_adapter::*;
use folio::types::{ContentId, ContentStatus, NodeId};

/// Transaction implementation for the SQLite store.
///
/// The underlying sqlx transaction rolls back when dropped uncommitted.
pub struct SqliteTransaction {
	tx: Option<sqlx::Transaction<'static, Sqlite>>,
}

impl SqliteTransaction {
	pub(crate) fn new(tx: sqlx::Transaction<'static, Sqlite>) -> Self {
		Self { tx: Some(tx) }
	}

	/// Connection of the open transaction
	fn conn(&mut self) -> FlResult<&mut SqliteConnection> {
		match self.tx.as_mut() {
			Some(tx) => Ok(&mut **tx),
			None => Err(Error::Internal("transaction already finished".into())),
		}
	}
}

#[async_trait]
impl StoreTransaction for SqliteTransaction {
	async fn count_nodes(&mut self, user_id: UserId) -> FlResult<u32> {
		node::count(self.conn()?, user_id).await
	}

	async fn create_node(&mut self, data: &CreateNodeData) -> FlResult<ContentNode> {
		node::create(self.conn()?, data).await
	}

	async fn update_node(
		&mut self,
		user_id: UserId,
		node_id: NodeId,
		data: &UpdateNodeData,
	) -> FlResult<u64> {
		node::update(self.conn()?, user_id, node_id, data).await
	}

	async fn shift_sort_nums(
		&mut self,
		user_id: UserId,
		range: SortRange,
		delta: i32,
	) -> FlResult<u64> {
		node::shift_sort_nums(self.conn()?, user_id, range, delta).await
	}

	async fn delete_node(&mut self, user_id: UserId, node_id: NodeId) -> FlResult<u64> {
		node::delete(self.conn()?, user_id, node_id).await
	}

	async fn update_contents_node_seo(
		&mut self,
		user_id: UserId,
		node_id: NodeId,
		node_seo: Option<&str>,
	) -> FlResult<u64> {
		content::update_node_seo(self.conn()?, user_id, node_id, node_seo).await
	}

	async fn create_content(&mut self, data: &CreateContentData) -> FlResult<Content> {
		content::create(self.conn()?, data).await
	}

	async fn update_content(
		&mut self,
		owner: Option<UserId>,
		content_id: ContentId,
		data: &UpdateContentData,
	) -> FlResult<u64> {
		content::update(self.conn()?, owner, content_id, data).await
	}

	async fn update_content_status(
		&mut self,
		owner: Option<UserId>,
		content_id: ContentId,
		guard: StatusGuard,
		status: ContentStatus,
	) -> FlResult<u64> {
		content::update_status(self.conn()?, owner, content_id, guard, status).await
	}

	async fn publish_draft(
		&mut self,
		user_id: UserId,
		content_id: ContentId,
	) -> FlResult<Option<Content>> {
		content::publish_draft(self.conn()?, user_id, content_id).await
	}

	async fn discard_draft(&mut self, user_id: UserId, content_id: ContentId) -> FlResult<u64> {
		content::discard_draft(self.conn()?, user_id, content_id).await
	}

	async fn create_history(
		&mut self,
		content: &Content,
		created_at: Timestamp,
	) -> FlResult<ContentHistory> {
		history::create(self.conn()?, content, created_at).await
	}

	async fn commit(&mut self) -> FlResult<()> {
		if let Some(tx) = self.tx.take() {
			tx.commit().await.map_err(db_err)?;
		}
		Ok(())
	}

	async fn rollback(&mut self) -> FlResult<()> {
		if let Some(tx) = self.tx.take() {
			tx.rollback().await.map_err(db_err)?;
		}
		Ok(())
	}
}

// vim: ts=4
