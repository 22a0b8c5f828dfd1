//! Store Adapter
//!
//! Trait and records for the relational store holding content nodes, contents and
//! their publish history.
//!
//! Read operations work directly on the adapter. Write operations require a
//! [`StoreTransaction`]: every statement issued through one transaction commits or
//! rolls back as a unit.
//!
//! Each adapter implementation provides its own constructor handling backend-specific
//! initialization (database path, connection settings, etc.).

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::{
	CloseComment, ContentId, ContentStatus, HistoryId, NodeId, NodeStatus, Timestamp, UserId,
};

// Content nodes //
//***************//
/// A node in a per-user tree of at most two levels
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
	pub id: NodeId,
	pub user_id: UserId,
	pub seo: Option<Box<str>>,
	pub status: NodeStatus,
	pub name: Box<str>,
	pub describe: Box<str>,
	pub image_path: Option<Box<str>>,
	pub parent_node_id: NodeId,
	pub level: u8,
	pub sort_num: u32,
	pub created_at: Timestamp,
	pub updated_at: Option<Timestamp>,
}

/// Position of a node in the tree. `level` is always derived from the parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodePlacement {
	parent_node_id: NodeId,
	level: u8,
}

impl NodePlacement {
	pub fn root() -> Self {
		Self { parent_node_id: NodeId::ROOT, level: 0 }
	}

	pub fn under(parent_node_id: NodeId) -> Self {
		if parent_node_id.is_root() {
			Self::root()
		} else {
			Self { parent_node_id, level: 1 }
		}
	}

	/// Placement currently held by `node`
	pub fn of(node: &ContentNode) -> Self {
		Self::under(node.parent_node_id)
	}

	pub fn parent_node_id(&self) -> NodeId {
		self.parent_node_id
	}

	pub fn level(&self) -> u8 {
		self.level
	}
}

#[derive(Debug)]
pub struct CreateNodeData {
	pub user_id: UserId,
	pub seo: Option<Box<str>>,
	pub name: Box<str>,
	pub describe: Box<str>,
	pub image_path: Option<Box<str>>,
	pub placement: NodePlacement,
	pub sort_num: u32,
}

/// Columns to change on a node; `Undefined` / `None` fields are left alone
#[derive(Debug, Default)]
pub struct UpdateNodeData {
	pub seo: Patch<Box<str>>,
	pub name: Patch<Box<str>>,
	pub describe: Patch<Box<str>>,
	pub image_path: Patch<Box<str>>,
	pub status: Patch<NodeStatus>,
	pub placement: Option<NodePlacement>,
	pub sort_num: Option<u32>,
}

impl UpdateNodeData {
	pub fn is_empty(&self) -> bool {
		self.seo.is_undefined()
			&& self.name.is_undefined()
			&& self.describe.is_undefined()
			&& self.image_path.is_undefined()
			&& self.status.is_undefined()
			&& self.placement.is_none()
			&& self.sort_num.is_none()
	}
}

/// Inclusive range of sort numbers, open ended when `end` is `None`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortRange {
	pub start: u32,
	pub end: Option<u32>,
}

impl SortRange {
	pub fn between(start: u32, end: u32) -> Self {
		Self { start, end: Some(end) }
	}

	pub fn from(start: u32) -> Self {
		Self { start, end: None }
	}
}

#[derive(Debug, Default)]
pub struct ListNodeOptions {
	/// `None` lists every user's nodes (admin)
	pub user_id: Option<UserId>,
	pub parent_node_id: Option<NodeId>,
	pub level: Option<u8>,
	pub status: Option<NodeStatus>,
	pub seo: Option<Box<str>>,
	pub limit: u32,
	pub offset: u32,
}

// Contents //
//**********//
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
	pub id: ContentId,
	pub user_id: UserId,
	pub seo: Option<Box<str>>,
	pub title: Box<str>,
	pub node_id: NodeId,
	pub node_seo: Option<Box<str>>,
	pub status: ContentStatus,
	pub top: bool,
	/// Published body
	pub describe: Box<str>,
	/// Draft body
	pub pre_describe: Box<str>,
	/// True when the draft equals the published body
	pub pre_flush: bool,
	pub close_comment: CloseComment,
	pub version: u32,
	pub image_path: Option<Box<str>>,
	pub views: u32,
	#[serde(skip_serializing)]
	pub password: Option<Box<str>>,
	pub created_at: Timestamp,
	pub updated_at: Option<Timestamp>,
}

#[derive(Debug)]
pub struct CreateContentData {
	pub user_id: UserId,
	pub seo: Option<Box<str>>,
	pub title: Box<str>,
	pub node_id: NodeId,
	pub node_seo: Option<Box<str>>,
	pub status: ContentStatus,
	pub top: bool,
	pub pre_describe: Box<str>,
	pub close_comment: CloseComment,
	pub image_path: Option<Box<str>>,
	pub password: Option<Box<str>>,
}

/// Node attachment of a content, `node_id` 0 detaches it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentNodeRef {
	pub node_id: NodeId,
	pub node_seo: Option<Box<str>>,
}

/// Columns to change on a content; `Undefined` / `None` fields are left alone.
///
/// Publish-owned columns (`describe`, `version`) are not part of the patch, they
/// only change through [`StoreTransaction::publish_draft`].
#[derive(Debug, Default)]
pub struct UpdateContentData {
	pub seo: Patch<Box<str>>,
	pub title: Patch<Box<str>>,
	pub node: Option<ContentNodeRef>,
	pub status: Patch<ContentStatus>,
	pub top: Patch<bool>,
	pub pre_describe: Patch<Box<str>>,
	pub pre_flush: Patch<bool>,
	pub close_comment: Patch<CloseComment>,
	pub image_path: Patch<Box<str>>,
	pub password: Patch<Box<str>>,
}

impl UpdateContentData {
	pub fn is_empty(&self) -> bool {
		self.seo.is_undefined()
			&& self.title.is_undefined()
			&& self.node.is_none()
			&& self.status.is_undefined()
			&& self.top.is_undefined()
			&& self.pre_describe.is_undefined()
			&& self.pre_flush.is_undefined()
			&& self.close_comment.is_undefined()
			&& self.image_path.is_undefined()
			&& self.password.is_undefined()
	}
}

/// Precondition on the stored status, re-checked by the write statement itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusGuard {
	Any,
	/// Inclusive status range
	Within(ContentStatus, ContentStatus),
}

impl StatusGuard {
	pub fn admits(self, status: ContentStatus) -> bool {
		match self {
			StatusGuard::Any => true,
			StatusGuard::Within(min, max) => min <= status && status <= max,
		}
	}
}

/// Number of contents referencing a node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeContentCount {
	pub total: u64,
	/// Contents that are not purged
	pub active: u64,
}

#[derive(Debug, Default)]
pub struct ListContentOptions {
	/// `None` lists every user's contents (admin)
	pub user_id: Option<UserId>,
	pub node_id: Option<NodeId>,
	pub status: Option<ContentStatus>,
	pub include_purged: bool,
	pub seo: Option<Box<str>>,
	pub top: Option<bool>,
	pub limit: u32,
	pub offset: u32,
}

// History //
//*********//
/// Immutable snapshot written by every successful publish
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentHistory {
	pub id: HistoryId,
	pub content_id: ContentId,
	pub user_id: UserId,
	pub seo: Option<Box<str>>,
	pub title: Box<str>,
	pub node_id: NodeId,
	/// Omitted from listings
	#[serde(skip_serializing_if = "Option::is_none")]
	pub describe: Option<Box<str>>,
	pub created_at: Timestamp,
}

#[derive(Debug, Default)]
pub struct ListHistoryOptions {
	pub content_id: ContentId,
	pub user_id: Option<UserId>,
	pub limit: u32,
	pub offset: u32,
}

/// One page of a listing plus the total number of matching rows
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: u64,
}

/// Transaction for atomic write operations.
///
/// Statements run in program order. Dropping a transaction without calling
/// [`commit`](StoreTransaction::commit) discards every change it made.
#[async_trait]
pub trait StoreTransaction: Send {
	/// Counts the nodes of a user
	async fn count_nodes(&mut self, user_id: UserId) -> FlResult<u32>;

	/// Inserts a node and returns it with its store-assigned id
	async fn create_node(&mut self, node: &CreateNodeData) -> FlResult<ContentNode>;

	/// Applies a partial update. Returns the number of affected rows.
	async fn update_node(
		&mut self,
		user_id: UserId,
		node_id: NodeId,
		data: &UpdateNodeData,
	) -> FlResult<u64>;

	/// Adds `delta` to the sort number of every node of `user_id` inside `range`
	async fn shift_sort_nums(&mut self, user_id: UserId, range: SortRange, delta: i32)
		-> FlResult<u64>;

	async fn delete_node(&mut self, user_id: UserId, node_id: NodeId) -> FlResult<u64>;

	/// Rewrites the denormalized node seo of all contents attached to a node
	async fn update_contents_node_seo(
		&mut self,
		user_id: UserId,
		node_id: NodeId,
		node_seo: Option<&str>,
	) -> FlResult<u64>;

	async fn create_content(&mut self, content: &CreateContentData) -> FlResult<Content>;

	/// Applies a partial update. `owner` restricts the update to that user's rows.
	async fn update_content(
		&mut self,
		owner: Option<UserId>,
		content_id: ContentId,
		data: &UpdateContentData,
	) -> FlResult<u64>;

	/// Sets the status if the stored status passes `guard`. Returns the number of
	/// affected rows, zero when the guard did not hold.
	async fn update_content_status(
		&mut self,
		owner: Option<UserId>,
		content_id: ContentId,
		guard: StatusGuard,
		status: ContentStatus,
	) -> FlResult<u64>;

	/// Copies the draft into the published body, bumps the version and marks the
	/// draft flushed, only if the draft is dirty. Returns the updated row.
	async fn publish_draft(
		&mut self,
		user_id: UserId,
		content_id: ContentId,
	) -> FlResult<Option<Content>>;

	/// Replaces a dirty draft with the published body. Returns the number of
	/// affected rows.
	async fn discard_draft(&mut self, user_id: UserId, content_id: ContentId) -> FlResult<u64>;

	/// Appends a history snapshot of `content`
	async fn create_history(
		&mut self,
		content: &Content,
		created_at: Timestamp,
	) -> FlResult<ContentHistory>;

	/// Commit the transaction, applying all changes atomically.
	async fn commit(&mut self) -> FlResult<()>;

	/// Rollback the transaction, discarding all changes.
	async fn rollback(&mut self) -> FlResult<()>;
}

/// Store Adapter trait.
///
/// Point reads, counts and listings go through the adapter; writes go through a
/// transaction returned by [`StoreAdapter::transaction`].
#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// Begin a new transaction for write operations.
	async fn transaction(&self) -> FlResult<Box<dyn StoreTransaction>>;

	// Nodes
	//*******
	async fn read_node(&self, user_id: UserId, node_id: NodeId) -> FlResult<Option<ContentNode>>;
	async fn read_node_by_seo(&self, user_id: UserId, seo: &str)
		-> FlResult<Option<ContentNode>>;
	async fn node_seo_exists(&self, user_id: UserId, seo: &str) -> FlResult<bool>;
	/// Number of nodes having `node_id` as their parent
	async fn count_children(&self, user_id: UserId, node_id: NodeId) -> FlResult<u32>;
	async fn list_nodes(&self, opts: &ListNodeOptions) -> FlResult<Page<ContentNode>>;

	// Contents
	//**********
	/// Reads a content; `owner` restricts the lookup to that user's rows
	async fn read_content(
		&self,
		owner: Option<UserId>,
		content_id: ContentId,
	) -> FlResult<Option<Content>>;
	async fn content_seo_exists(&self, user_id: UserId, seo: &str) -> FlResult<bool>;
	async fn count_node_contents(
		&self,
		user_id: UserId,
		node_id: NodeId,
	) -> FlResult<NodeContentCount>;
	async fn list_contents(&self, opts: &ListContentOptions) -> FlResult<Page<Content>>;

	// History
	//*********
	async fn read_history(
		&self,
		owner: Option<UserId>,
		history_id: HistoryId,
	) -> FlResult<Option<ContentHistory>>;
	/// Lists history rows newest first, without bodies
	async fn list_history(&self, opts: &ListHistoryOptions) -> FlResult<Page<ContentHistory>>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_placement_level_follows_parent() {
		assert_eq!(NodePlacement::under(NodeId(0)).level(), 0);
		assert_eq!(NodePlacement::under(NodeId(7)).level(), 1);
		assert_eq!(NodePlacement::under(NodeId(7)).parent_node_id(), NodeId(7));
		assert_eq!(NodePlacement::root(), NodePlacement::under(NodeId::ROOT));
	}

	#[test]
	fn test_status_guard() {
		let active = StatusGuard::Within(ContentStatus::Normal, ContentStatus::Hidden);
		assert!(active.admits(ContentStatus::Hidden));
		assert!(!active.admits(ContentStatus::Rubbish));
		assert!(StatusGuard::Any.admits(ContentStatus::Purged));
	}
}

// vim: ts=4
