//! Content status state machine and read paths.
//!
//! Owner transitions are conditional: the expected current status is part of the
//! write statement, so a transition racing another one simply matches no row.
//! Purged contents stay in storage but are invisible to everyone except admins.

use serde::Deserialize;

use crate::prelude::*;
use folio_core::{transaction::finish, validate};
use folio_types::store_adapter::{ListContentOptions, NodeContentCount, Page, StatusGuard};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusTransition {
	/// Normal or Hidden to Rubbish
	Trash,
	/// Rubbish back to Normal
	Restore,
	/// Banned or Rubbish to Purged
	Purge,
	/// Any status to any status, admins only
	Override(ContentStatus),
}

impl StatusTransition {
	pub fn guard(self) -> StatusGuard {
		match self {
			StatusTransition::Trash => StatusGuard::Within(ContentStatus::Normal, ContentStatus::Hidden),
			StatusTransition::Restore => {
				StatusGuard::Within(ContentStatus::Rubbish, ContentStatus::Rubbish)
			}
			StatusTransition::Purge => StatusGuard::Within(ContentStatus::Banned, ContentStatus::Rubbish),
			StatusTransition::Override(_) => StatusGuard::Any,
		}
	}

	pub fn target(self) -> ContentStatus {
		match self {
			StatusTransition::Trash => ContentStatus::Rubbish,
			StatusTransition::Restore => ContentStatus::Normal,
			StatusTransition::Purge => ContentStatus::Purged,
			StatusTransition::Override(status) => status,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContents {
	/// Only honored for admins
	pub user_id: Option<UserId>,
	pub node_id: Option<NodeId>,
	pub status: Option<ContentStatus>,
	pub seo: Option<Box<str>>,
	pub top: Option<bool>,
	#[serde(default)]
	pub limit: u32,
	#[serde(default)]
	pub offset: u32,
}

/// Applies a status transition.
///
/// Returns whether the transition was applied. A transition whose precondition
/// does not hold is a no-op, not an error.
pub async fn transition(
	app: &App,
	actor: &Actor,
	content_id: ContentId,
	transition: StatusTransition,
) -> FlResult<bool> {
	if matches!(transition, StatusTransition::Override(_)) && !actor.is_admin {
		warn!(user_id = %actor.user_id, content_id = %content_id, "Status override refused");
		return Err(Error::PermissionDenied);
	}
	// Purged contents are invisible to their owners, transitions included
	take_content(app, actor, content_id).await?;
	let owner = actor.owner_filter();

	let mut tx = app.store.transaction().await?;
	let res =
		tx.update_content_status(owner, content_id, transition.guard(), transition.target()).await;
	let applied = finish(tx, res).await? > 0;

	if applied {
		info!(
			user_id = %actor.user_id,
			content_id = %content_id,
			transition = ?transition,
			"Content status changed"
		);
	} else {
		debug!(
			user_id = %actor.user_id,
			content_id = %content_id,
			transition = ?transition,
			"Content status transition not applicable"
		);
	}
	Ok(applied)
}

/// Contents attached to a node, in total and not purged
pub async fn count_node_contents(
	app: &App,
	user_id: UserId,
	node_id: NodeId,
) -> FlResult<NodeContentCount> {
	app.store.count_node_contents(user_id, node_id).await
}

pub async fn take_content(app: &App, actor: &Actor, content_id: ContentId) -> FlResult<Content> {
	match app.store.read_content(actor.owner_filter(), content_id).await? {
		Some(content) if actor.is_admin || content.status != ContentStatus::Purged => Ok(content),
		_ => Err(Error::NotFound),
	}
}

/// Lists contents, pinned ones first and then newest first
pub async fn list_contents(
	app: &App,
	actor: &Actor,
	query: &ListContents,
) -> FlResult<Page<Content>> {
	let opts = ListContentOptions {
		user_id: if actor.is_admin { query.user_id } else { Some(actor.user_id) },
		node_id: query.node_id,
		status: query.status,
		include_purged: actor.is_admin,
		seo: query.seo.clone(),
		top: query.top,
		limit: validate::limit(&app.settings, query.limit),
		offset: query.offset,
	};
	app.store.list_contents(&opts).await
}


// vim: ts=4
