//! Publish history. Snapshots are written by [`crate::versioning::publish`] and
//! never change afterwards.

use serde::Deserialize;

use crate::lifecycle::take_content;
use crate::prelude::*;
use folio_core::validate;
use folio_types::store_adapter::{ContentHistory, ListHistoryOptions, Page};
use folio_types::types::HistoryId;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHistory {
	#[serde(default)]
	pub limit: u32,
	#[serde(default)]
	pub offset: u32,
}

/// Snapshots of a content, newest first and without bodies
pub async fn list_history(
	app: &App,
	actor: &Actor,
	content_id: ContentId,
	query: &ListHistory,
) -> FlResult<Page<ContentHistory>> {
	take_content(app, actor, content_id).await?;

	let opts = ListHistoryOptions {
		content_id,
		user_id: actor.owner_filter(),
		limit: validate::limit(&app.settings, query.limit),
		offset: query.offset,
	};
	app.store.list_history(&opts).await
}

/// A single snapshot including its body
pub async fn take_history(
	app: &App,
	actor: &Actor,
	history_id: HistoryId,
) -> FlResult<ContentHistory> {
	app.store.read_history(actor.owner_filter(), history_id).await?.ok_or(Error::NotFound)
}

// vim: ts=4
