//! Content creation, draft editing, publishing and cancelling

use serde::Deserialize;

use crate::prelude::*;
use folio_core::{transaction::finish, validate};
use folio_types::store_adapter::{
	ContentNodeRef, CreateContentData, StatusGuard, UpdateContentData,
};
use folio_types::types::CloseComment;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContent {
	pub seo: Option<Box<str>>,
	pub title: Box<str>,
	/// Normal or Hidden
	#[serde(default)]
	pub status: ContentStatus,
	#[serde(default)]
	pub top: bool,
	/// Initial draft
	#[serde(default, alias = "describe")]
	pub body: Box<str>,
	pub image_path: Option<Box<str>>,
	/// 0 leaves the content unattached
	#[serde(default)]
	pub node_id: NodeId,
	pub password: Option<Box<str>>,
	#[serde(default)]
	pub close_comment: CloseComment,
}

/// Content changes. Missing fields keep the stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContent {
	#[serde(default)]
	pub seo: Patch<Box<str>>,
	#[serde(default)]
	pub title: Patch<Box<str>>,
	/// 0 detaches the content from its node
	pub node_id: Option<NodeId>,
	/// Normal or Hidden, only applied while the content is active
	pub status: Option<ContentStatus>,
	pub top: Option<bool>,
	/// New draft, see [`edit_draft`]
	#[serde(alias = "describe")]
	pub body: Option<Box<str>>,
	#[serde(default)]
	pub image_path: Patch<Box<str>>,
	#[serde(default)]
	pub password: Patch<Box<str>>,
	pub close_comment: Option<CloseComment>,
}

/// Loads a content of `user_id` that is not purged
async fn load(app: &App, user_id: UserId, content_id: ContentId) -> FlResult<Content> {
	take(app, Some(user_id), content_id).await
}

async fn take(app: &App, owner: Option<UserId>, content_id: ContentId) -> FlResult<Content> {
	match app.store.read_content(owner, content_id).await? {
		Some(content) if owner.is_none() || content.status != ContentStatus::Purged => Ok(content),
		_ => Err(Error::NotFound),
	}
}

async fn check_seo_free(app: &App, user_id: UserId, seo: &str) -> FlResult<()> {
	validate::seo(seo)?;
	if app.store.content_seo_exists(user_id, seo).await? {
		warn!(user_id = %user_id, seo = %seo, "Content seo already in use");
		return Err(Error::SeoConflict);
	}
	Ok(())
}

/// Node reference of a content attached to `node_id`
async fn node_ref(app: &App, user_id: UserId, node_id: NodeId) -> FlResult<ContentNodeRef> {
	if node_id.is_root() {
		return Ok(ContentNodeRef { node_id, node_seo: None });
	}
	let node = app.store.read_node(user_id, node_id).await?.ok_or(Error::ContentNodeNotFound)?;
	Ok(ContentNodeRef { node_id: node.id, node_seo: node.seo })
}

fn check_owner_status(status: ContentStatus) -> FlResult<()> {
	if status.is_active() {
		Ok(())
	} else {
		Err(Error::ValidationError("status must be normal or hidden".into()))
	}
}

pub async fn create_content(app: &App, user_id: UserId, req: &CreateContent) -> FlResult<Content> {
	validate::required("title", &req.title, validate::TITLE_MAX_CHARS)?;
	check_owner_status(req.status)?;
	if let Some(image_path) = &req.image_path {
		validate::image_path(app.files.as_ref(), image_path).await?;
	}
	if let Some(seo) = &req.seo {
		check_seo_free(app, user_id, seo).await?;
	}
	let node = node_ref(app, user_id, req.node_id).await?;

	let data = CreateContentData {
		user_id,
		seo: req.seo.clone(),
		title: req.title.clone(),
		node_id: node.node_id,
		node_seo: node.node_seo,
		status: req.status,
		top: req.top,
		pre_describe: req.body.clone(),
		close_comment: req.close_comment,
		image_path: req.image_path.clone(),
		password: req.password.clone(),
	};
	let mut tx = app.store.transaction().await?;
	let res = tx.create_content(&data).await;
	let content = finish(tx, res).await?;

	info!(user_id = %user_id, content_id = %content.id, node_id = %content.node_id, "Created content");
	Ok(content)
}

pub async fn update_content(
	app: &App,
	actor: &Actor,
	content_id: ContentId,
	req: &UpdateContent,
) -> FlResult<Content> {
	let owner = actor.owner_filter();
	let content = take(app, owner, content_id).await?;
	let mut data = UpdateContentData::default();

	match &req.seo {
		Patch::Value(seo) if content.seo.as_ref() != Some(seo) => {
			check_seo_free(app, content.user_id, seo).await?;
			data.seo = Patch::Value(seo.clone());
		}
		Patch::Null if content.seo.is_some() => data.seo = Patch::Null,
		_ => {}
	}
	match &req.title {
		Patch::Value(title) if *title != content.title => {
			validate::required("title", title, validate::TITLE_MAX_CHARS)?;
			data.title = Patch::Value(title.clone());
		}
		Patch::Null => return Err(Error::ValidationError("title is required".into())),
		_ => {}
	}
	if let Some(node_id) = req.node_id.filter(|node_id| *node_id != content.node_id) {
		data.node = Some(node_ref(app, content.user_id, node_id).await?);
	}
	if let Some(top) = req.top.filter(|top| *top != content.top) {
		data.top = Patch::Value(top);
	}
	if let Some(close_comment) = req.close_comment.filter(|cc| *cc != content.close_comment) {
		data.close_comment = Patch::Value(close_comment);
	}
	if let Some(body) = req.body.as_ref().filter(|body| **body != content.pre_describe) {
		data.pre_describe = Patch::Value(body.clone());
		data.pre_flush = Patch::Value(false);
	}
	match &req.image_path {
		Patch::Value(image_path) if content.image_path.as_ref() != Some(image_path) => {
			validate::image_path(app.files.as_ref(), image_path).await?;
			data.image_path = Patch::Value(image_path.clone());
		}
		Patch::Null if content.image_path.is_some() => data.image_path = Patch::Null,
		_ => {}
	}
	data.password = req.password.clone();

	// Owners switch between Normal and Hidden, and only while the content is active
	let status = match req.status {
		Some(status) if status != content.status => {
			check_owner_status(status)?;
			Some(status)
		}
		_ => None,
	};

	if data.is_empty() && status.is_none() {
		return Ok(content);
	}

	let mut tx = app.store.transaction().await?;
	let res = async {
		if !data.is_empty() {
			tx.update_content(owner, content_id, &data).await?;
		}
		if let Some(status) = status {
			let active = StatusGuard::Within(ContentStatus::Normal, ContentStatus::Hidden);
			tx.update_content_status(owner, content_id, active, status).await?;
		}
		Ok::<_, Error>(())
	}
	.await;
	finish(tx, res).await?;

	info!(user_id = %actor.user_id, content_id = %content_id, "Updated content");
	take(app, owner, content_id).await
}

/// Replaces the draft. An unchanged body leaves the draft state alone, a changed
/// one marks the draft unpublished.
pub async fn edit_draft(
	app: &App,
	user_id: UserId,
	content_id: ContentId,
	body: &str,
) -> FlResult<Content> {
	let content = load(app, user_id, content_id).await?;
	if *content.pre_describe == *body {
		return Ok(content);
	}

	let data = UpdateContentData {
		pre_describe: Patch::Value(body.into()),
		pre_flush: Patch::Value(false),
		..Default::default()
	};
	let mut tx = app.store.transaction().await?;
	let res = tx.update_content(Some(user_id), content_id, &data).await;
	finish(tx, res).await?;

	debug!(user_id = %user_id, content_id = %content_id, "Draft edited");
	load(app, user_id, content_id).await
}

/// Publishes the draft and records a history snapshot.
///
/// Publishing an already published draft is a no-op.
pub async fn publish(app: &App, user_id: UserId, content_id: ContentId) -> FlResult<Content> {
	let content = load(app, user_id, content_id).await?;
	if content.pre_flush {
		debug!(user_id = %user_id, content_id = %content_id, "Draft already published");
		return Ok(content);
	}

	let mut tx = app.store.transaction().await?;
	let res = async {
		// The statement re-checks the dirty flag, a concurrent publish leaves nothing to do
		let Some(published) = tx.publish_draft(user_id, content_id).await? else {
			return Ok(None);
		};
		let history = tx.create_history(&published, Timestamp::now()).await?;
		Ok::<_, Error>(Some((published, history)))
	}
	.await;

	match finish(tx, res).await? {
		Some((published, history)) => {
			info!(
				user_id = %user_id,
				content_id = %content_id,
				version = published.version,
				history_id = %history.id,
				"Published content"
			);
			Ok(published)
		}
		None => load(app, user_id, content_id).await,
	}
}

/// Throws away an unpublished draft
pub async fn cancel(app: &App, user_id: UserId, content_id: ContentId) -> FlResult<Content> {
	let content = load(app, user_id, content_id).await?;
	if content.pre_flush {
		return Ok(content);
	}

	let mut tx = app.store.transaction().await?;
	let res = tx.discard_draft(user_id, content_id).await;
	finish(tx, res).await?;

	info!(user_id = %user_id, content_id = %content_id, "Draft discarded");
	load(app, user_id, content_id).await
}

// vim: ts=4
